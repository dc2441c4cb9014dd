// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene implementation: node arena, structure, geometry, and queries.

use core::any::Any;

use kurbo::Point;
use smallvec::SmallVec;

use crate::component::{Component, EventCx};
use crate::error::SceneError;
use crate::event::MouseButton;
use crate::tooltip::{HoverState, Tooltip, TooltipStyle};
use crate::types::{IRect, NodeDesc, NodeFlags, NodeId, Position};

pub(crate) type Children = SmallVec<[NodeId; 4]>;

/// Scene-wide settings.
#[derive(Clone, Debug)]
pub struct SceneConfig {
    /// Hover time before a tooltip shows, for nodes without their own delay.
    ///
    /// Defaults to 500 ms.
    pub tooltip_delay_ms: u64,
    /// How tooltips are drawn.
    pub tooltip_style: TooltipStyle,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            tooltip_delay_ms: 500,
            tooltip_style: TooltipStyle::default(),
        }
    }
}

/// Retained-mode component tree.
///
/// Nodes live in a generational arena and are addressed by [`NodeId`]. Each
/// node has at most one parent; children are ordered, and insertion order
/// is paint order. Dispatch walks the same order in reverse so the top-most
/// node sees input first. Parentless nodes are the scene's roots and are
/// ordered the same way.
///
/// ## Example
///
/// ```rust
/// use trellis_scene::{IRect, NodeDesc, Scene};
///
/// let mut scene = Scene::new();
/// let panel = scene.insert(None, NodeDesc::at(IRect::new(100, 50, 200, 120)));
/// let label = scene.insert(Some(panel), NodeDesc::relative(10, 8, 50, 10));
///
/// assert_eq!(scene.bounds(label), Some(IRect::new(110, 58, 50, 10)));
///
/// // Moving the parent carries relatively positioned children along.
/// scene.set_position(panel, 0, 0);
/// assert_eq!(scene.bounds(label), Some(IRect::new(10, 8, 50, 10)));
/// ```
pub struct Scene {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    roots: Children,
    /// node that consumed the latest press, per button, until its release is dispatched
    pub(crate) press_targets: SmallVec<[(MouseButton, NodeId); 2]>,
    pub(crate) config: SceneConfig,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Scene")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("roots", &self.roots)
            .field("press_targets", &self.press_targets)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct Node {
    generation: u32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Children,
    pub(crate) bounds: IRect,
    pub(crate) flags: NodeFlags,
    position: Position,
    pub(crate) tooltip: Option<Tooltip>,
    pub(crate) tooltip_delay_ms: Option<u64>,
    pub(crate) hover: HoverState,
    pub(crate) component: Option<Box<dyn Component>>,
}

impl Node {
    fn new(generation: u32, desc: NodeDesc) -> Self {
        Self {
            generation,
            parent: None,
            children: Children::new(),
            bounds: desc.bounds,
            flags: desc.flags,
            position: desc.position,
            tooltip: desc.tooltip,
            tooltip_delay_ms: desc.tooltip_delay_ms,
            hover: HoverState::default(),
            component: None,
        }
    }

    pub(crate) fn is_live_for_input(&self) -> bool {
        self.flags.contains(NodeFlags::VISIBLE | NodeFlags::ENABLED)
    }

    pub(crate) fn is_visible(&self) -> bool {
        self.flags.contains(NodeFlags::VISIBLE)
    }
}

impl Scene {
    /// Create an empty scene with default settings.
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Create an empty scene with the given settings.
    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            roots: Children::new(),
            press_targets: SmallVec::new(),
            config,
        }
    }

    /// Scene-wide settings.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Mutable scene-wide settings.
    pub fn config_mut(&mut self) -> &mut SceneConfig {
        &mut self.config
    }

    /// Insert a new node as the last child of `parent` (or as the last root if `None`).
    ///
    /// A stale `parent` inserts the node as a root. Non-absolute positions
    /// are resolved immediately.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "slot indices stay within u32 for any realistic scene."
    )]
    pub fn insert(&mut self, parent: Option<NodeId>, desc: NodeDesc) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, desc));
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, desc)));
            self.generations.push(generation);
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        match parent {
            Some(p) if self.is_alive(p) => self.link_parent(id, p),
            Some(p) => {
                tracing::warn!(?p, ?id, "insert under stale parent; inserting as root");
                self.roots.push(id);
            }
            None => self.roots.push(id),
        }
        self.resolve_layout(id);
        id
    }

    /// Attach `component` to a node, replacing any previous one.
    pub fn set_component(&mut self, id: NodeId, component: impl Component) {
        if let Some(n) = self.node_opt_mut(id) {
            n.component = Some(Box::new(component));
        }
    }

    /// Detach and return a node's component.
    pub fn take_component(&mut self, id: NodeId) -> Option<Box<dyn Component>> {
        self.node_opt_mut(id)?.component.take()
    }

    /// Borrow a node's component as a concrete type.
    pub fn component<T: Component>(&self, id: NodeId) -> Option<&T> {
        let component: &dyn Any = self.node_opt(id)?.component.as_deref()?;
        component.downcast_ref::<T>()
    }

    /// Mutably borrow a node's component as a concrete type.
    pub fn component_mut<T: Component>(&mut self, id: NodeId) -> Option<&mut T> {
        let component: &mut dyn Any = self.node_opt_mut(id)?.component.as_deref_mut()?;
        component.downcast_mut::<T>()
    }

    /// Remove a node and its whole subtree.
    ///
    /// Every id in the subtree becomes stale.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.unlink(id);
        self.free_subtree(id);
    }

    /// Detach `id` from its parent, making it the last root.
    ///
    /// Its absolute bounds are kept as they were.
    pub fn detach(&mut self, id: NodeId) {
        if !self.is_alive(id) || self.node(id).parent.is_none() {
            return;
        }
        self.unlink(id);
        self.roots.push(id);
    }

    /// Move `child` (and its subtree) to the end of `parent`'s children.
    ///
    /// Fails if either id is stale or if `child` is `parent` or one of its
    /// ancestors, which would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        for id in [parent, child] {
            if !self.is_alive(id) {
                tracing::warn!(?id, "append_child with stale node");
                return Err(SceneError::StaleNode(id));
            }
        }
        if child == parent || self.contains_descendant(child, parent) {
            tracing::debug!(?parent, ?child, "refusing to create a cycle");
            return Err(SceneError::WouldCycle { parent, child });
        }
        self.unlink(child);
        self.link_parent(child, parent);
        self.resolve_layout(child);
        Ok(())
    }

    /// Moves `child` under `new_parent`. Same rules as [`Scene::append_child`].
    pub fn reparent(&mut self, child: NodeId, new_parent: NodeId) -> Result<(), SceneError> {
        self.append_child(new_parent, child)
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Top-level nodes in paint order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.parent
    }

    /// Get the children of a node in paint order, or an empty slice if the node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map_or(&[], |n| &n.children)
    }

    /// Iterate the ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        core::iter::successors(self.parent_of(id), move |&p| self.parent_of(p))
    }

    /// Whether `id` lies in the subtree below `ancestor` (excluding `ancestor` itself).
    pub fn contains_descendant(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Whether the scene has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Resolved absolute bounds of a live node.
    pub fn bounds(&self, id: NodeId) -> Option<IRect> {
        self.node_opt(id).map(|n| n.bounds)
    }

    /// The node's position anchor.
    pub fn position(&self, id: NodeId) -> Option<Position> {
        self.node_opt(id).map(|n| n.position)
    }

    /// Place a node at an absolute position.
    ///
    /// This switches the node to [`Position::Absolute`] and moves every
    /// relatively positioned descendant along with it.
    pub fn set_position(&mut self, id: NodeId, x: i32, y: i32) {
        if let Some(n) = self.node_opt_mut(id) {
            n.position = Position::Absolute;
            n.bounds = n.bounds.with_origin(x, y);
            self.resolve_layout(id);
        }
    }

    /// Position a node at a fixed offset from its parent's top-left corner.
    pub fn set_offset(&mut self, id: NodeId, dx: i32, dy: i32) {
        self.set_anchor(id, Position::Relative { dx, dy });
    }

    /// Center a node within its parent, now and whenever either is resized or moved.
    pub fn center_in_parent(&mut self, id: NodeId) {
        self.set_anchor(id, Position::Centered);
    }

    /// Replace the position anchor and re-resolve the subtree.
    pub fn set_anchor(&mut self, id: NodeId, position: Position) {
        if let Some(n) = self.node_opt_mut(id) {
            n.position = position;
            self.resolve_layout(id);
        }
    }

    /// Resize a node. Anchored children are re-resolved.
    pub fn set_size(&mut self, id: NodeId, width: i32, height: i32) {
        if let Some(n) = self.node_opt_mut(id) {
            n.bounds.width = width;
            n.bounds.height = height;
            self.resolve_layout(id);
        }
    }

    /// Recompute absolute positions of `id` and its descendants from their anchors.
    ///
    /// Non-absolute nodes are placed from their parent's bounds and their
    /// stored anchor, never from their current position, so calling this any
    /// number of times yields the same layout.
    pub fn resolve_layout(&mut self, id: NodeId) {
        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        stack.push(id);
        while let Some(id) = stack.pop() {
            let Some(node) = self.node_opt(id) else {
                continue;
            };
            let parent_bounds = node.parent.and_then(|p| self.bounds(p));
            let node = self.node_mut(id);
            if let Some(parent_bounds) = parent_bounds {
                node.bounds = node.position.resolve(parent_bounds, node.bounds);
            }
            stack.extend(node.children.iter().copied());
        }
    }

    /// Returns the flags of a node if the identifier is live.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node_opt(id).map(|n| n.flags)
    }

    /// Update node flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        let Some(n) = self.node_opt_mut(id) else {
            return;
        };
        n.flags = flags;
        if !flags.contains(NodeFlags::VISIBLE) {
            // Hidden subtrees are not rendered, so their hover timers would go stale.
            let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
            stack.push(id);
            while let Some(id) = stack.pop() {
                let n = self.node_mut(id);
                n.hover.reset();
                stack.extend(n.children.iter().copied());
            }
        }
    }

    /// Show or hide a node and its subtree.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(flags) = self.flags(id) {
            self.set_flags(id, flags_with(flags, NodeFlags::VISIBLE, visible));
        }
    }

    /// Enable or disable input for a node and its subtree.
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) {
        if let Some(flags) = self.flags(id) {
            self.set_flags(id, flags_with(flags, NodeFlags::ENABLED, enabled));
        }
    }

    /// Make unconsumed pointer events inside the node's bounds stop at the node.
    pub fn set_blocks_input(&mut self, id: NodeId, blocks: bool) {
        if let Some(flags) = self.flags(id) {
            self.set_flags(id, flags_with(flags, NodeFlags::BLOCKS_INPUT, blocks));
        }
    }

    /// Whether the node and all of its ancestors are visible.
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        self.path_all(id, NodeFlags::VISIBLE)
    }

    /// Whether input dispatched from the roots can reach the node: it and all
    /// of its ancestors are visible and enabled.
    pub fn is_interactive(&self, id: NodeId) -> bool {
        self.path_all(id, NodeFlags::VISIBLE | NodeFlags::ENABLED)
    }

    /// Attach or clear a node's tooltip.
    pub fn set_tooltip(&mut self, id: NodeId, tooltip: Option<Tooltip>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.tooltip = tooltip;
        }
    }

    /// A node's tooltip.
    pub fn tooltip(&self, id: NodeId) -> Option<&Tooltip> {
        self.node_opt(id)?.tooltip.as_ref()
    }

    /// Override the hover delay for a node's tooltip; `None` restores the scene default.
    pub fn set_tooltip_delay(&mut self, id: NodeId, delay_ms: Option<u64>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.tooltip_delay_ms = delay_ms;
        }
    }

    /// Effective hover delay of a node's tooltip.
    pub fn tooltip_delay(&self, id: NodeId) -> Option<u64> {
        self.node_opt(id)
            .map(|n| n.tooltip_delay_ms.unwrap_or(self.config.tooltip_delay_ms))
    }

    /// Top-most visible node whose bounds contain `point`.
    ///
    /// Deeper nodes win over their ancestors and later siblings over earlier
    /// ones, matching dispatch order.
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        self.roots
            .iter()
            .rev()
            .find_map(|&root| self.hit_test_in(root, point))
    }

    /// Like [`Scene::hit_test`], restricted to the subtree rooted at `id`.
    pub fn hit_test_in(&self, id: NodeId, point: Point) -> Option<NodeId> {
        let node = self.node_opt(id)?;
        if !node.is_visible() {
            return None;
        }
        node.children
            .iter()
            .rev()
            .find_map(|&child| self.hit_test_in(child, point))
            .or_else(|| node.bounds.contains(point).then_some(id))
    }

    /// Ask `id`, then each of its ancestors, to scroll by `dy`.
    ///
    /// Returns the first node whose component accepted the request.
    pub fn scroll_nearest(&mut self, id: NodeId, dy: f64) -> Option<NodeId> {
        let chain: SmallVec<[NodeId; 8]> =
            core::iter::once(id).chain(self.ancestors(id)).collect();
        chain
            .into_iter()
            .find(|&n| self.with_component(n, |c, cx| c.scroll_by(cx, dy)) == Some(true))
    }
}

fn flags_with(flags: NodeFlags, flag: NodeFlags, on: bool) -> NodeFlags {
    let mut flags = flags;
    flags.set(flag, on);
    flags
}

impl Scene {
    // --- internals ---

    /// Access a live node; panics if `id` is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.node_opt(id).expect("dangling NodeId")
    }

    /// Access a live node mutably; panics if `id` is stale.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.node_opt_mut(id).expect("dangling NodeId")
    }

    pub(crate) fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    pub(crate) fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    /// Run `f` with the node's component taken out of its slot.
    ///
    /// The component is put back afterwards unless the node was removed or
    /// received a new component in the meantime.
    pub(crate) fn with_component<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn Component, &mut EventCx<'_>) -> R,
    ) -> Option<R> {
        let mut component = self.node_opt_mut(id)?.component.take()?;
        let result = f(
            component.as_mut(),
            &mut EventCx {
                scene: self,
                node: id,
            },
        );
        if let Some(n) = self.node_opt_mut(id)
            && n.component.is_none()
        {
            n.component = Some(component);
        }
        Some(result)
    }

    fn path_all(&self, id: NodeId, required: NodeFlags) -> bool {
        let Some(node) = self.node_opt(id) else {
            return false;
        };
        node.flags.contains(required)
            && self
                .ancestors(id)
                .all(|a| self.node(a).flags.contains(required))
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    /// Remove `id` from its parent's children or from the roots.
    fn unlink(&mut self, id: NodeId) {
        match self.node(id).parent {
            Some(parent) => {
                self.node_mut(parent).children.retain(|c| *c != id);
                self.node_mut(id).parent = None;
            }
            None => self.roots.retain(|r| *r != id),
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        stack.push(id);
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes[id.idx()].take() {
                stack.extend(node.children);
                // An exhausted slot is retired so its last id can never come back.
                if self.generations[id.idx()] < u32::MAX {
                    self.free_list.push(id.idx());
                }
            }
        }
    }
}
