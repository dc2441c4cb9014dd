// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus state over a [`Scene`]: registration, listeners, and saved contexts.

use core::fmt;

use trellis_scene::{MouseButton, NodeId, Scene};

use crate::{DefaultPolicy, Direction, FocusEntry, FocusError, FocusPolicy, FocusSpace, Navigation};

/// Handle returned by [`FocusManager::add_listener`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(Option<NodeId>, Option<NodeId>)>;

/// One level of the context stack.
#[derive(Default)]
struct Context {
    focusables: Vec<NodeId>,
    focused: Option<NodeId>,
    listeners: Vec<(ListenerId, Listener)>,
}

impl Context {
    fn forget(&mut self, id: NodeId) {
        self.focusables.retain(|f| *f != id);
        if self.focused == Some(id) {
            self.focused = None;
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("focusables", &self.focusables)
            .field("focused", &self.focused)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Tracks which scene node has focus and moves it on navigation input.
///
/// Only registered nodes can take focus, and only while they are eligible:
/// alive, and visible and enabled together with all of their ancestors. Every
/// change of the focused node is reported to the current context's listeners
/// as `(previous, current)`.
///
/// The manager never owns the scene; operations that need geometry or
/// eligibility take it by reference.
pub struct FocusManager<P = DefaultPolicy> {
    policy: P,
    current: Context,
    saved: Vec<(String, Context)>,
    next_listener: u64,
}

impl<P: fmt::Debug> fmt::Debug for FocusManager<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusManager")
            .field("policy", &self.policy)
            .field("current", &self.current)
            .field("saved", &self.saved)
            .field("next_listener", &self.next_listener)
            .finish()
    }
}

impl Default for FocusManager {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusManager {
    /// Create a manager using [`DefaultPolicy`].
    pub fn new() -> Self {
        Self::with_policy(DefaultPolicy::default())
    }
}

impl<P: FocusPolicy<NodeId>> FocusManager<P> {
    /// Create a manager with a custom traversal policy.
    pub fn with_policy(policy: P) -> Self {
        Self {
            policy,
            current: Context::default(),
            saved: Vec::new(),
            next_listener: 0,
        }
    }

    /// The traversal policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Make `id` focusable in the current context. Duplicates are ignored.
    pub fn register(&mut self, id: NodeId) {
        if !self.current.focusables.contains(&id) {
            tracing::debug!(?id, "focusable registered");
            self.current.focusables.push(id);
        }
    }

    /// Remove `id` from the current context, clearing focus if it held it.
    pub fn unregister(&mut self, id: NodeId) {
        let before = self.current.focusables.len();
        self.current.focusables.retain(|f| *f != id);
        if self.current.focusables.len() != before {
            tracing::debug!(?id, "focusable unregistered");
        }
        if self.current.focused == Some(id) {
            self.set_focus(None);
        }
    }

    /// Whether `id` is registered in the current context.
    pub fn is_registered(&self, id: NodeId) -> bool {
        self.current.focusables.contains(&id)
    }

    /// Registered nodes of the current context, in registration order.
    pub fn focusables(&self) -> &[NodeId] {
        &self.current.focusables
    }

    /// The focused node, if any.
    pub fn focused(&self) -> Option<NodeId> {
        self.current.focused
    }

    /// Whether `id` is registered and can take focus in `scene` right now.
    pub fn is_eligible(&self, scene: &Scene, id: NodeId) -> bool {
        self.is_registered(id) && scene.is_interactive(id)
    }

    /// Focus `id` explicitly.
    ///
    /// Returns whether `id` is focused afterwards; ineligible nodes are refused.
    pub fn focus(&mut self, scene: &Scene, id: NodeId) -> bool {
        if !self.is_eligible(scene, id) {
            tracing::debug!(?id, "focus refused: not eligible");
            return false;
        }
        self.set_focus(Some(id));
        true
    }

    /// Clear focus.
    pub fn clear_focus(&mut self) {
        self.set_focus(None);
    }

    /// Focus the first eligible node in registration order, or clear focus if there is none.
    ///
    /// Returns whether focus changed.
    pub fn focus_first(&mut self, scene: &Scene) -> bool {
        let first = self
            .current
            .focusables
            .iter()
            .copied()
            .find(|&id| scene.is_interactive(id));
        self.set_focus(first)
    }

    /// Move focus to the next eligible node in registration order.
    pub fn navigate_next(&mut self, scene: &Scene) -> bool {
        self.navigate(scene, Navigation::Next)
    }

    /// Move focus to the previous eligible node in registration order.
    pub fn navigate_previous(&mut self, scene: &Scene) -> bool {
        self.navigate(scene, Navigation::Prev)
    }

    /// Move focus spatially. With nothing focused this focuses the first eligible node.
    pub fn navigate_direction(&mut self, scene: &Scene, direction: Direction) -> bool {
        self.navigate(scene, direction.into())
    }

    /// Move focus according to `navigation`.
    ///
    /// A focused node that has since become hidden or disabled still anchors the
    /// move: linear steps continue from its place in the order and spatial moves
    /// measure from its bounds. Returns whether focus changed.
    pub fn navigate(&mut self, scene: &Scene, navigation: Navigation) -> bool {
        let origin = self.current.focused.filter(|&id| scene.is_alive(id));
        let spatial = !matches!(navigation, Navigation::Next | Navigation::Prev);
        if spatial && origin.is_none() {
            return self.focus_first(scene);
        }
        let entries = self.entries(scene);
        let space = FocusSpace { nodes: &entries };
        match self.policy.next(origin, navigation, &space) {
            Some(target) => self.set_focus(Some(target)),
            None => false,
        }
    }

    /// Activate the focused node as if it were clicked at its center.
    ///
    /// Sends a primary-button press and release through the scene's top-level
    /// dispatch. Returns whether activation was attempted.
    pub fn activate_focused(&mut self, scene: &mut Scene) -> bool {
        let Some(id) = self.current.focused else {
            return false;
        };
        if !scene.is_interactive(id) {
            return false;
        }
        let Some(bounds) = scene.bounds(id) else {
            return false;
        };
        let center = bounds.center();
        tracing::debug!(?id, "activating focused node");
        scene.pointer_down(center, MouseButton::Primary);
        scene.pointer_up(center, MouseButton::Primary);
        true
    }

    /// Call `listener` with `(previous, current)` on every focus change in the current context.
    pub fn add_listener(
        &mut self,
        listener: impl FnMut(Option<NodeId>, Option<NodeId>) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.current.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener from whichever context holds it.
    ///
    /// Returns whether it was found.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.contexts_mut().any(|ctx| {
            let before = ctx.listeners.len();
            ctx.listeners.retain(|(l, _)| *l != id);
            ctx.listeners.len() != before
        })
    }

    /// Save the current registrations, focus, and listeners under `name`, and start empty.
    ///
    /// No listener is notified.
    pub fn push_context(&mut self, name: impl Into<String>) {
        let name = name.into();
        tracing::debug!(name = %name, depth = self.saved.len() + 1, "focus context pushed");
        let saved = core::mem::take(&mut self.current);
        self.saved.push((name, saved));
    }

    /// Restore the most recently pushed context and return its name.
    ///
    /// The restored listeners are notified if the focused node differs from
    /// the one before the pop. Returns `None` when nothing was pushed.
    pub fn pop_context(&mut self) -> Option<String> {
        let (name, restored) = self.saved.pop()?;
        let before = self.current.focused;
        self.current = restored;
        tracing::debug!(name = %name, depth = self.saved.len(), "focus context popped");
        let after = self.current.focused;
        if before != after {
            self.notify(before, after);
        }
        Some(name)
    }

    /// Like [`FocusManager::pop_context`], but only if the top context is named `expected`.
    ///
    /// On failure the stack is left untouched.
    pub fn pop_context_named(&mut self, expected: &str) -> Result<String, FocusError> {
        let no_context = || FocusError::NoContext {
            expected: expected.to_owned(),
        };
        let (top, _) = self.saved.last().ok_or_else(no_context)?;
        if top != expected {
            tracing::warn!(expected, found = top.as_str(), "focus context mismatch");
            return Err(FocusError::ContextMismatch {
                expected: expected.to_owned(),
                found: top.clone(),
            });
        }
        self.pop_context().ok_or_else(no_context)
    }

    /// Number of saved contexts.
    pub fn context_depth(&self) -> usize {
        self.saved.len()
    }

    /// Names of saved contexts, oldest first.
    pub fn context_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.saved.iter().map(|(name, _)| name.as_str())
    }

    /// Remove `id` from every context, current and saved.
    ///
    /// Clearing the current focus this way notifies listeners; saved contexts
    /// silently lose their focus.
    pub fn forget(&mut self, id: NodeId) {
        for (_, ctx) in &mut self.saved {
            ctx.forget(id);
        }
        self.current.focusables.retain(|f| *f != id);
        if self.current.focused == Some(id) {
            self.set_focus(None);
        }
    }

    /// Forget every id that is no longer alive in `scene`.
    pub fn prune(&mut self, scene: &Scene) {
        let dead: Vec<NodeId> = self
            .contexts()
            .flat_map(|ctx| ctx.focusables.iter().chain(ctx.focused.iter()))
            .copied()
            .filter(|&id| !scene.is_alive(id))
            .collect();
        for id in dead {
            self.forget(id);
        }
    }

    // --- internals ---

    fn entries(&self, scene: &Scene) -> Vec<FocusEntry<NodeId>> {
        self.current
            .focusables
            .iter()
            .filter_map(|&id| {
                let bounds = scene.bounds(id)?;
                Some(FocusEntry {
                    id,
                    rect: bounds.to_rect(),
                    enabled: scene.is_interactive(id),
                })
            })
            .collect()
    }

    /// Returns whether focus changed.
    fn set_focus(&mut self, next: Option<NodeId>) -> bool {
        let previous = self.current.focused;
        if previous == next {
            return false;
        }
        self.current.focused = next;
        tracing::debug!(?previous, ?next, "focus changed");
        self.notify(previous, next);
        true
    }

    fn notify(&mut self, previous: Option<NodeId>, current: Option<NodeId>) {
        for (_, listener) in &mut self.current.listeners {
            listener(previous, current);
        }
    }

    fn contexts(&self) -> impl Iterator<Item = &Context> + '_ {
        core::iter::once(&self.current).chain(self.saved.iter().map(|(_, ctx)| ctx))
    }

    fn contexts_mut(&mut self) -> impl Iterator<Item = &mut Context> + '_ {
        core::iter::once(&mut self.current).chain(self.saved.iter_mut().map(|(_, ctx)| ctx))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use trellis_scene::{EventCx, IRect, NodeDesc, OnClick};

    use super::*;
    use crate::WrapMode;

    type Changes = Rc<RefCell<Vec<(Option<NodeId>, Option<NodeId>)>>>;

    fn record(focus: &mut FocusManager) -> Changes {
        let changes = Changes::default();
        let sink = changes.clone();
        focus.add_listener(move |prev, cur| sink.borrow_mut().push((prev, cur)));
        changes
    }

    /// A row of three 20x20 buttons, 30px apart, under one root.
    fn row(scene: &mut Scene) -> (NodeId, [NodeId; 3]) {
        let root = scene.insert(None, NodeDesc::at(IRect::new(0, 0, 200, 100)));
        let buttons =
            [0, 1, 2].map(|i| scene.insert(Some(root), NodeDesc::relative(i * 30, 0, 20, 20)));
        (root, buttons)
    }

    fn registered(buttons: &[NodeId]) -> FocusManager {
        let mut focus = FocusManager::new();
        for &b in buttons {
            focus.register(b);
        }
        focus
    }

    #[test]
    fn linear_navigation_wraps() {
        let mut scene = Scene::new();
        let (_, [a, b, c]) = row(&mut scene);
        let mut focus = registered(&[a, b, c]);

        assert!(focus.navigate_next(&scene));
        assert_eq!(focus.focused(), Some(a));
        focus.navigate_next(&scene);
        focus.navigate_next(&scene);
        assert_eq!(focus.focused(), Some(c));
        focus.navigate_next(&scene);
        assert_eq!(focus.focused(), Some(a), "wraps past the end");
        focus.navigate_previous(&scene);
        assert_eq!(focus.focused(), Some(c), "wraps past the start");
    }

    #[test]
    fn linear_navigation_without_wrap() {
        let mut scene = Scene::new();
        let (_, [a, b, _]) = row(&mut scene);
        let mut focus = FocusManager::with_policy(DefaultPolicy {
            wrap: WrapMode::Never,
        });
        focus.register(a);
        focus.register(b);
        focus.focus(&scene, b);
        assert!(!focus.navigate_next(&scene));
        assert_eq!(focus.focused(), Some(b));
    }

    #[test]
    fn ineligible_nodes_are_skipped_and_refused() {
        let mut scene = Scene::new();
        let (_, [a, b, c]) = row(&mut scene);
        let mut focus = registered(&[a, b, c]);
        scene.set_enabled(b, false);

        focus.focus(&scene, a);
        focus.navigate_next(&scene);
        assert_eq!(focus.focused(), Some(c));
        assert!(!focus.focus(&scene, b));
        assert_eq!(focus.focused(), Some(c));

        // Unregistered nodes cannot take focus either.
        let stray = scene.insert(None, NodeDesc::at(IRect::new(0, 50, 10, 10)));
        assert!(!focus.focus(&scene, stray));
    }

    #[test]
    fn hidden_focused_node_still_anchors_navigation() {
        let mut scene = Scene::new();
        let (_, [a, b, c]) = row(&mut scene);
        let mut focus = registered(&[a, b, c]);

        focus.focus(&scene, b);
        scene.set_visible(b, false);
        assert!(focus.navigate_next(&scene));
        assert_eq!(focus.focused(), Some(c), "continues after b, not from the start");

        scene.set_visible(b, true);
        focus.focus(&scene, b);
        scene.set_enabled(b, false);
        assert!(focus.navigate_previous(&scene));
        assert_eq!(focus.focused(), Some(a));

        scene.set_enabled(b, true);
        focus.focus(&scene, b);
        scene.set_visible(b, false);
        assert!(focus.navigate_direction(&scene, Direction::Right));
        assert_eq!(focus.focused(), Some(c), "measured from b, no jump to the first node");

        scene.set_visible(b, true);
        focus.focus(&scene, b);
        scene.set_visible(b, false);
        assert!(focus.navigate_direction(&scene, Direction::Left));
        assert_eq!(focus.focused(), Some(a));
    }

    #[test]
    fn hiding_an_ancestor_makes_nodes_ineligible() {
        let mut scene = Scene::new();
        let (root, [a, b, c]) = row(&mut scene);
        let other = scene.insert(None, NodeDesc::at(IRect::new(0, 200, 20, 20)));
        let mut focus = registered(&[a, b, c, other]);
        scene.set_visible(root, false);

        assert!(focus.focus_first(&scene));
        assert_eq!(focus.focused(), Some(other));
    }

    #[test]
    fn focus_first_clears_when_nothing_is_eligible() {
        let mut scene = Scene::new();
        let (root, [a, ..]) = row(&mut scene);
        let mut focus = registered(&[a]);
        focus.focus(&scene, a);
        scene.set_enabled(root, false);
        assert!(focus.focus_first(&scene));
        assert_eq!(focus.focused(), None);
    }

    #[test]
    fn directional_navigation() {
        let mut scene = Scene::new();
        let (_, [a, b, c]) = row(&mut scene);
        let below = scene.insert(None, NodeDesc::at(IRect::new(30, 60, 20, 20)));
        let mut focus = registered(&[a, b, c, below]);

        // Nothing focused: any direction starts at the first eligible node.
        assert!(focus.navigate_direction(&scene, Direction::Left));
        assert_eq!(focus.focused(), Some(a));

        focus.navigate_direction(&scene, Direction::Right);
        assert_eq!(focus.focused(), Some(b));
        focus.navigate_direction(&scene, Direction::Down);
        assert_eq!(focus.focused(), Some(below));
        focus.navigate_direction(&scene, Direction::Up);
        assert_eq!(focus.focused(), Some(b));

        // The row ends here; arrows never wrap.
        focus.focus(&scene, c);
        assert!(!focus.navigate_direction(&scene, Direction::Right));
        assert_eq!(focus.focused(), Some(c));
    }

    #[test]
    fn listeners_see_previous_and_current() {
        let mut scene = Scene::new();
        let (_, [a, b, _]) = row(&mut scene);
        let mut focus = registered(&[a, b]);
        let changes = record(&mut focus);

        focus.focus(&scene, a);
        focus.focus(&scene, a);
        focus.focus(&scene, b);
        focus.clear_focus();
        focus.clear_focus();
        assert_eq!(
            *changes.borrow(),
            [(None, Some(a)), (Some(a), Some(b)), (Some(b), None)]
        );
    }

    #[test]
    fn removed_listener_is_silent() {
        let mut scene = Scene::new();
        let (_, [a, ..]) = row(&mut scene);
        let mut focus = registered(&[a]);
        let hits = Rc::new(RefCell::new(0));
        let counter = hits.clone();
        let id = focus.add_listener(move |_, _| *counter.borrow_mut() += 1);
        assert!(focus.remove_listener(id));
        assert!(!focus.remove_listener(id));
        focus.focus(&scene, a);
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn unregister_clears_focus_and_notifies() {
        let mut scene = Scene::new();
        let (_, [a, b, _]) = row(&mut scene);
        let mut focus = registered(&[a, b]);
        focus.focus(&scene, a);
        let changes = record(&mut focus);

        focus.unregister(a);
        assert!(!focus.is_registered(a));
        assert_eq!(focus.focused(), None);
        assert_eq!(*changes.borrow(), [(Some(a), None)]);
        assert_eq!(focus.focusables(), &[b]);
    }

    #[test]
    fn register_ignores_duplicates() {
        let mut scene = Scene::new();
        let (_, [a, ..]) = row(&mut scene);
        let mut focus = registered(&[a, a]);
        focus.register(a);
        assert_eq!(focus.focusables(), &[a]);
    }

    #[test]
    fn context_push_and_pop_restore_state() {
        let mut scene = Scene::new();
        let (_, [a, b, _]) = row(&mut scene);
        let dialog = scene.insert(None, NodeDesc::at(IRect::new(50, 50, 100, 50)));
        let ok = scene.insert(Some(dialog), NodeDesc::relative(10, 10, 30, 20));
        let cancel = scene.insert(Some(dialog), NodeDesc::relative(60, 10, 30, 20));

        let mut focus = registered(&[a, b]);
        focus.focus(&scene, b);
        let outer = record(&mut focus);

        focus.push_context("confirm");
        assert!(outer.borrow().is_empty(), "push does not notify");
        assert_eq!(focus.focused(), None);
        assert!(focus.focusables().is_empty());
        assert_eq!(focus.context_depth(), 1);
        assert_eq!(focus.context_names().collect::<Vec<_>>(), ["confirm"]);

        focus.register(ok);
        focus.register(cancel);
        let inner = record(&mut focus);
        focus.focus_first(&scene);
        focus.navigate_next(&scene);
        assert_eq!(focus.focused(), Some(cancel));
        assert!(outer.borrow().is_empty(), "outer listeners are suspended");
        assert_eq!(*inner.borrow(), [(None, Some(ok)), (Some(ok), Some(cancel))]);

        assert_eq!(focus.pop_context(), Some("confirm".to_owned()));
        assert_eq!(focus.focused(), Some(b));
        assert_eq!(focus.focusables(), &[a, b]);
        assert_eq!(*outer.borrow(), [(Some(cancel), Some(b))]);
        assert_eq!(inner.borrow().len(), 2, "inner listeners went with their context");
        assert_eq!(focus.pop_context(), None);
    }

    #[test]
    fn named_pop_checks_the_top() {
        let mut scene = Scene::new();
        let (_, [a, ..]) = row(&mut scene);
        let mut focus = registered(&[a]);

        assert_eq!(
            focus.pop_context_named("menu"),
            Err(FocusError::NoContext {
                expected: "menu".into()
            })
        );

        focus.push_context("menu");
        focus.push_context("dialog");
        assert_eq!(
            focus.pop_context_named("menu"),
            Err(FocusError::ContextMismatch {
                expected: "menu".into(),
                found: "dialog".into(),
            })
        );
        assert_eq!(focus.context_depth(), 2, "mismatch leaves the stack alone");

        assert_eq!(focus.pop_context_named("dialog"), Ok("dialog".into()));
        assert_eq!(focus.pop_context_named("menu"), Ok("menu".into()));
        assert_eq!(focus.focusables(), &[a]);
    }

    #[test]
    fn prune_forgets_dead_nodes_everywhere() {
        let mut scene = Scene::new();
        let (root, [a, b, c]) = row(&mut scene);
        let mut focus = registered(&[a, b]);
        focus.focus(&scene, a);
        focus.push_context("overlay");
        focus.register(c);
        focus.focus(&scene, c);

        scene.remove(root);
        focus.prune(&scene);
        assert_eq!(focus.focused(), None);
        assert!(focus.focusables().is_empty());

        focus.pop_context();
        assert_eq!(focus.focused(), None);
        assert!(focus.focusables().is_empty());
    }

    #[test]
    fn activate_focused_clicks_the_center() {
        let mut scene = Scene::new();
        let (_, [a, ..]) = row(&mut scene);
        let clicks = Rc::new(RefCell::new(0));
        let counter = clicks.clone();
        scene.set_component(
            a,
            OnClick::new(move |_cx: &mut EventCx<'_>| *counter.borrow_mut() += 1),
        );
        let mut focus = registered(&[a]);

        assert!(!focus.activate_focused(&mut scene), "nothing focused");
        focus.focus(&scene, a);
        assert!(focus.activate_focused(&mut scene));
        assert_eq!(*clicks.borrow(), 1);

        scene.set_enabled(a, false);
        assert!(!focus.activate_focused(&mut scene));
        assert_eq!(*clicks.borrow(), 1);
    }
}
