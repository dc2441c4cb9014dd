// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame rendering, hover tracking, and tooltip queries.

use kurbo::Point;

use crate::canvas::Canvas;
use crate::component::DrawCx;
use crate::tooltip::{Tooltip, draw_tooltip};
use crate::tree::{Children, Scene};
use crate::types::{IRect, NodeId};

/// Per-frame information handed to every drawn component.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Pointer position in scene coordinates.
    pub pointer: Point,
    /// Seconds since the previous frame.
    pub delta: f64,
    /// Clock reading for this frame, in milliseconds.
    pub now_ms: u64,
}

impl Frame {
    /// Create a frame.
    pub fn new(pointer: impl Into<Point>, delta: f64, now_ms: u64) -> Self {
        Self {
            pointer: pointer.into(),
            delta,
            now_ms,
        }
    }
}

impl Scene {
    /// Draw every root in paint order and update hover timers.
    pub fn render(&mut self, canvas: &mut dyn Canvas, frame: &Frame) {
        let roots: Children = self.roots().iter().copied().collect();
        for root in roots {
            self.render_node(root, canvas, frame);
        }
    }

    /// Draw the subtree rooted at `id`.
    ///
    /// Hidden nodes are skipped together with their subtree. A visible node
    /// draws itself, updates its hover timer from `frame.pointer`, then draws
    /// its children in insertion order.
    pub fn render_node(&mut self, id: NodeId, canvas: &mut dyn Canvas, frame: &Frame) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if !node.is_visible() {
            return;
        }
        let bounds = node.bounds;
        let inside = bounds.contains(frame.pointer);
        if let Some(component) = node.component.as_mut() {
            component.draw(&mut DrawCx {
                node: id,
                bounds,
                hovered: inside,
                frame,
                canvas: &mut *canvas,
            });
        }
        let was_armed = node.hover.hovered_for(frame.now_ms).is_some();
        node.hover.update(inside, frame.now_ms);
        if inside && !was_armed && node.tooltip.is_some() {
            tracing::trace!(?id, now_ms = frame.now_ms, "tooltip hover armed");
        }
        let children = node.children.clone();
        for child in children {
            self.render_node(child, canvas, frame);
        }
    }

    /// Deepest visible node under `pos` that carries a non-empty tooltip.
    ///
    /// Children are searched before their parent, last child first.
    pub fn tooltip_target(&self, pos: Point) -> Option<NodeId> {
        self.roots()
            .iter()
            .rev()
            .find_map(|&root| self.tooltip_target_in(root, pos))
    }

    fn tooltip_target_in(&self, id: NodeId, pos: Point) -> Option<NodeId> {
        let node = self.node_opt(id)?;
        if !node.is_visible() {
            return None;
        }
        node.children
            .iter()
            .rev()
            .find_map(|&child| self.tooltip_target_in(child, pos))
            .or_else(|| {
                let has_tooltip = node.tooltip.as_ref().is_some_and(|t| !t.is_empty());
                (has_tooltip && node.bounds.contains(pos)).then_some(id)
            })
    }

    /// The tooltip to show for a pointer at `pos`, if it has been hovered long enough.
    ///
    /// Hover time is measured from the frame in which the pointer entered
    /// the node, so this reflects the most recent [`Scene::render`].
    pub fn active_tooltip(&self, pos: Point, now_ms: u64) -> Option<(NodeId, &Tooltip)> {
        let id = self.tooltip_target(pos)?;
        let node = self.node_opt(id)?;
        let delay = node.tooltip_delay_ms.unwrap_or(self.config.tooltip_delay_ms);
        let hovered = node.hover.hovered_for(now_ms)?;
        if hovered < delay {
            return None;
        }
        Some((id, node.tooltip.as_ref()?))
    }

    /// Draw the active tooltip for this frame, if any, on top of everything.
    ///
    /// Returns the box drawn.
    pub fn draw_active_tooltip(
        &self,
        canvas: &mut dyn Canvas,
        frame: &Frame,
        viewport: IRect,
    ) -> Option<IRect> {
        let (_, tooltip) = self.active_tooltip(frame.pointer, frame.now_ms)?;
        draw_tooltip(
            canvas,
            tooltip,
            frame.pointer,
            viewport,
            &self.config.tooltip_style,
        )
    }
}
