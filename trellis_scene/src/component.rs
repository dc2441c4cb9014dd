// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node behavior: the [`Component`] capability trait and its contexts.
//!
//! A node carries geometry and flags; what it draws and how it reacts to
//! input lives in an optional boxed [`Component`]. Every capability has an
//! inert default, so a component implements only what it needs:
//!
//! - drawable: [`Component::draw`]
//! - clickable: [`Component::on_pointer`]
//! - keyboard: [`Component::on_key`] / [`Component::on_char`]
//! - scrollable: [`Component::scroll_by`]
//!
//! Focusability is not a component capability; it is registration with a
//! focus manager.

use core::any::Any;
use core::fmt;

use crate::canvas::Canvas;
use crate::event::{CharEvent, Handled, KeyEvent, MouseButton, PointerEvent, PointerKind};
use crate::render::Frame;
use crate::tree::Scene;
use crate::types::{IRect, NodeId};

/// Behavior attached to a scene node.
pub trait Component: Any {
    /// Draw this node. Children are drawn afterwards, on top.
    #[allow(unused_variables, reason = "default implementation draws nothing")]
    fn draw(&mut self, cx: &mut DrawCx<'_>) {}

    /// Handle a pointer event that none of this node's children consumed.
    ///
    /// [`PointerEvent::hit`] tells whether the pointer is inside this node.
    #[allow(unused_variables, reason = "default implementation ignores input")]
    fn on_pointer(&mut self, cx: &mut EventCx<'_>, event: &PointerEvent) -> Handled {
        Handled::Ignored
    }

    /// Handle a key press that none of this node's children consumed.
    #[allow(unused_variables, reason = "default implementation ignores input")]
    fn on_key(&mut self, cx: &mut EventCx<'_>, event: &KeyEvent) -> Handled {
        Handled::Ignored
    }

    /// Handle a typed character that none of this node's children consumed.
    #[allow(unused_variables, reason = "default implementation ignores input")]
    fn on_char(&mut self, cx: &mut EventCx<'_>, event: &CharEvent) -> Handled {
        Handled::Ignored
    }

    /// Scroll this node's content by `dy` pixels. Returns whether the node is
    /// scrollable and took the request.
    #[allow(unused_variables, reason = "default implementation is not scrollable")]
    fn scroll_by(&mut self, cx: &mut EventCx<'_>, dy: f64) -> bool {
        false
    }
}

/// Context passed to [`Component::draw`].
pub struct DrawCx<'a> {
    /// The node being drawn.
    pub node: NodeId,
    /// The node's resolved absolute bounds.
    pub bounds: IRect,
    /// Whether the pointer is inside `bounds` this frame.
    pub hovered: bool,
    /// Per-frame inputs.
    pub frame: &'a Frame,
    /// Drawing target.
    pub canvas: &'a mut dyn Canvas,
}

impl fmt::Debug for DrawCx<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawCx")
            .field("node", &self.node)
            .field("bounds", &self.bounds)
            .field("hovered", &self.hovered)
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

/// Context passed to input handlers.
///
/// While a handler runs, its component is taken out of the node, so the
/// handler has full mutable access to the scene. It may hide, move, or
/// remove nodes, including its own; a component whose node was removed is
/// dropped once the handler returns.
#[derive(Debug)]
pub struct EventCx<'a> {
    pub(crate) scene: &'a mut Scene,
    pub(crate) node: NodeId,
}

impl EventCx<'_> {
    /// The node whose component is handling the event.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The node's current bounds, or [`IRect::ZERO`] if it has been removed.
    pub fn bounds(&self) -> IRect {
        self.scene.bounds(self.node).unwrap_or(IRect::ZERO)
    }

    /// Shared access to the scene.
    pub fn scene(&self) -> &Scene {
        self.scene
    }

    /// Mutable access to the scene.
    pub fn scene_mut(&mut self) -> &mut Scene {
        self.scene
    }
}

/// A component that runs a closure when clicked.
///
/// A click is a press of `button` inside the node followed by a release of
/// the same button inside the node, with this node having consumed the press
/// (see [`Scene::press_target`]). The press and the release are both
/// consumed. Attach one to a container that should react to clicks on its
/// own area, not only on its children.
pub struct OnClick<F> {
    handler: F,
    button: MouseButton,
}

impl<F> OnClick<F>
where
    F: FnMut(&mut EventCx<'_>) + 'static,
{
    /// Run `handler` on primary-button clicks.
    pub fn new(handler: F) -> Self {
        Self::with_button(MouseButton::Primary, handler)
    }

    /// Run `handler` on clicks of `button`.
    pub fn with_button(button: MouseButton, handler: F) -> Self {
        Self {
            handler,
            button,
        }
    }
}

impl<F> fmt::Debug for OnClick<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnClick")
            .field("button", &self.button)
            .finish_non_exhaustive()
    }
}

impl<F> Component for OnClick<F>
where
    F: FnMut(&mut EventCx<'_>) + 'static,
{
    fn on_pointer(&mut self, cx: &mut EventCx<'_>, event: &PointerEvent) -> Handled {
        match event.kind {
            PointerKind::Down(b) if b == self.button && event.hit => Handled::Consumed,
            PointerKind::Up(b)
                if b == self.button
                    && event.hit
                    && cx.scene().press_target(b) == Some(cx.node()) =>
            {
                (self.handler)(cx);
                Handled::Consumed
            }
            _ => Handled::Ignored,
        }
    }
}
