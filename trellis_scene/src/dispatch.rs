// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Top-most-first input dispatch.
//!
//! Every entry point walks the same order: a node first offers the event to
//! its children from last to first, then to its own component, and the first
//! [`Handled::Consumed`] ends the walk. Hidden or disabled nodes (and their
//! subtrees) never see input.

use kurbo::{Point, Vec2};

use crate::event::{CharEvent, Handled, KeyEvent, MouseButton, PointerEvent, PointerKind};
use crate::tree::{Children, Scene};
use crate::types::{NodeFlags, NodeId};

impl Scene {
    /// Offer a pointer event to every root, top-most first.
    pub fn dispatch_pointer(&mut self, event: &PointerEvent) -> Handled {
        self.track_press(event, |scene| {
            scene.dispatch_roots(&mut |scene, id| scene.offer_pointer(id, event))
        })
    }

    /// Offer a pointer event to the subtree rooted at `id`.
    pub fn dispatch_pointer_to(&mut self, id: NodeId, event: &PointerEvent) -> Handled {
        self.track_press(event, |scene| {
            scene.dispatch_with(id, &mut |scene, id| scene.offer_pointer(id, event))
        })
    }

    /// The node that consumed the outstanding press of `button`, if any.
    ///
    /// Set when a press is consumed and cleared once the matching release has
    /// been dispatched, so release handlers still see it. A press nobody
    /// consumes leaves no target.
    pub fn press_target(&self, button: MouseButton) -> Option<NodeId> {
        self.press_targets
            .iter()
            .find(|(b, _)| *b == button)
            .map(|&(_, id)| id)
    }

    /// Button press at `pos`.
    pub fn pointer_down(
        &mut self,
        pos: impl Into<Point>,
        button: impl Into<MouseButton>,
    ) -> Handled {
        self.dispatch_pointer(&PointerEvent::down(pos, button))
    }

    /// Button release at `pos`.
    pub fn pointer_up(&mut self, pos: impl Into<Point>, button: impl Into<MouseButton>) -> Handled {
        self.dispatch_pointer(&PointerEvent::up(pos, button))
    }

    /// Wheel scroll at `pos`.
    pub fn scroll(&mut self, pos: impl Into<Point>, amount: impl Into<Vec2>) -> Handled {
        self.dispatch_pointer(&PointerEvent::new(pos, PointerKind::Scroll(amount.into())))
    }

    /// Pointer movement with `button` held.
    pub fn drag(
        &mut self,
        pos: impl Into<Point>,
        button: impl Into<MouseButton>,
        delta: impl Into<Vec2>,
    ) -> Handled {
        let kind = PointerKind::Drag {
            button: button.into(),
            delta: delta.into(),
        };
        self.dispatch_pointer(&PointerEvent::new(pos, kind))
    }

    /// Offer a key event to every root, top-most first.
    pub fn key(&mut self, event: impl Into<KeyEvent>) -> Handled {
        let event = event.into();
        self.dispatch_roots(&mut |scene, id| {
            scene
                .with_component(id, |c, cx| c.on_key(cx, &event))
                .unwrap_or_default()
        })
    }

    /// Offer a key event to the subtree rooted at `id`.
    pub fn dispatch_key_to(&mut self, id: NodeId, event: &KeyEvent) -> Handled {
        self.dispatch_with(id, &mut |scene, id| {
            scene
                .with_component(id, |c, cx| c.on_key(cx, event))
                .unwrap_or_default()
        })
    }

    /// Offer a typed character to every root, top-most first.
    pub fn char_typed(&mut self, event: impl Into<CharEvent>) -> Handled {
        let event = event.into();
        self.dispatch_roots(&mut |scene, id| {
            scene
                .with_component(id, |c, cx| c.on_char(cx, &event))
                .unwrap_or_default()
        })
    }

    fn dispatch_roots(&mut self, own: &mut dyn FnMut(&mut Self, NodeId) -> Handled) -> Handled {
        let roots: Children = self.roots().iter().copied().collect();
        for &root in roots.iter().rev() {
            if self.dispatch_with(root, own).is_consumed() {
                return Handled::Consumed;
            }
        }
        Handled::Ignored
    }

    fn dispatch_with(
        &mut self,
        id: NodeId,
        own: &mut dyn FnMut(&mut Self, NodeId) -> Handled,
    ) -> Handled {
        let Some(node) = self.node_opt(id) else {
            return Handled::Ignored;
        };
        if !node.is_live_for_input() {
            return Handled::Ignored;
        }
        // Handlers may restructure the scene; walk a snapshot.
        let children = node.children.clone();
        for &child in children.iter().rev() {
            if self.dispatch_with(child, own).is_consumed() {
                return Handled::Consumed;
            }
        }
        // A child handler may have removed or hidden this node.
        if !self.node_opt(id).is_some_and(|n| n.is_live_for_input()) {
            return Handled::Ignored;
        }
        let handled = own(self, id);
        if handled.is_consumed() {
            tracing::trace!(?id, "event consumed");
        }
        handled
    }

    fn track_press(
        &mut self,
        event: &PointerEvent,
        run: impl FnOnce(&mut Self) -> Handled,
    ) -> Handled {
        if let PointerKind::Down(button) = event.kind {
            self.press_targets.retain(|(b, _)| *b != button);
        }
        let handled = run(self);
        if let PointerKind::Up(button) = event.kind {
            self.press_targets.retain(|(b, _)| *b != button);
        }
        handled
    }

    fn offer_pointer(&mut self, id: NodeId, event: &PointerEvent) -> Handled {
        let Some(bounds) = self.bounds(id) else {
            return Handled::Ignored;
        };
        let event = PointerEvent {
            hit: bounds.contains(event.pos),
            ..*event
        };
        let mut handled = self
            .with_component(id, |c, cx| c.on_pointer(cx, &event))
            .unwrap_or_default();
        if !handled.is_consumed()
            && event.hit
            && self
                .flags(id)
                .is_some_and(|flags| flags.contains(NodeFlags::BLOCKS_INPUT))
        {
            tracing::trace!(?id, "pointer blocked");
            handled = Handled::Consumed;
        }
        if handled.is_consumed()
            && let PointerKind::Down(button) = event.kind
        {
            self.press_targets.retain(|(b, _)| *b != button);
            self.press_targets.push((button, id));
        }
        handled
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::component::{Component, EventCx, OnClick};
    use crate::event::Modifiers;
    use crate::types::{IRect, NodeDesc};

    type Log = Rc<RefCell<Vec<&'static str>>>;

    /// Records every event it sees and answers with a fixed result.
    struct Probe {
        name: &'static str,
        log: Log,
        result: Handled,
    }

    impl Probe {
        fn new(name: &'static str, log: &Log, result: Handled) -> Self {
            Self {
                name,
                log: log.clone(),
                result,
            }
        }
    }

    impl Component for Probe {
        fn on_pointer(&mut self, _cx: &mut EventCx<'_>, _event: &PointerEvent) -> Handled {
            self.log.borrow_mut().push(self.name);
            self.result
        }

        fn on_key(&mut self, _cx: &mut EventCx<'_>, _event: &KeyEvent) -> Handled {
            self.log.borrow_mut().push(self.name);
            self.result
        }

        fn on_char(&mut self, _cx: &mut EventCx<'_>, _event: &CharEvent) -> Handled {
            self.log.borrow_mut().push(self.name);
            self.result
        }
    }

    fn abs(x: i32, y: i32, w: i32, h: i32) -> NodeDesc {
        NodeDesc::at(IRect::new(x, y, w, h))
    }

    #[test]
    fn children_are_offered_in_reverse_then_parent() {
        let log = Log::default();
        let mut scene = Scene::new();
        let parent = scene.insert(None, abs(0, 0, 100, 100));
        let a = scene.insert(Some(parent), abs(0, 0, 10, 10));
        let b = scene.insert(Some(parent), abs(0, 0, 10, 10));
        let c = scene.insert(Some(parent), abs(0, 0, 10, 10));
        scene.set_component(parent, Probe::new("parent", &log, Handled::Ignored));
        scene.set_component(a, Probe::new("a", &log, Handled::Ignored));
        scene.set_component(b, Probe::new("b", &log, Handled::Ignored));
        scene.set_component(c, Probe::new("c", &log, Handled::Ignored));

        assert_eq!(scene.pointer_down((5.0, 5.0), 0_u8), Handled::Ignored);
        assert_eq!(*log.borrow(), ["c", "b", "a", "parent"]);
    }

    #[test]
    fn first_consumer_stops_the_walk() {
        let log = Log::default();
        let mut scene = Scene::new();
        let parent = scene.insert(None, abs(0, 0, 100, 100));
        let a = scene.insert(Some(parent), abs(0, 0, 10, 10));
        let b = scene.insert(Some(parent), abs(0, 0, 10, 10));
        let c = scene.insert(Some(parent), abs(0, 0, 10, 10));
        scene.set_component(parent, Probe::new("parent", &log, Handled::Ignored));
        scene.set_component(a, Probe::new("a", &log, Handled::Ignored));
        scene.set_component(b, Probe::new("b", &log, Handled::Consumed));
        scene.set_component(c, Probe::new("c", &log, Handled::Ignored));

        assert_eq!(scene.pointer_down((5.0, 5.0), 0_u8), Handled::Consumed);
        assert_eq!(*log.borrow(), ["c", "b"]);
    }

    #[test]
    fn later_roots_see_input_first() {
        let log = Log::default();
        let mut scene = Scene::new();
        let back = scene.insert(None, abs(0, 0, 100, 100));
        let front = scene.insert(None, abs(0, 0, 100, 100));
        scene.set_component(back, Probe::new("back", &log, Handled::Ignored));
        scene.set_component(front, Probe::new("front", &log, Handled::Ignored));

        scene.key((65_i32, 30_i32, Modifiers::empty()));
        scene.char_typed('x');
        assert_eq!(*log.borrow(), ["front", "back", "front", "back"]);
    }

    #[test]
    fn hidden_and_disabled_subtrees_are_skipped() {
        let log = Log::default();
        let mut scene = Scene::new();
        let root = scene.insert(None, abs(0, 0, 100, 100));
        let hidden = scene.insert(Some(root), abs(0, 0, 10, 10));
        let hidden_child = scene.insert(Some(hidden), abs(0, 0, 10, 10));
        let disabled = scene.insert(Some(root), abs(0, 0, 10, 10));
        scene.set_component(hidden_child, Probe::new("hidden_child", &log, Handled::Consumed));
        scene.set_component(disabled, Probe::new("disabled", &log, Handled::Consumed));
        scene.set_visible(hidden, false);
        scene.set_enabled(disabled, false);

        assert_eq!(scene.pointer_down((5.0, 5.0), 0_u8), Handled::Ignored);
        let press = PointerEvent::down((5.0, 5.0), 0_u8);
        assert_eq!(scene.dispatch_pointer_to(disabled, &press), Handled::Ignored);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn empty_node_is_ignored() {
        let mut scene = Scene::new();
        let n = scene.insert(None, abs(0, 0, 10, 10));
        assert_eq!(scene.pointer_down((5.0, 5.0), 0_u8), Handled::Ignored);
        let key = KeyEvent::from((1_i32, 1_i32, 0_u32));
        assert_eq!(scene.dispatch_key_to(n, &key), Handled::Ignored);
    }

    #[test]
    fn blocking_node_stops_click_through() {
        let clicks = Rc::new(RefCell::new(0_u32));
        let mut scene = Scene::new();
        let background = scene.insert(None, abs(0, 0, 200, 200));
        let counter = clicks.clone();
        scene.set_component(
            background,
            OnClick::new(move |_cx: &mut EventCx<'_>| *counter.borrow_mut() += 1),
        );
        let modal = scene.insert(None, abs(50, 50, 100, 100));

        // Without blocking, the click falls through the modal to the background.
        scene.pointer_down((60.0, 60.0), 0_u8);
        scene.pointer_up((60.0, 60.0), 0_u8);
        assert_eq!(*clicks.borrow(), 1);

        scene.set_blocks_input(modal, true);
        assert_eq!(scene.pointer_down((60.0, 60.0), 0_u8), Handled::Consumed);
        assert_eq!(scene.pointer_up((60.0, 60.0), 0_u8), Handled::Consumed);
        assert_eq!(*clicks.borrow(), 1);

        // Outside the modal the background still receives clicks.
        scene.pointer_down((10.0, 10.0), 0_u8);
        scene.pointer_up((10.0, 10.0), 0_u8);
        assert_eq!(*clicks.borrow(), 2);
    }

    #[test]
    fn blocking_only_applies_to_pointer_events() {
        let mut scene = Scene::new();
        let modal = scene.insert(None, abs(0, 0, 100, 100));
        scene.set_blocks_input(modal, true);
        assert_eq!(scene.key((1_i32, 1_i32, 0_u32)), Handled::Ignored);
        assert_eq!(scene.char_typed('a'), Handled::Ignored);
        assert_eq!(scene.scroll((5.0, 5.0), (0.0, 1.0)), Handled::Consumed);
    }

    struct HitRecorder(Rc<RefCell<Vec<bool>>>);

    impl Component for HitRecorder {
        fn on_pointer(&mut self, _cx: &mut EventCx<'_>, event: &PointerEvent) -> Handled {
            self.0.borrow_mut().push(event.hit);
            Handled::Ignored
        }
    }

    #[test]
    fn hit_flag_is_per_node() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut scene = Scene::new();
        let root = scene.insert(None, abs(0, 0, 100, 100));
        let child = scene.insert(Some(root), abs(0, 0, 10, 10));
        scene.set_component(root, HitRecorder(hits.clone()));
        scene.set_component(child, HitRecorder(hits.clone()));

        scene.drag((50.0, 50.0), 0_u8, (1.0, 0.0));
        assert_eq!(*hits.borrow(), [false, true]);
    }

    #[test]
    fn handler_may_remove_its_own_node() {
        let mut scene = Scene::new();
        let root = scene.insert(None, abs(0, 0, 100, 100));
        let button = scene.insert(Some(root), abs(0, 0, 10, 10));
        scene.set_component(
            button,
            OnClick::new(|cx: &mut EventCx<'_>| {
                let id = cx.node();
                cx.scene_mut().remove(id);
            }),
        );

        scene.pointer_down((5.0, 5.0), 0_u8);
        assert_eq!(scene.pointer_up((5.0, 5.0), 0_u8), Handled::Consumed);
        assert!(!scene.is_alive(button));
        assert!(scene.children_of(root).is_empty());
        // Later input runs cleanly against the shrunken scene.
        assert_eq!(scene.pointer_down((5.0, 5.0), 0_u8), Handled::Ignored);
    }

    #[test]
    fn handler_may_hide_its_parent() {
        let log = Log::default();
        let mut scene = Scene::new();
        let panel = scene.insert(None, abs(0, 0, 100, 100));
        scene.set_component(panel, Probe::new("panel", &log, Handled::Consumed));
        let close = scene.insert(Some(panel), abs(0, 0, 10, 10));
        scene.set_component(
            close,
            OnClick::new(move |cx: &mut EventCx<'_>| {
                let id = cx.node();
                if let Some(p) = cx.scene().parent_of(id) {
                    cx.scene_mut().set_visible(p, false);
                }
            }),
        );

        scene.pointer_down((5.0, 5.0), 0_u8);
        scene.pointer_up((5.0, 5.0), 0_u8);
        assert_eq!(scene.flags(panel).map(|f| f.contains(NodeFlags::VISIBLE)), Some(false));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn click_requires_press_and_release_inside() {
        let clicks = Rc::new(RefCell::new(0_u32));
        let mut scene = Scene::new();
        let root = scene.insert(None, abs(0, 0, 100, 100));
        let button = scene.insert(Some(root), abs(0, 0, 10, 10));
        let counter = clicks.clone();
        scene.set_component(
            button,
            OnClick::new(move |_cx: &mut EventCx<'_>| *counter.borrow_mut() += 1),
        );

        scene.pointer_down((5.0, 5.0), 0_u8);
        scene.pointer_up((50.0, 50.0), 0_u8);
        assert_eq!(*clicks.borrow(), 0);

        scene.pointer_down((50.0, 50.0), 0_u8);
        scene.pointer_up((5.0, 5.0), 0_u8);
        assert_eq!(*clicks.borrow(), 0);

        scene.pointer_down((5.0, 5.0), 1_u8);
        scene.pointer_up((5.0, 5.0), 1_u8);
        assert_eq!(*clicks.borrow(), 0, "secondary button is not a primary click");

        scene.pointer_down((5.0, 5.0), 0_u8);
        scene.pointer_up((5.0, 5.0), 0_u8);
        assert_eq!(*clicks.borrow(), 1);
    }

    #[test]
    fn release_swallowed_by_overlay_does_not_leave_button_armed() {
        let clicks = Rc::new(RefCell::new(0_u32));
        let mut scene = Scene::new();
        let button = scene.insert(None, abs(0, 0, 40, 40));
        let counter = clicks.clone();
        scene.set_component(
            button,
            OnClick::new(move |_cx: &mut EventCx<'_>| *counter.borrow_mut() += 1),
        );
        let overlay = scene.insert(None, abs(100, 0, 40, 40));
        scene.set_blocks_input(overlay, true);

        scene.pointer_down((10.0, 10.0), 0_u8);
        assert_eq!(scene.press_target(MouseButton::Primary), Some(button));
        // The overlay takes the release, so the button never sees it.
        assert_eq!(scene.pointer_up((110.0, 10.0), 0_u8), Handled::Consumed);
        assert_eq!(scene.press_target(MouseButton::Primary), None);

        scene.pointer_down((110.0, 10.0), 0_u8);
        assert_eq!(scene.press_target(MouseButton::Primary), Some(overlay));
        scene.pointer_up((10.0, 10.0), 0_u8);
        assert_eq!(*clicks.borrow(), 0, "the button was never pressed");

        scene.pointer_down((10.0, 10.0), 0_u8);
        scene.pointer_up((10.0, 10.0), 0_u8);
        assert_eq!(*clicks.borrow(), 1);
    }

    #[test]
    fn unconsumed_press_leaves_no_target() {
        let mut scene = Scene::new();
        let button = scene.insert(None, abs(0, 0, 40, 40));
        scene.set_component(button, OnClick::new(|_cx: &mut EventCx<'_>| {}));

        scene.pointer_down((10.0, 10.0), 0_u8);
        assert_eq!(scene.press_target(MouseButton::Primary), Some(button));
        assert_eq!(scene.press_target(MouseButton::Secondary), None);
        scene.pointer_down((200.0, 200.0), 0_u8);
        assert_eq!(scene.press_target(MouseButton::Primary), None);
    }
}
