// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis: an embeddable, retained-mode UI interaction engine for real-time rendered clients.
//!
//! Trellis is consumed once per rendered frame and once per fixed simulation tick. The host
//! supplies pointer positions, key codes, gamepad edges, and a drawing [`Canvas`]; Trellis decides
//! who receives input, which node has focus, what the animated values are, and when a tooltip
//! appears.
//!
//! The engine is split into three crates, re-exported here:
//!
//! - [`trellis_scene`]: the component tree, top-most-first dispatch, relative positioning, and
//!   hover-delay tooltips.
//! - [`trellis_focus`]: linear and spatial focus navigation with a context stack for modal dialogs.
//! - [`trellis_anim`]: keyed, clock-driven interpolation with easing and two-phase expiry.
//!
//! [`Ui`] ties them together behind one shared clock.
//!
//! ## A frame
//!
//! ```rust
//! use std::sync::Arc;
//! use trellis::{Easing, IRect, ManualClock, NodeDesc, Ui, UiConfig};
//! # use trellis::{Argb, Canvas, GradientDirection, TextAlign};
//! # use kurbo::Point;
//! # struct Null;
//! # impl Canvas for Null {
//! #     fn fill_rect(&mut self, _: IRect, _: Argb) {}
//! #     fn fill_rounded_rect(&mut self, _: IRect, _: f64, _: Argb) {}
//! #     fn stroke_rounded_rect(&mut self, _: IRect, _: f64, _: f64, _: Argb) {}
//! #     fn fill_gradient(&mut self, _: IRect, _: Argb, _: Argb, _: GradientDirection) {}
//! #     fn draw_text(&mut self, _: &str, _: Point, _: f64, _: TextAlign, _: Argb) {}
//! #     fn text_width(&self, text: &str) -> f64 { text.len() as f64 * 6.0 }
//! #     fn push_clip(&mut self, _: IRect) {}
//! #     fn pop_clip(&mut self) {}
//! # }
//! # let mut canvas = Null;
//!
//! let clock = Arc::new(ManualClock::new(0));
//! let mut ui = Ui::with_clock(UiConfig::default(), clock.clone());
//! ui.scene_mut()
//!     .insert(None, NodeDesc::at(IRect::new(0, 0, 100, 30)).with_tooltip("Start a new game"));
//! ui.anims().scope("menu").start("fade", 0.0, 1.0, 200, Easing::EaseOut);
//!
//! // The pointer rests on the button; after the hover delay the tooltip shows.
//! assert_eq!(ui.render(&mut canvas, (10.0, 10.0), 0.016), None);
//! clock.advance(500);
//! assert!(ui.render(&mut canvas, (10.0, 10.0), 0.016).is_some());
//! assert_eq!(ui.anims().scope("menu").get01("fade"), 1.0);
//!
//! // Finished animations are dropped over two ticks.
//! assert_eq!(ui.tick(), 0);
//! assert_eq!(ui.tick(), 1);
//! ```

mod config;
mod input;
mod ui;

pub use config::UiConfig;
pub use input::{GamepadState, NavInput};
pub use ui::Ui;

pub use trellis_anim::{self, AnimHandle, Animations, Clock, Easing, ManualClock, MonotonicClock};
pub use trellis_focus::{self, Direction, FocusManager, Navigation};
pub use trellis_scene::{
    self, Argb, Canvas, Component, DrawCx, EventCx, Frame, GradientDirection, Handled, IRect,
    KeyEvent, Modifiers, MouseButton, NodeDesc, NodeFlags, NodeId, OnClick, PointerEvent, Scene,
    SceneConfig, TextAlign, Tooltip,
};
