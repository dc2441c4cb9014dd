// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Scene: a retained-mode component tree with input dispatch and hover tooltips.
//!
//! Trellis Scene is the structural core of a real-time UI: a host builds a tree of rectangular
//! nodes once, then each frame renders it and forwards raw input to it.
//!
//! - Owns nodes in a generational arena; stale [`NodeId`]s are inert rather than dangling.
//! - Dispatches pointer, key, and character input top-most first with early exit.
//! - Resolves relative and centered positions from stored anchors, so layout is idempotent.
//! - Arms per-node tooltips after a hover delay and draws them on request.
//!
//! ## Not a layout engine
//!
//! Nodes carry integer pixel bounds that the host sets directly. The only automatic geometry is
//! anchoring: a node may sit at a fixed offset from its parent or be centered in it, and moves with
//! the parent. Measurement, flex, and grid policies are out of scope.
//!
//! ## Not a renderer
//!
//! Drawing goes through the [`Canvas`] trait. Hosts implement it over their own renderer; the
//! scene only decides what to draw and in which order.
//!
//! ## API overview
//!
//! - [`Scene`]: node arena, structure, geometry, dispatch, render.
//! - [`NodeDesc`]: construction-time description of a node (bounds, flags, anchor, tooltip).
//! - [`NodeFlags`]: visibility, input enablement, and click-through blocking.
//! - [`Component`]: optional per-node behavior (draw, pointer, key, char, scroll).
//! - [`EventCx`]: what a handler can reach, including the scene itself.
//! - [`Tooltip`] / [`RichTooltip`]: tooltip payloads.
//!
//! Key operations:
//! - [`Scene::insert`] → [`NodeId`], [`Scene::append_child`], [`Scene::remove`]
//! - [`Scene::set_position`] / [`Scene::set_offset`] / [`Scene::center_in_parent`]
//! - [`Scene::pointer_down`] / [`Scene::pointer_up`] / [`Scene::key`] / [`Scene::char_typed`]
//! - [`Scene::render`] then [`Scene::draw_active_tooltip`]
//!
//! ## Example
//!
//! ```rust
//! use trellis_scene::{EventCx, Handled, IRect, NodeDesc, OnClick, Scene};
//!
//! let mut scene = Scene::new();
//! let dialog = scene.insert(None, NodeDesc::at(IRect::new(0, 0, 300, 200)));
//! let close = scene.insert(Some(dialog), NodeDesc::relative(270, 10, 20, 20));
//! scene.set_component(
//!     close,
//!     OnClick::new(move |cx: &mut EventCx<'_>| cx.scene_mut().set_visible(dialog, false)),
//! );
//!
//! assert_eq!(scene.pointer_down((275.0, 15.0), 0_u8), Handled::Consumed);
//! assert_eq!(scene.pointer_up((275.0, 15.0), 0_u8), Handled::Consumed);
//! assert!(!scene.is_effectively_visible(close));
//! ```

mod canvas;
mod component;
mod dispatch;
mod error;
mod event;
mod render;
mod tooltip;
mod tree;
mod types;

pub use canvas::{Argb, Canvas, GradientDirection, TextAlign};
pub use component::{Component, DrawCx, EventCx, OnClick};
pub use error::SceneError;
pub use event::{CharEvent, Handled, KeyEvent, Modifiers, MouseButton, PointerEvent, PointerKind};
pub use render::Frame;
pub use tooltip::{RichTooltip, Tooltip, TooltipLine, TooltipStyle, draw_tooltip};
pub use tree::{Scene, SceneConfig};
pub use types::{IRect, NodeDesc, NodeFlags, NodeId, Position};
