// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Focus: keyboard and gamepad focus for Trellis scenes.
//!
//! This crate models focus navigation in two layers:
//! - **Policies** ([`FocusPolicy`]) pick the next focused node given an origin, a
//!   [`Navigation`] intent, and a read-only snapshot of candidates ([`FocusSpace`]).
//!   They know nothing about scenes and are generic over the identifier type.
//! - The **manager** ([`FocusManager`]) owns registration, the focused node, change
//!   listeners, and a stack of saved focus contexts for modal overlays. It builds a
//!   [`FocusSpace`] from a [`trellis_scene::Scene`] on every navigation, so geometry
//!   and eligibility are always current.
//!
//! ## Minimal example
//!
//! Two buttons laid out left-to-right, navigated with the default policy:
//!
//! ```rust
//! use kurbo::Rect;
//! use trellis_focus::{DefaultPolicy, FocusEntry, FocusPolicy, FocusSpace, Navigation, WrapMode};
//!
//! let entries = [
//!     FocusEntry::new(1_u32, Rect::new(0.0, 0.0, 10.0, 10.0)),
//!     FocusEntry::new(2_u32, Rect::new(20.0, 0.0, 30.0, 10.0)),
//! ];
//! let space = FocusSpace { nodes: &entries };
//! let policy = DefaultPolicy { wrap: WrapMode::Wrap };
//!
//! // Tab moves from the first button to the second…
//! assert_eq!(policy.next(Some(1), Navigation::Next, &space), Some(2));
//! // …and wraps back to the first.
//! assert_eq!(policy.next(Some(2), Navigation::Next, &space), Some(1));
//! // Right arrow finds the neighbor geometrically.
//! assert_eq!(policy.next(Some(1), Navigation::Right, &space), Some(2));
//! ```
//!
//! ## Contexts
//!
//! Opening a modal pushes a named context: the manager saves its registrations, focus, and
//! listeners, and starts empty. Closing the modal pops the context and everything comes back,
//! including the previously focused node.
//!
//! ```rust
//! use trellis_focus::FocusManager;
//! use trellis_scene::{IRect, NodeDesc, Scene};
//!
//! let mut scene = Scene::new();
//! let play = scene.insert(None, NodeDesc::at(IRect::new(0, 0, 80, 20)));
//! let ok = scene.insert(None, NodeDesc::at(IRect::new(0, 40, 80, 20)));
//!
//! let mut focus = FocusManager::new();
//! focus.register(play);
//! focus.focus(&scene, play);
//!
//! focus.push_context("dialog");
//! focus.register(ok);
//! focus.focus_first(&scene);
//! assert_eq!(focus.focused(), Some(ok));
//!
//! assert_eq!(focus.pop_context_named("dialog"), Ok("dialog".to_owned()));
//! assert_eq!(focus.focused(), Some(play));
//! ```

use kurbo::Rect;

mod error;
mod manager;

pub use error::FocusError;
pub use manager::{FocusManager, ListenerId};

/// Direction of focus navigation.
///
/// These values represent high-level navigation intents such as Tab/Shift+Tab and
/// arrow-key or D-pad movement. Concrete policies interpret them according to their own rules.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Move to the next candidate in registration order (for example, Tab).
    Next,
    /// Move to the previous candidate in registration order (for example, Shift+Tab).
    Prev,
    /// Move up relative to the current focus.
    Up,
    /// Move down relative to the current focus.
    Down,
    /// Move left relative to the current focus.
    Left,
    /// Move right relative to the current focus.
    Right,
}

/// A spatial navigation direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards smaller y.
    Up,
    /// Towards larger y.
    Down,
    /// Towards smaller x.
    Left,
    /// Towards larger x.
    Right,
}

impl From<Direction> for Navigation {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::Up,
            Direction::Down => Self::Down,
            Direction::Left => Self::Left,
            Direction::Right => Self::Right,
        }
    }
}

/// A single focusable candidate within a [`FocusSpace`].
#[derive(Clone, Debug)]
pub struct FocusEntry<K> {
    /// Identifier for this focusable node.
    pub id: K,
    /// Bounds in the coordinate space of the surrounding [`FocusSpace`].
    pub rect: Rect,
    /// Whether this node can take focus right now.
    ///
    /// Disabled entries keep their place in the order but are skipped.
    pub enabled: bool,
}

impl<K> FocusEntry<K> {
    /// An enabled entry.
    pub fn new(id: K, rect: Rect) -> Self {
        Self {
            id,
            rect,
            enabled: true,
        }
    }
}

/// A read-only view of focusable candidates, in registration order.
///
/// Policies should treat it as an immutable snapshot.
#[derive(Clone, Debug)]
pub struct FocusSpace<'a, K> {
    /// Focusable candidates.
    pub nodes: &'a [FocusEntry<K>],
}

/// Wrap mode configuration for linear traversal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Reaching the end of the sequence yields no next candidate.
    Never,
    /// Stepping past either end continues from the other.
    #[default]
    Wrap,
}

/// Trait for focus traversal policies.
///
/// A policy receives a navigation intent, the current origin (if anything is
/// focused), and a read-only view of candidates, and returns the next focused
/// node if any.
pub trait FocusPolicy<K>
where
    K: Copy + Eq,
{
    /// Compute the next focus target.
    fn next(&self, origin: Option<K>, direction: Navigation, space: &FocusSpace<'_, K>)
    -> Option<K>;
}

/// Default focus traversal policy.
///
/// - [`Navigation::Next`] / [`Navigation::Prev`] step through enabled entries in
///   registration order, wrapping according to [`DefaultPolicy::wrap`]. Without an
///   origin, `Next` starts before the first entry and `Prev` after the last.
/// - Arrow directions keep candidates whose center lies in the forward half-plane
///   and within 45° of the axis (`|primary| >= |secondary|`), then pick the closest
///   by Euclidean distance between centers, the earliest registered on ties. There is
///   no fallback: a diagonal neighbor outside the cone is unreachable by arrows.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultPolicy {
    /// Wrap behavior for linear traversal.
    pub wrap: WrapMode,
}

impl<K> FocusPolicy<K> for DefaultPolicy
where
    K: Copy + Eq,
{
    fn next(
        &self,
        origin: Option<K>,
        direction: Navigation,
        space: &FocusSpace<'_, K>,
    ) -> Option<K> {
        match direction {
            Navigation::Next => next_linear(origin, space, self.wrap, Step::Forward),
            Navigation::Prev => next_linear(origin, space, self.wrap, Step::Backward),
            Navigation::Up | Navigation::Down | Navigation::Left | Navigation::Right => {
                next_directional(origin?, direction, space)
            }
        }
    }
}

#[derive(Copy, Clone)]
enum Step {
    Forward,
    Backward,
}

fn next_linear<K>(
    origin: Option<K>,
    space: &FocusSpace<'_, K>,
    wrap: WrapMode,
    step: Step,
) -> Option<K>
where
    K: Copy + Eq,
{
    let nodes = space.nodes;
    let origin_pos = origin.and_then(|o| nodes.iter().position(|e| e.id == o));
    let len = nodes.len();

    // Positions to try, in order, excluding the origin itself.
    let candidates: Box<dyn Iterator<Item = usize>> = match (step, origin_pos) {
        (Step::Forward, None) => Box::new(0..len),
        (Step::Backward, None) => Box::new((0..len).rev()),
        (Step::Forward, Some(pos)) => {
            let tail = pos + 1..len;
            match wrap {
                WrapMode::Never => Box::new(tail),
                WrapMode::Wrap => Box::new(tail.chain(0..pos)),
            }
        }
        (Step::Backward, Some(pos)) => {
            let head = (0..pos).rev();
            match wrap {
                WrapMode::Never => Box::new(head),
                WrapMode::Wrap => Box::new(head.chain((pos + 1..len).rev())),
            }
        }
    };

    candidates
        .map(|i| &nodes[i])
        .find(|e| e.enabled)
        .map(|e| e.id)
}

fn next_directional<K>(origin: K, direction: Navigation, space: &FocusSpace<'_, K>) -> Option<K>
where
    K: Copy + Eq,
{
    let nodes = space.nodes;
    let oc = nodes.iter().find(|e| e.id == origin)?.rect.center();

    let mut best: Option<(f64, K)> = None;
    for candidate in nodes {
        if !candidate.enabled || candidate.id == origin {
            continue;
        }
        let cc = candidate.rect.center();
        let dx = cc.x - oc.x;
        let dy = cc.y - oc.y;

        let (primary, secondary, forward_sign) = match direction {
            Navigation::Right => (dx, dy, 1.0),
            Navigation::Left => (dx, dy, -1.0),
            Navigation::Down => (dy, dx, 1.0),
            Navigation::Up => (dy, dx, -1.0),
            Navigation::Next | Navigation::Prev => return None,
        };

        // Forward half-plane, within 45° of the axis.
        if forward_sign * primary < 0.0 || primary.abs() < secondary.abs() {
            continue;
        }

        let distance = dx.hypot(dy);
        if !distance.is_finite() {
            continue;
        }
        // Strict comparison keeps the earliest registered on ties.
        if best.is_none_or(|(d, _)| distance < d) {
            best = Some((distance, candidate.id));
        }
    }

    best.map(|(_, id)| id)
}
