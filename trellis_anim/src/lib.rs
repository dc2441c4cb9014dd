// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Anim: keyed value animation driven by a monotonic clock.
//!
//! - [`Easing`]: pure curves mapping progress in `[0, 1]` to an output fraction.
//! - [`Clock`]: millisecond time source; [`MonotonicClock`] for real time,
//!   [`ManualClock`] for tests and hosts that own their own frame clock.
//! - [`Animations`]: a registry of interpolations. Start one to get an opaque
//!   [`AnimHandle`], or use [`Animations::scope`] for namespaced string keys.
//!
//! Values are evaluated from elapsed time on every read, so a skipped frame
//! never desynchronizes an animation. [`Animations::tick`] performs two-phase
//! expiry: finished entries survive one extra tick so their terminal value is
//! observable for at least one render pass.
//!
//! ```
//! use trellis_anim::{Animations, Easing};
//!
//! let anims = Animations::new();
//! let menu = anims.scope("menu");
//! menu.start("open", 0.0, 1.0, 250, Easing::EaseOutBack);
//! let t = menu.get01("open");
//! assert!((0.0..=1.0).contains(&t));
//! ```

mod clock;
mod easing;
mod registry;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use easing::{BACK_OVERSHOOT, Easing, lerp};
pub use registry::{AnimHandle, Animations, Scope};
