// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing curves: pure maps from normalized progress to an output fraction.

use core::f64::consts::PI;

/// Overshoot constant used by [`Easing::EaseOutBack`].
pub const BACK_OVERSHOOT: f64 = 1.701_58;

/// Shape of an interpolation over normalized progress `t` in `[0, 1]`.
///
/// Every curve maps `0` to `0` and `1` to `1`. Intermediate values may leave
/// `[0, 1]` ([`Easing::EaseOutBack`] overshoots before settling).
#[derive(Copy, Clone, Debug, Default)]
pub enum Easing {
    /// `t`.
    #[default]
    Linear,
    /// Cubic ease-in, `t³`.
    EaseIn,
    /// Cubic ease-out, `1 - (1 - t)³`.
    EaseOut,
    /// Cubic S-curve.
    EaseInOut,
    /// Overshoots the target and settles back.
    EaseOutBack,
    /// Half a cosine period, `-(cos(πt) - 1) / 2`.
    EaseInOutSine,
    /// Caller-supplied curve. The input is clamped before the call; the output is used as is.
    Custom(fn(f64) -> f64),
}

impl Easing {
    /// Apply the curve to `t`, clamping the input to `[0, 1]` first.
    ///
    /// ```
    /// use trellis_anim::Easing;
    ///
    /// assert_eq!(Easing::Linear.apply(0.25), 0.25);
    /// assert!((Easing::EaseOut.apply(0.5) - 0.875).abs() < 1e-12);
    /// ```
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
            Self::EaseOutBack => {
                let c3 = BACK_OVERSHOOT + 1.0;
                let u = t - 1.0;
                1.0 + c3 * u * u * u + BACK_OVERSHOOT * u * u
            }
            Self::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Self::Custom(f) => f(t),
        }
    }
}

/// Linear interpolation between `from` and `to`.
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}
