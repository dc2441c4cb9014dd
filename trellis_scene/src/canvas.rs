// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing capability consumed by the scene.
//!
//! The scene never produces pixels itself. Hosts implement [`Canvas`] over
//! whatever renderer they have and pass it to [`Scene::render`](crate::Scene::render).

use kurbo::Point;

use crate::types::IRect;

/// A 32-bit color in `0xAARRGGBB` layout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Argb(pub u32);

impl Argb {
    /// Opaque white.
    pub const WHITE: Self = Self(0xFFFF_FFFF);
    /// Opaque black.
    pub const BLACK: Self = Self(0xFF00_0000);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self(0);

    /// Build a color from its channels.
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Alpha channel.
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self((self.0 & 0x00FF_FFFF) | ((alpha as u32) << 24))
    }
}

/// Direction of a two-stop gradient.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GradientDirection {
    /// `from` on the left edge, `to` on the right edge.
    Horizontal,
    /// `from` on the top edge, `to` on the bottom edge.
    Vertical,
}

/// Horizontal anchoring of a text run relative to its origin.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    /// Origin is the left edge of the run.
    #[default]
    Left,
    /// Origin is the horizontal center of the run.
    Center,
}

/// Primitive drawing operations provided by the host renderer.
pub trait Canvas {
    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: IRect, color: Argb);

    /// Fill a rectangle with rounded corners.
    fn fill_rounded_rect(&mut self, rect: IRect, radius: f64, color: Argb);

    /// Stroke the outline of a rounded rectangle.
    fn stroke_rounded_rect(&mut self, rect: IRect, radius: f64, width: f64, color: Argb);

    /// Fill a rectangle with a two-stop linear gradient.
    fn fill_gradient(&mut self, rect: IRect, from: Argb, to: Argb, direction: GradientDirection);

    /// Draw a single line of text at `origin` (top of the line), scaled by `scale`.
    fn draw_text(&mut self, text: &str, origin: Point, scale: f64, align: TextAlign, color: Argb);

    /// Width of `text` at scale `1.0`.
    fn text_width(&self, text: &str) -> f64;

    /// Restrict subsequent drawing to `rect` (intersected with any active clip).
    fn push_clip(&mut self, rect: IRect);

    /// Undo the most recent [`Canvas::push_clip`].
    fn pop_clip(&mut self);

    /// Soft drop shadow around `rect`.
    ///
    /// Drawn as `spread` layered rounded rectangles, outermost first, whose
    /// alpha falls off quadratically with distance from `rect`.
    fn draw_shadow(&mut self, rect: IRect, radius: f64, spread: i32, color: Argb) {
        if spread <= 0 {
            return;
        }
        let base = f64::from(color.alpha());
        for layer in (1..=spread).rev() {
            let falloff = 1.0 - f64::from(layer) / f64::from(spread + 1);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "alpha is clamped to the u8 range before the cast."
            )]
            let alpha = (base * falloff * falloff / f64::from(spread))
                .round()
                .clamp(0.0, 255.0) as u8;
            self.fill_rounded_rect(
                rect.inflate(layer),
                radius + f64::from(layer),
                color.with_alpha(alpha),
            );
        }
    }
}


#[cfg(test)]
mod tests {
    use super::recording::{Op, RecordingCanvas};
    use super::*;

    #[test]
    fn argb_channels() {
        let c = Argb::new(0x80, 0x11, 0x22, 0x33);
        assert_eq!(c, Argb(0x8011_2233));
        assert_eq!(c.alpha(), 0x80);
        assert_eq!(c.with_alpha(0xff), Argb(0xff11_2233));
    }

    #[test]
    fn shadow_layers_fade_outwards() {
        let mut canvas = RecordingCanvas::default();
        let rect = IRect::new(10, 10, 20, 20);
        canvas.draw_shadow(rect, 2.0, 3, Argb(0xff00_0000));

        let layers: Vec<(IRect, u8)> = canvas
            .ops
            .iter()
            .map(|op| match op {
                Op::FillRounded(r, c) => (*r, c.alpha()),
                other => panic!("unexpected op {other:?}"),
            })
            .collect();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0].0, rect.inflate(3), "outermost first");
        assert_eq!(layers[2].0, rect.inflate(1));
        assert!(layers[0].1 < layers[1].1 && layers[1].1 < layers[2].1);
    }

    #[test]
    fn zero_spread_draws_nothing() {
        let mut canvas = RecordingCanvas::default();
        canvas.draw_shadow(IRect::new(0, 0, 5, 5), 1.0, 0, Argb::BLACK);
        assert!(canvas.ops.is_empty());
    }
}
