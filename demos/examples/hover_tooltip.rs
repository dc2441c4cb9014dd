// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover-delay tooltips and animated values on a manual clock.
//!
//! This example drives a `Ui` with a `ManualClock` so every frame is deterministic, renders into
//! a canvas that prints its draw calls, and shows:
//! - a rich tooltip appearing once the pointer has rested for the hover delay,
//! - a tooltip flipping to stay inside the viewport,
//! - a namespaced animation easing out and expiring over two ticks.
//!
//! Run:
//! - `cargo run -p trellis_demos --example hover_tooltip`

use std::env;
use std::sync::Arc;

use kurbo::Point;
use tracing::info;
use tracing_subscriber::EnvFilter;
use trellis::trellis_scene::{RichTooltip, TooltipLine};
use trellis::{
    Argb, Canvas, DrawCx, Easing, GradientDirection, IRect, ManualClock, NodeDesc, TextAlign, Ui,
    UiConfig,
};

/// Prints every draw call instead of rasterizing.
struct PrintCanvas;

impl Canvas for PrintCanvas {
    fn fill_rect(&mut self, rect: IRect, color: Argb) {
        println!("  fill_rect {rect:?} {color:?}");
    }

    fn fill_rounded_rect(&mut self, rect: IRect, radius: f64, color: Argb) {
        println!("  fill_rounded_rect {rect:?} r={radius} {color:?}");
    }

    fn stroke_rounded_rect(&mut self, rect: IRect, radius: f64, width: f64, color: Argb) {
        println!("  stroke_rounded_rect {rect:?} r={radius} w={width} {color:?}");
    }

    fn fill_gradient(&mut self, rect: IRect, from: Argb, to: Argb, direction: GradientDirection) {
        println!("  fill_gradient {rect:?} {from:?}..{to:?} {direction:?}");
    }

    fn draw_text(&mut self, text: &str, origin: Point, scale: f64, align: TextAlign, _color: Argb) {
        println!("  draw_text {text:?} at ({}, {}) x{scale} {align:?}", origin.x, origin.y);
    }

    fn text_width(&self, text: &str) -> f64 {
        6.0 * text.chars().count() as f64
    }

    fn push_clip(&mut self, rect: IRect) {
        println!("  push_clip {rect:?}");
    }

    fn pop_clip(&mut self) {
        println!("  pop_clip");
    }
}

/// A button face that lights up under the pointer.
struct Button {
    label: &'static str,
}

impl trellis::Component for Button {
    fn draw(&mut self, cx: &mut DrawCx<'_>) {
        let color = if cx.hovered { Argb(0xFF3A_5FCD) } else { Argb(0xFF2A_2A2A) };
        cx.canvas.fill_rounded_rect(cx.bounds, 3.0, color);
        let center = cx.bounds.center();
        cx.canvas
            .draw_text(self.label, center, 1.0, TextAlign::Center, Argb::WHITE);
    }
}

/// This example logs at info, everything else at warn. `RUST_LOG` directives are appended.
const DEFAULT_FILTER: &str = "warn,hover_tooltip=info";

fn init_logging() {
    let mut filter = DEFAULT_FILTER.to_owned();
    if let Ok(env_filter) = env::var(EnvFilter::DEFAULT_ENV) {
        filter.push(',');
        filter.push_str(&env_filter);
    }
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(EnvFilter::new(filter))
        .init();
}

fn main() {
    init_logging();

    let clock = Arc::new(ManualClock::new(0));
    let config = UiConfig::default().with_viewport(IRect::new(0, 0, 320, 200));
    let mut ui = Ui::with_clock(config, clock.clone());

    let tooltip = RichTooltip {
        title: Some(TooltipLine::colored("Forge", Argb(0xFFFF_D700))),
        lines: vec![
            TooltipLine::new("Combine two items."),
            TooltipLine::colored("Costs 40 gold", Argb(0xFFAA_AAAA)),
        ],
    };
    let forge = ui
        .scene_mut()
        .insert(None, NodeDesc::at(IRect::new(20, 20, 80, 24)).with_tooltip(tooltip));
    ui.scene_mut().set_component(forge, Button { label: "Forge" });
    let corner = ui.scene_mut().insert(
        None,
        NodeDesc::at(IRect::new(260, 160, 50, 30)).with_tooltip("Settings"),
    );
    ui.scene_mut().set_component(corner, Button { label: "Gear" });

    let fade = ui.anims().scope("hud");
    fade.start("banner", 0.0, 1.0, 300, Easing::EaseOut);

    for (label, pointer) in [
        ("enter forge", (30.0, 30.0)),
        ("rest", (30.0, 30.0)),
        ("rest", (30.0, 30.0)),
        ("move to corner", (300.0, 180.0)),
        ("rest", (300.0, 180.0)),
        ("rest", (300.0, 180.0)),
    ] {
        info!(now_ms = ui.now_ms(), label, "frame");
        let shown = ui.render(&mut PrintCanvas, pointer, 0.25);
        let banner = ui.anims().scope("hud").get01("banner");
        info!(tooltip = ?shown, banner, "frame drawn");
        clock.advance(250);
        info!(removed = ui.tick(), "tick");
    }
}
