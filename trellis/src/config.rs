// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use trellis_scene::{IRect, SceneConfig};

/// Settings for a [`Ui`](crate::Ui).
#[derive(Clone, Debug)]
pub struct UiConfig {
    /// Scene-wide settings (tooltip delay and style).
    pub scene: SceneConfig,
    /// Analog values with a smaller magnitude are ignored.
    ///
    /// Defaults to 0.25.
    pub analog_dead_zone: f64,
    /// Scroll speed at full analog deflection, in pixels per second.
    ///
    /// Defaults to 600.
    pub analog_scroll_speed: f64,
    /// Area tooltips are kept inside.
    ///
    /// Defaults to 1280x720 at the origin; hosts should set this to their surface size.
    pub viewport: IRect,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            scene: SceneConfig::default(),
            analog_dead_zone: 0.25,
            analog_scroll_speed: 600.0,
            viewport: IRect::new(0, 0, 1280, 720),
        }
    }
}

impl UiConfig {
    /// Replace the scene settings.
    pub fn with_scene(mut self, scene: SceneConfig) -> Self {
        self.scene = scene;
        self
    }

    /// Set the default tooltip hover delay.
    pub fn with_tooltip_delay(mut self, delay_ms: u64) -> Self {
        self.scene.tooltip_delay_ms = delay_ms;
        self
    }

    /// Set the analog dead zone.
    pub fn with_analog_dead_zone(mut self, dead_zone: f64) -> Self {
        self.analog_dead_zone = dead_zone;
        self
    }

    /// Set the full-deflection analog scroll speed.
    pub fn with_analog_scroll_speed(mut self, pixels_per_second: f64) -> Self {
        self.analog_scroll_speed = pixels_per_second;
        self
    }

    /// Set the tooltip viewport.
    pub fn with_viewport(mut self, viewport: IRect) -> Self {
        self.viewport = viewport;
        self
    }
}
