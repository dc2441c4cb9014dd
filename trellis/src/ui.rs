// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use kurbo::{Point, Vec2};
use trellis_anim::{Animations, Clock, MonotonicClock};
use trellis_focus::FocusManager;
use trellis_scene::{Canvas, CharEvent, Frame, Handled, IRect, KeyEvent, MouseButton, NodeId, Scene};

use crate::{NavInput, UiConfig};

/// The per-frame interaction context: one scene, its focus, and its animations.
///
/// All three share one clock, so hover delays and animation progress agree.
///
/// ```rust
/// use std::sync::Arc;
/// use trellis::{IRect, ManualClock, NavInput, NodeDesc, Ui, UiConfig};
///
/// let clock = Arc::new(ManualClock::new(0));
/// let mut ui = Ui::with_clock(UiConfig::default(), clock.clone());
/// let play = ui.scene_mut().insert(None, NodeDesc::at(IRect::new(10, 10, 80, 20)));
/// let quit = ui.scene_mut().insert(None, NodeDesc::at(IRect::new(10, 40, 80, 20)));
/// ui.focus_mut().register(play);
/// ui.focus_mut().register(quit);
///
/// assert!(ui.nav(NavInput::Down));
/// assert_eq!(ui.focus().focused(), Some(play));
/// assert!(ui.nav(NavInput::Down));
/// assert_eq!(ui.focus().focused(), Some(quit));
/// ```
pub struct Ui<C: Clock = MonotonicClock> {
    config: UiConfig,
    scene: Scene,
    focus: FocusManager,
    anims: Animations<Arc<C>>,
    clock: Arc<C>,
}

impl<C: Clock> core::fmt::Debug for Ui<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ui")
            .field("config", &self.config)
            .field("scene", &self.scene)
            .field("focus", &self.focus)
            .field("anims", &self.anims)
            .finish_non_exhaustive()
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui {
    /// Create a context on the real-time clock with default settings.
    pub fn new() -> Self {
        Self::with_config(UiConfig::default())
    }

    /// Create a context on the real-time clock.
    pub fn with_config(config: UiConfig) -> Self {
        Self::with_clock(config, Arc::new(MonotonicClock::new()))
    }
}

impl<C: Clock> Ui<C> {
    /// Create a context driven by `clock`.
    pub fn with_clock(config: UiConfig, clock: Arc<C>) -> Self {
        Self {
            scene: Scene::with_config(config.scene.clone()),
            focus: FocusManager::new(),
            anims: Animations::with_clock(clock.clone()),
            clock,
            config,
        }
    }

    /// Settings this context was created with.
    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// Change the tooltip viewport, for example after a window resize.
    pub fn set_viewport(&mut self, viewport: IRect) {
        self.config.viewport = viewport;
    }

    /// The scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the scene.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The focus manager.
    pub fn focus(&self) -> &FocusManager {
        &self.focus
    }

    /// Mutable access to the focus manager.
    pub fn focus_mut(&mut self) -> &mut FocusManager {
        &mut self.focus
    }

    /// Split borrow of the scene and the focus manager.
    pub fn scene_and_focus(&mut self) -> (&mut Scene, &mut FocusManager) {
        (&mut self.scene, &mut self.focus)
    }

    /// The animation registry.
    pub fn anims(&self) -> &Animations<Arc<C>> {
        &self.anims
    }

    /// The shared clock.
    pub fn clock(&self) -> &Arc<C> {
        &self.clock
    }

    /// Current clock reading in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Render one frame: the scene in paint order, then the active tooltip on top.
    ///
    /// `delta` is the time since the previous frame in seconds. Returns the
    /// tooltip box, if one was drawn.
    pub fn render(
        &mut self,
        canvas: &mut dyn Canvas,
        pointer: impl Into<Point>,
        delta: f64,
    ) -> Option<IRect> {
        let frame = Frame::new(pointer, delta, self.clock.now_ms());
        self.scene.render(canvas, &frame);
        self.scene.draw_active_tooltip(canvas, &frame, self.config.viewport)
    }

    /// Fixed-tick maintenance: expires finished animations.
    ///
    /// Returns the number of animations removed.
    pub fn tick(&self) -> usize {
        self.anims.tick()
    }

    /// Forward a button press.
    pub fn pointer_down(
        &mut self,
        pos: impl Into<Point>,
        button: impl Into<MouseButton>,
    ) -> Handled {
        self.scene.pointer_down(pos, button)
    }

    /// Forward a button release.
    pub fn pointer_up(&mut self, pos: impl Into<Point>, button: impl Into<MouseButton>) -> Handled {
        self.scene.pointer_up(pos, button)
    }

    /// Forward a wheel scroll.
    pub fn scroll(&mut self, pos: impl Into<Point>, amount: impl Into<Vec2>) -> Handled {
        self.scene.scroll(pos, amount)
    }

    /// Forward a drag.
    pub fn drag(
        &mut self,
        pos: impl Into<Point>,
        button: impl Into<MouseButton>,
        delta: impl Into<Vec2>,
    ) -> Handled {
        self.scene.drag(pos, button, delta)
    }

    /// Forward a key event.
    pub fn key(&mut self, event: impl Into<KeyEvent>) -> Handled {
        self.scene.key(event)
    }

    /// Forward a typed character.
    pub fn char_typed(&mut self, event: impl Into<CharEvent>) -> Handled {
        self.scene.char_typed(event)
    }

    /// Apply a navigation command.
    ///
    /// Arrows navigate spatially, `Next`/`Prev` linearly, and `Confirm`
    /// activates the focused node. Returns whether focus changed or activation
    /// was attempted.
    pub fn nav(&mut self, input: NavInput) -> bool {
        match input.navigation() {
            Some(navigation) => self.focus.navigate(&self.scene, navigation),
            None => self.focus.activate_focused(&mut self.scene),
        }
    }

    /// Scroll the focused node's nearest scrollable ancestor (itself included)
    /// from an analog axis.
    ///
    /// `value` is the axis deflection in `[-1, 1]` and `delta` the frame time in
    /// seconds. Values inside the dead zone are ignored, as is a focused node
    /// that is no longer interactive. Returns whether a component scrolled.
    pub fn analog_scroll(&mut self, value: f64, delta: f64) -> bool {
        if value.is_nan() || value.abs() < self.config.analog_dead_zone {
            return false;
        }
        let Some(focused) = self.focus.focused() else {
            return false;
        };
        if !self.scene.is_interactive(focused) {
            return false;
        }
        let dy = value * self.config.analog_scroll_speed * delta;
        match self.scene.scroll_nearest(focused, dy) {
            Some(target) => {
                tracing::trace!(?target, dy, "analog scroll");
                true
            }
            None => false,
        }
    }

    /// Remove a node and its subtree from the scene and from every focus context.
    pub fn remove_node(&mut self, id: NodeId) {
        self.scene.remove(id);
        self.focus.prune(&self.scene);
    }
}
