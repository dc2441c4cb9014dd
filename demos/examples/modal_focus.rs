// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gamepad-style focus over a main menu with a modal confirmation dialog.
//!
//! This example shows how to:
//! - register focusable buttons and move between them with D-pad input,
//! - open a modal by pushing a focus context and blocking click-through,
//! - close it from a button handler and get the previous focus back.
//!
//! Run:
//! - `cargo run -p trellis_demos --example modal_focus`
//! - `RUST_LOG=trellis_focus=debug cargo run -p trellis_demos --example modal_focus`
//!   to also see the focus manager's own log.

use std::cell::Cell;
use std::env;
use std::rc::Rc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use trellis::{
    EventCx, GamepadState, IRect, NavInput, NodeDesc, NodeId, OnClick, Tooltip, Ui, UiConfig,
};

/// This example logs at info, everything else at warn. `RUST_LOG` directives are appended.
const DEFAULT_FILTER: &str = "warn,modal_focus=info";

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

    let mut ui = Ui::with_config(UiConfig::default().with_viewport(IRect::new(0, 0, 640, 360)));

    // Main menu: three buttons in a column.
    let menu = ui
        .scene_mut()
        .insert(None, NodeDesc::at(IRect::new(40, 40, 200, 160)));
    let labels = ["Play", "Options", "Quit"];
    let buttons: Vec<NodeId> = (0..3)
        .map(|i| {
            ui.scene_mut().insert(
                Some(menu),
                NodeDesc::relative(10, 10 + i * 40, 180, 30)
                    .with_tooltip(Tooltip::from(labels[i as usize])),
            )
        })
        .collect();
    for &b in &buttons {
        ui.focus_mut().register(b);
    }
    ui.focus_mut().add_listener(|prev, cur| {
        info!(?prev, ?cur, "menu focus changed");
    });

    // Confirmation dialog, hidden until Quit is pressed.
    let dialog = ui
        .scene_mut()
        .insert(None, NodeDesc::at(IRect::new(0, 0, 240, 100)));
    ui.scene_mut().set_position(dialog, 200, 130);
    ui.scene_mut().set_blocks_input(dialog, true);
    ui.scene_mut().set_visible(dialog, false);
    let yes = ui
        .scene_mut()
        .insert(Some(dialog), NodeDesc::relative(20, 50, 90, 30));
    let no = ui
        .scene_mut()
        .insert(Some(dialog), NodeDesc::relative(130, 50, 90, 30));

    // Quit opens the dialog. Focus contexts live outside the scene, so the
    // handler only flips visibility and leaves a note for the frame loop.
    let open_requested = Rc::new(Cell::new(false));
    let flag = open_requested.clone();
    ui.scene_mut().set_component(
        buttons[2],
        OnClick::new(move |cx: &mut EventCx<'_>| {
            cx.scene_mut().set_visible(dialog, true);
            flag.set(true);
        }),
    );
    let close_requested = Rc::new(Cell::new(false));
    let flag = close_requested.clone();
    ui.scene_mut().set_component(
        no,
        OnClick::new(move |cx: &mut EventCx<'_>| {
            cx.scene_mut().set_visible(dialog, false);
            flag.set(true);
        }),
    );

    let presses = [
        GamepadState { down: true, ..GamepadState::default() },
        GamepadState { down: true, ..GamepadState::default() },
        GamepadState { down: true, ..GamepadState::default() },
        GamepadState { confirm: true, ..GamepadState::default() },
        GamepadState { right: true, ..GamepadState::default() },
        GamepadState { left: true, ..GamepadState::default() },
        GamepadState { right: true, ..GamepadState::default() },
        GamepadState { confirm: true, ..GamepadState::default() },
    ];

    for state in presses {
        let Some(input) = NavInput::from_gamepad(state) else {
            continue;
        };
        let changed = ui.nav(input);
        info!(?input, changed, focused = ?ui.focus().focused(), "nav");

        if open_requested.replace(false) {
            let focus = ui.focus_mut();
            focus.push_context("confirm-quit");
            focus.register(yes);
            focus.register(no);
            focus.add_listener(|prev, cur| info!(?prev, ?cur, "dialog focus changed"));
            let (scene, focus) = ui.scene_and_focus();
            focus.focus_first(scene);
            let names: Vec<&str> = ui.focus().context_names().collect();
            info!(contexts = ?names, "dialog opened");
        }
        if close_requested.replace(false) {
            match ui.focus_mut().pop_context_named("confirm-quit") {
                Ok(name) => info!(%name, focused = ?ui.focus().focused(), "dialog closed"),
                Err(err) => warn!(%err, "could not close dialog"),
            }
        }
    }

    // A visible dialog swallows clicks meant for the menu underneath.
    ui.scene_mut().set_visible(dialog, true);
    let handled = ui.pointer_down((210.0, 140.0), 0_u8);
    info!(?handled, "click on the dialog body");
}
