// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip payloads, hover arming, and tooltip drawing.

use kurbo::Point;

use crate::canvas::{Argb, Canvas, TextAlign};
use crate::types::IRect;

/// Tooltip attached to a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tooltip {
    /// Plain lines of text.
    Lines(Vec<String>),
    /// Title plus individually colored lines.
    Rich(RichTooltip),
}

impl Tooltip {
    /// Plain tooltip from any sequence of lines.
    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Lines(lines.into_iter().map(Into::into).collect())
    }

    /// Whether there is nothing to show.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Lines(lines) => lines.is_empty(),
            Self::Rich(rich) => rich.title.is_none() && rich.lines.is_empty(),
        }
    }
}

impl From<&str> for Tooltip {
    fn from(text: &str) -> Self {
        Self::Lines(vec![text.into()])
    }
}

impl From<String> for Tooltip {
    fn from(text: String) -> Self {
        Self::Lines(vec![text])
    }
}

impl From<RichTooltip> for Tooltip {
    fn from(rich: RichTooltip) -> Self {
        Self::Rich(rich)
    }
}

/// Structured tooltip: an optional emphasized title and body lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RichTooltip {
    /// Drawn first, slightly enlarged.
    pub title: Option<TooltipLine>,
    /// Body lines.
    pub lines: Vec<TooltipLine>,
}

/// A line of tooltip text with an optional color override.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TooltipLine {
    /// Text.
    pub text: String,
    /// Color; `None` uses [`TooltipStyle::text`].
    pub color: Option<Argb>,
}

impl TooltipLine {
    /// Line in the default text color.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    /// Line in a specific color.
    pub fn colored(text: impl Into<String>, color: Argb) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
        }
    }
}

/// Visual parameters for [`draw_tooltip`].
#[derive(Clone, Debug)]
pub struct TooltipStyle {
    /// Inner padding in pixels.
    pub padding: i32,
    /// Distance from the pointer to the tooltip box.
    pub pointer_offset: i32,
    /// Height of one line of text at scale `1.0`.
    pub line_height: i32,
    /// Scale applied to a rich tooltip's title.
    pub title_scale: f64,
    /// Corner radius.
    pub radius: f64,
    /// Shadow spread in pixels; `0` disables the shadow.
    pub shadow_spread: i32,
    /// Background fill.
    pub background: Argb,
    /// Border color.
    pub border: Argb,
    /// Default text color.
    pub text: Argb,
    /// Shadow color (its alpha is the peak shadow alpha).
    pub shadow: Argb,
}

impl Default for TooltipStyle {
    fn default() -> Self {
        Self {
            padding: 4,
            pointer_offset: 12,
            line_height: 10,
            title_scale: 1.1,
            radius: 3.0,
            shadow_spread: 4,
            background: Argb(0xF010_0010),
            border: Argb(0xFF50_00FF),
            text: Argb::WHITE,
            shadow: Argb(0x6000_0000),
        }
    }
}

/// Hover arming state of one node, updated once per rendered frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct HoverState {
    started_at: Option<u64>,
    hovered_last_frame: bool,
}

impl HoverState {
    /// Record this frame's hover status.
    ///
    /// Entering starts the timer; leaving clears it.
    pub(crate) fn update(&mut self, inside: bool, now_ms: u64) {
        if inside {
            if !self.hovered_last_frame || self.started_at.is_none() {
                self.started_at = Some(now_ms);
            }
        } else {
            self.started_at = None;
        }
        self.hovered_last_frame = inside;
    }

    /// Continuous hover time at `now_ms`, if hovered.
    pub(crate) fn hovered_for(&self, now_ms: u64) -> Option<u64> {
        self.started_at.map(|start| now_ms.saturating_sub(start))
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

struct Run<'a> {
    text: &'a str,
    scale: f64,
    color: Argb,
}

/// Draw `tooltip` next to `pointer`, kept inside `viewport`.
///
/// The box is placed below-right of the pointer and flips to the left or
/// upwards when it would overflow the viewport. Returns the box drawn.
pub fn draw_tooltip(
    canvas: &mut dyn Canvas,
    tooltip: &Tooltip,
    pointer: Point,
    viewport: IRect,
    style: &TooltipStyle,
) -> Option<IRect> {
    if tooltip.is_empty() {
        return None;
    }
    let runs: Vec<Run<'_>> = match tooltip {
        Tooltip::Lines(lines) => lines
            .iter()
            .map(|text| Run {
                text,
                scale: 1.0,
                color: style.text,
            })
            .collect(),
        Tooltip::Rich(rich) => rich
            .title
            .iter()
            .map(|line| (line, style.title_scale))
            .chain(rich.lines.iter().map(|line| (line, 1.0)))
            .map(|(line, scale)| Run {
                text: &line.text,
                scale,
                color: line.color.unwrap_or(style.text),
            })
            .collect(),
    };

    let line_heights: Vec<i32> = runs
        .iter()
        .map(|run| round_px(f64::from(style.line_height) * run.scale))
        .collect();
    let text_width = runs
        .iter()
        .map(|run| canvas.text_width(run.text) * run.scale)
        .fold(0.0, f64::max);
    let width = round_px(text_width.ceil()) + 2 * style.padding;
    let height = line_heights.iter().sum::<i32>() + 2 * style.padding;

    let px = round_px(pointer.x.floor());
    let py = round_px(pointer.y.floor());
    let mut x = px + style.pointer_offset;
    if x + width > viewport.right() {
        x = px - style.pointer_offset - width;
    }
    let mut y = py + style.pointer_offset;
    if y + height > viewport.bottom() {
        y = py - style.pointer_offset - height;
    }
    let x = x.max(viewport.x);
    let y = y.max(viewport.y);
    let rect = IRect::new(x, y, width, height);

    canvas.draw_shadow(rect, style.radius, style.shadow_spread, style.shadow);
    canvas.fill_rounded_rect(rect, style.radius, style.background);
    canvas.stroke_rounded_rect(rect, style.radius, 1.0, style.border);

    let mut line_y = y + style.padding;
    for (run, h) in runs.iter().zip(line_heights) {
        let origin = Point::new(f64::from(x + style.padding), f64::from(line_y));
        canvas.draw_text(run.text, origin, run.scale, TextAlign::Left, run.color);
        line_y += h;
    }
    Some(rect)
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "tooltip geometry is far inside the i32 range."
)]
fn round_px(v: f64) -> i32 {
    v.round() as i32
}
