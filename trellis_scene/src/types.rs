// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: node identifiers, flags, geometry, and node descriptions.

use kurbo::{Point, Rect};

use crate::tooltip::Tooltip;

/// Identifier for a node in the scene (generational).
///
/// A `NodeId` outlives its node: once the node is removed the id becomes
/// stale and every scene operation on it is a no-op.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Node flags controlling visibility, interactivity, and click-through.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is drawn and participates in dispatch and hit testing.
        const VISIBLE      = 0b0000_0001;
        /// Node (and therefore its subtree) accepts input.
        const ENABLED      = 0b0000_0010;
        /// Pointer events inside the node's bounds that no child consumed are
        /// reported as consumed, so they never reach siblings painted below.
        const BLOCKS_INPUT = 0b0000_0100;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::ENABLED
    }
}

/// Integer-pixel rectangle in scene coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl IRect {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Create a rectangle from its top-left corner and size.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive), saturating at `i32::MAX`.
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive), saturating at `i32::MAX`.
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Half-open containment: `x <= px < x + width` and likewise for `y`.
    ///
    /// ```
    /// use trellis_scene::IRect;
    ///
    /// let r = IRect::new(0, 0, 10, 10);
    /// assert!(r.contains((0.0, 0.0).into()));
    /// assert!(r.contains((9.5, 9.5).into()));
    /// assert!(!r.contains((10.0, 5.0).into()));
    /// ```
    pub fn contains(&self, p: Point) -> bool {
        p.x >= f64::from(self.x)
            && p.x < f64::from(self.right())
            && p.y >= f64::from(self.y)
            && p.y < f64::from(self.bottom())
    }

    /// Center point.
    pub fn center(&self) -> Point {
        self.to_rect().center()
    }

    /// Same rectangle moved so its top-left corner is at `(x, y)`.
    pub const fn with_origin(self, x: i32, y: i32) -> Self {
        Self { x, y, ..self }
    }

    /// Grow by `amount` on every side (shrink for negative values).
    pub const fn inflate(self, amount: i32) -> Self {
        Self {
            x: self.x.saturating_sub(amount),
            y: self.y.saturating_sub(amount),
            width: self.width.saturating_add(amount.saturating_mul(2)),
            height: self.height.saturating_add(amount.saturating_mul(2)),
        }
    }

    /// Convert to a [`kurbo::Rect`].
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.right()),
            f64::from(self.bottom()),
        )
    }
}

/// How a node's absolute position is derived.
///
/// Non-absolute anchors are always resolved from the parent's current
/// bounds and the stored anchor, never from the node's own live position, so
/// resolving any number of times gives the same result.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Position {
    /// The node's bounds are used as given.
    #[default]
    Absolute,
    /// Fixed offset from the parent's top-left corner.
    Relative {
        /// Horizontal offset.
        dx: i32,
        /// Vertical offset.
        dy: i32,
    },
    /// Centered within the parent's bounds.
    Centered,
}

impl Position {
    /// Resolve `own` against the parent's bounds.
    pub fn resolve(self, parent: IRect, own: IRect) -> IRect {
        match self {
            Self::Absolute => own,
            Self::Relative { dx, dy } => {
                own.with_origin(parent.x.saturating_add(dx), parent.y.saturating_add(dy))
            }
            Self::Centered => own.with_origin(
                parent.x.saturating_add(parent.width.saturating_sub(own.width) / 2),
                parent.y.saturating_add(parent.height.saturating_sub(own.height) / 2),
            ),
        }
    }
}

/// Construction-time description of a node.
///
/// For non-absolute [`Position`]s only the size of `bounds` matters; the
/// origin is derived from the parent on insertion.
#[derive(Clone, Debug)]
pub struct NodeDesc {
    /// Bounds (absolute) or size (relative/centered).
    pub bounds: IRect,
    /// Visibility, enabled state, and input blocking.
    pub flags: NodeFlags,
    /// Position anchor.
    pub position: Position,
    /// Optional tooltip payload.
    pub tooltip: Option<Tooltip>,
    /// Hover delay before the tooltip shows; `None` uses the scene default.
    pub tooltip_delay_ms: Option<u64>,
}

impl Default for NodeDesc {
    fn default() -> Self {
        Self {
            bounds: IRect::ZERO,
            flags: NodeFlags::default(),
            position: Position::Absolute,
            tooltip: None,
            tooltip_delay_ms: None,
        }
    }
}

impl NodeDesc {
    /// An absolutely positioned node with the given bounds.
    pub fn at(bounds: IRect) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    /// A node of the given size placed at a fixed offset from its parent.
    pub fn relative(dx: i32, dy: i32, width: i32, height: i32) -> Self {
        Self {
            bounds: IRect::new(0, 0, width, height),
            position: Position::Relative { dx, dy },
            ..Self::default()
        }
    }

    /// Set flags.
    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Attach a tooltip.
    pub fn with_tooltip(mut self, tooltip: impl Into<Tooltip>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }
}
