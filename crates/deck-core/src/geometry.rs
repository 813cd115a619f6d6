#![forbid(unsafe_code)]

//! Geometric primitives.

use serde::{Deserialize, Serialize};

/// A rectangular region in host cell coordinates (origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u16,
    /// Top edge (inclusive).
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Extent of the rectangle along a split axis.
    #[inline]
    pub const fn extent(&self, axis: SplitAxis) -> u16 {
        match axis {
            SplitAxis::Horizontal => self.width,
            SplitAxis::Vertical => self.height,
        }
    }

    /// Start coordinate of the rectangle along a split axis.
    #[inline]
    pub const fn start(&self, axis: SplitAxis) -> u16 {
        match axis {
            SplitAxis::Horizontal => self.x,
            SplitAxis::Vertical => self.y,
        }
    }

    /// Take a slice of this rectangle along `axis`, starting `offset` cells in
    /// and spanning `len` cells. The cross-axis extent is unchanged.
    pub fn slice(&self, axis: SplitAxis, offset: u16, len: u16) -> Rect {
        match axis {
            SplitAxis::Horizontal => Rect::new(
                self.x.saturating_add(offset),
                self.y,
                len.min(self.width.saturating_sub(offset)),
                self.height,
            ),
            SplitAxis::Vertical => Rect::new(
                self.x,
                self.y.saturating_add(offset),
                self.width,
                len.min(self.height.saturating_sub(offset)),
            ),
        }
    }
}

/// Orientation of a split.
///
/// `Horizontal` lays children out left to right (the divider is vertical),
/// `Vertical` stacks them top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitAxis {
    Horizontal,
    Vertical,
}

impl SplitAxis {
    /// The other axis.
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}
