#![forbid(unsafe_code)]

//! Pointer input events.
//!
//! Coordinates are signed so a pointer that left the host window (negative
//! or past the far edge) still produces meaningful deltas.

use crate::geometry::SplitAxis;

/// Pointer location in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

impl PointerPosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Coordinate along a split axis.
    #[must_use]
    pub const fn along(self, axis: SplitAxis) -> i32 {
        match axis {
            SplitAxis::Horizontal => self.x,
            SplitAxis::Vertical => self.y,
        }
    }
}

/// A pointer event as delivered by the host event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Primary button pressed.
    Down {
        pointer_id: u32,
        position: PointerPosition,
    },
    /// Pointer moved (with or without a button held).
    Move {
        pointer_id: u32,
        position: PointerPosition,
    },
    /// Primary button released, possibly outside the window.
    Up {
        pointer_id: u32,
        position: PointerPosition,
    },
    /// The host lost pointer capture (window blur, pointer left the window
    /// without a release being reported).
    CaptureLost,
}

impl PointerEvent {
    /// Pointer id carried by the event, if any.
    #[must_use]
    pub const fn pointer_id(&self) -> Option<u32> {
        match self {
            Self::Down { pointer_id, .. }
            | Self::Move { pointer_id, .. }
            | Self::Up { pointer_id, .. } => Some(*pointer_id),
            Self::CaptureLost => None,
        }
    }

    /// Position carried by the event, if any.
    #[must_use]
    pub const fn position(&self) -> Option<PointerPosition> {
        match self {
            Self::Down { position, .. }
            | Self::Move { position, .. }
            | Self::Up { position, .. } => Some(*position),
            Self::CaptureLost => None,
        }
    }
}
