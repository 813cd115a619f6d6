#![forbid(unsafe_code)]

//! Core: geometry, pointer input, and pointer style side effects.
//!
//! Everything here is host-agnostic. The layout, render, and runtime crates
//! build on these primitives without knowing what actually draws the regions.

pub mod event;
pub mod geometry;
pub mod pointer_style;

pub use event::{PointerEvent, PointerPosition};
pub use geometry::{Rect, SplitAxis};
pub use pointer_style::{
    CursorIcon, PointerStyle, PointerStyleHost, PointerStyleOverride, SharedPointerStyle,
};
