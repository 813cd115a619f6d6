#![forbid(unsafe_code)]

//! Layout model and layout-side interaction logic.
//!
//! - [`model`] - the workspace layout tree (containers, components, stacks)
//! - [`ops`] - validated tree mutations used by drag/drop and resize
//! - [`splitter`] - two-pane drag-resize state machine with minimum clamping
//! - [`solve`] - percentage to cell conversion for region geometry

pub mod model;
pub mod ops;
pub mod solve;
pub mod splitter;

pub use deck_core::geometry::{Rect, SplitAxis};
pub use model::{
    ComponentLayoutItem, ContainerLayoutItem, DEFAULT_MIN_SIZE, LayoutItem, LayoutModelError,
    NodeId, SIZE_EPSILON, StackLayoutItem, equal_sizes,
};
pub use ops::{DropPlacement, LayoutOp, LayoutOpError};
pub use solve::{distribute, split_rect};
pub use splitter::{
    Splitter, SplitterEffect, SplitterNoopReason, SplitterState, resize_adjacent, resize_pair,
    resolve_minimums,
};
