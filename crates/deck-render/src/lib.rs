#![forbid(unsafe_code)]

//! Rendering side of the Deck layout engine.
//!
//! [`LayoutRenderer`] walks a [`deck_layout::LayoutItem`] tree and produces a
//! [`RegionView`] tree: split regions with divider handles, mounted component
//! regions, tabbed stacks, and inline error placeholders. Components are
//! resolved through a [`ComponentRegistry`] built at application start.
//!
//! [`ResizeController`] turns pointer events on divider handles into
//! [`deck_layout::LayoutOp::Resize`] operations on the tree.

pub mod config;
pub mod interaction;
pub mod region;
pub mod registry;
pub mod renderer;

pub use config::RendererConfig;
pub use interaction::{InteractionOutcome, ResizeController};
pub use region::{DividerHandle, RegionView, TabView};
pub use registry::{Component, ComponentFactory, ComponentRegistry, FnComponent, Mount};
pub use renderer::LayoutRenderer;
