#![forbid(unsafe_code)]

//! Deck public facade crate.
//!
//! Re-exports the layout model, renderer and workspace manager under one
//! name, with a prelude for application code that wires them together.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use deck_core::{
    CursorIcon, PointerEvent, PointerPosition, PointerStyle, PointerStyleHost,
    PointerStyleOverride, Rect, SharedPointerStyle, SplitAxis,
};

// --- Layout re-exports -----------------------------------------------------

pub use deck_layout::{
    ComponentLayoutItem, ContainerLayoutItem, DropPlacement, LayoutItem, LayoutModelError,
    LayoutOp, LayoutOpError, NodeId, Splitter, SplitterEffect, StackLayoutItem,
};

// --- Render re-exports -----------------------------------------------------

pub use deck_render::{
    Component, ComponentRegistry, FnComponent, InteractionOutcome, LayoutRenderer, Mount,
    RegionView, RendererConfig, ResizeController,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use deck_runtime::{
    FileStore, ImportError, KeyValueStore, MemoryStore, StorageError, TemplateCatalog,
    WorkspaceConfig, WorkspaceId, WorkspaceLayout, WorkspaceManager, WorkspaceState,
    WorkspaceTemplate,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Deck applications.
#[derive(Debug)]
pub enum Error {
    /// A layout tree failed validation.
    Layout(LayoutModelError),
    /// A tree operation was rejected.
    Operation(LayoutOpError),
    #[cfg(feature = "runtime")]
    Storage(StorageError),
    #[cfg(feature = "runtime")]
    Import(ImportError),
    /// Lookup of a workspace, template or node failed.
    NotFound(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layout(err) => write!(f, "{err}"),
            Self::Operation(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Storage(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Import(err) => write!(f, "{err}"),
            Self::NotFound(what) => write!(f, "not found: {what}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Layout(err) => Some(err),
            Self::Operation(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Storage(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Import(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<LayoutModelError> for Error {
    fn from(err: LayoutModelError) -> Self {
        Self::Layout(err)
    }
}

impl From<LayoutOpError> for Error {
    fn from(err: LayoutOpError) -> Self {
        Self::Operation(err)
    }
}

#[cfg(feature = "runtime")]
impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

#[cfg(feature = "runtime")]
impl From<ImportError> for Error {
    fn from(err: ImportError) -> Self {
        Self::Import(err)
    }
}

/// Standard result type for Deck APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Component, ComponentRegistry, Error, LayoutItem, LayoutOp, LayoutRenderer, Mount,
        NodeId, PointerEvent, PointerPosition, Rect, RegionView, ResizeController, Result,
        SplitAxis,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{WorkspaceConfig, WorkspaceId, WorkspaceLayout, WorkspaceManager};

    pub use crate::{core, layout, render};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use deck_core as core;
pub use deck_layout as layout;
pub use deck_render as render;
#[cfg(feature = "runtime")]
pub use deck_runtime as runtime;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn wraps_layer_errors_with_source() {
        let err: Error = LayoutItem::stack(Vec::new())
            .validate()
            .expect_err("empty stack is invalid")
            .into();
        assert!(matches!(err, Error::Layout(_)));
        assert!(err.source().is_some());
        assert!(!err.to_string().is_empty());

        let missing = Error::NotFound("template 'x'".into());
        assert_eq!(missing.to_string(), "not found: template 'x'");
        assert!(missing.source().is_none());
    }

    #[cfg(feature = "runtime")]
    #[test]
    fn import_errors_convert() {
        let mut manager = WorkspaceManager::in_memory();
        let err: Error = manager
            .import_workspace("not json")
            .expect_err("rejected")
            .into();
        assert!(matches!(err, Error::Import(ImportError::Parse(_))));
    }
}
