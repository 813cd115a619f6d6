#![forbid(unsafe_code)]

//! Workspace management for the Deck layout engine.
//!
//! [`WorkspaceManager`] owns every [`WorkspaceLayout`], persists the whole
//! [`WorkspaceState`] through a [`KeyValueStore`] after each mutation, and
//! notifies listeners synchronously. Workspaces can be created empty, from a
//! [`WorkspaceTemplate`], or by importing an export.

pub mod config;
pub mod listeners;
pub mod manager;
pub mod storage;
pub mod template;
pub mod workspace;

pub use config::{DEFAULT_STORAGE_KEY, WorkspaceConfig};
pub use listeners::ListenerId;
pub use manager::WorkspaceManager;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, StorageResult};
pub use template::{TemplateCatalog, WorkspaceTemplate};
pub use workspace::{
    EXPORT_FORMAT_VERSION, ImportError, WorkspaceId, WorkspaceLayout, WorkspaceState,
};
