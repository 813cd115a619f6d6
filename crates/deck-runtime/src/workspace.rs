//! Workspace records and the export envelope.

use std::fmt;

use deck_layout::{LayoutItem, LayoutModelError};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Version written into exported workspaces.
pub const EXPORT_FORMAT_VERSION: u32 = 1;

/// Stable identifier of a workspace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceId(String);

impl WorkspaceId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn fresh() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkspaceId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// A named, persisted arrangement of panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceLayout {
    pub id: WorkspaceId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub root: LayoutItem,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl WorkspaceLayout {
    /// New workspace stamped with `now`.
    pub fn new(name: impl Into<String>, root: LayoutItem, now: OffsetDateTime) -> Self {
        Self {
            id: WorkspaceId::fresh(),
            name: name.into(),
            description: None,
            root,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Same name, description and tree structure, ignoring ids and
    /// timestamps.
    #[must_use]
    pub fn equivalent_to(&self, other: &WorkspaceLayout) -> bool {
        self.name == other.name
            && self.description == other.description
            && self.root.structurally_eq(&other.root)
    }
}

/// The persisted record: every workspace plus the current selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceState {
    #[serde(default)]
    pub workspaces: Vec<WorkspaceLayout>,
    #[serde(default)]
    pub current_workspace_id: Option<WorkspaceId>,
}

impl WorkspaceState {
    #[must_use]
    pub fn get(&self, id: &WorkspaceId) -> Option<&WorkspaceLayout> {
        self.workspaces.iter().find(|w| &w.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &WorkspaceId) -> Option<&mut WorkspaceLayout> {
        self.workspaces.iter_mut().find(|w| &w.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &WorkspaceId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn current(&self) -> Option<&WorkspaceLayout> {
        self.current_workspace_id
            .as_ref()
            .and_then(|id| self.get(id))
    }

    /// Point a dangling current id at the first workspace, or clear it.
    ///
    /// Returns whether the current id changed.
    pub(crate) fn repair_current(&mut self) -> bool {
        let dangling = self
            .current_workspace_id
            .as_ref()
            .is_some_and(|id| !self.contains(id));
        if dangling {
            self.current_workspace_id = self.workspaces.first().map(|w| w.id.clone());
        }
        dangling
    }
}

/// Transport form produced by export.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExportEnvelope<'a> {
    pub format_version: u32,
    pub workspace: &'a WorkspaceLayout,
}

/// What import reads back. Ids and timestamps are ignored and regenerated.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImportEnvelope {
    pub format_version: u32,
    pub workspace: ImportedWorkspace,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImportedWorkspace {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub root: LayoutItem,
}

/// Why an import was rejected.
#[derive(Debug)]
pub enum ImportError {
    /// Text is not a well-formed export.
    Parse(serde_json::Error),
    UnsupportedVersion { found: u32, supported: u32 },
    /// The tree parsed but breaks layout invariants even after normalization.
    InvalidLayout(LayoutModelError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "malformed workspace export: {e}"),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "unsupported export format version {found} (supported: {supported})"
            ),
            Self::InvalidLayout(e) => write!(f, "invalid workspace layout: {e}"),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::InvalidLayout(e) => Some(e),
            Self::UnsupportedVersion { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
