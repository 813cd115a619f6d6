//! Workspace manager.
//!
//! Owns the [`WorkspaceState`], the template catalog and the listener list.
//! Every mutation goes through this type and is followed by the same two
//! steps: the state is written to the key-value store (failures are logged,
//! never returned) and every listener is called with the new state, in
//! registration order.
//!
//! "Not found" is never an error: lookups return `Option`, mutations return
//! `bool`. Only import, which parses caller-supplied text, returns a
//! `Result`.

use std::fmt;

use deck_layout::{LayoutItem, LayoutOp, LayoutOpError};
use time::OffsetDateTime;

use crate::config::WorkspaceConfig;
use crate::listeners::{ListenerId, Listeners};
use crate::storage::{KeyValueStore, MemoryStore};
use crate::template::{TemplateCatalog, WorkspaceTemplate};
use crate::workspace::{
    EXPORT_FORMAT_VERSION, ExportEnvelope, ImportEnvelope, ImportError, WorkspaceId,
    WorkspaceLayout, WorkspaceState,
};

type Clock = Box<dyn Fn() -> OffsetDateTime>;

/// Owner of all workspaces.
pub struct WorkspaceManager {
    store: Box<dyn KeyValueStore>,
    config: WorkspaceConfig,
    state: WorkspaceState,
    templates: TemplateCatalog,
    listeners: Listeners,
    clock: Clock,
}

impl WorkspaceManager {
    /// Manager with an empty state and the built-in templates.
    ///
    /// Nothing is read from `store` until [`load`](Self::load).
    pub fn new(store: impl KeyValueStore + 'static, config: WorkspaceConfig) -> Self {
        Self {
            store: Box::new(store),
            config,
            state: WorkspaceState::default(),
            templates: TemplateCatalog::builtin(),
            listeners: Listeners::default(),
            clock: Box::new(OffsetDateTime::now_utc),
        }
    }

    /// `new` followed by `load`.
    pub fn open(store: impl KeyValueStore + 'static, config: WorkspaceConfig) -> Self {
        Self::new(store, config).load()
    }

    /// Ephemeral manager backed by a [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new(), WorkspaceConfig::default())
    }

    #[must_use]
    pub fn with_templates(mut self, templates: TemplateCatalog) -> Self {
        self.templates = templates;
        self
    }

    /// Replace the timestamp source.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> OffsetDateTime + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Read the persisted state.
    ///
    /// A missing record yields the empty default; an unreadable or corrupt one
    /// is logged and also yields the default. Loaded trees are size-normalized,
    /// workspaces whose trees stay invalid are dropped, and a dangling current
    /// id is repointed. If the result holds no workspaces and a seed template
    /// is configured, one workspace is created from it.
    #[must_use]
    pub fn load(mut self) -> Self {
        let key = self.config.storage_key.clone();
        let mut state = match self.store.get(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<WorkspaceState>(&raw) {
                Ok(state) => state,
                Err(error) => {
                    tracing::warn!(
                        key = %key,
                        %error,
                        "persisted workspace state is corrupt, starting empty"
                    );
                    WorkspaceState::default()
                }
            },
            Ok(None) => {
                tracing::debug!(key = %key, "no persisted workspace state");
                WorkspaceState::default()
            }
            Err(error) => {
                tracing::warn!(
                    key = %key,
                    backend = self.store.name(),
                    %error,
                    "failed to read workspace state, starting empty"
                );
                WorkspaceState::default()
            }
        };

        state.workspaces.retain_mut(|workspace| {
            workspace.root.normalize_sizes();
            match workspace.root.validate() {
                Ok(()) => true,
                Err(error) => {
                    tracing::warn!(
                        workspace = %workspace.id,
                        %error,
                        "dropping invalid persisted workspace"
                    );
                    false
                }
            }
        });
        state.repair_current();
        self.state = state;

        if self.state.workspaces.is_empty()
            && let Some(template_id) = self.config.seed_template.clone()
        {
            match self.create_from_template(&template_id, None) {
                Some(seeded) => {
                    tracing::info!(
                        template = %template_id,
                        workspace = %seeded.id,
                        "seeded first workspace"
                    );
                    self.set_current_workspace(&seeded.id);
                }
                None => tracing::warn!(template = %template_id, "seed template not found"),
            }
        }

        tracing::debug!(
            workspaces = self.state.workspaces.len(),
            current = ?self.state.current_workspace_id,
            "workspace state loaded"
        );
        self
    }

    #[must_use]
    pub fn state(&self) -> &WorkspaceState {
        &self.state
    }

    #[must_use]
    pub fn workspaces(&self) -> &[WorkspaceLayout] {
        &self.state.workspaces
    }

    #[must_use]
    pub fn workspace(&self, id: &WorkspaceId) -> Option<&WorkspaceLayout> {
        self.state.get(id)
    }

    #[must_use]
    pub fn current_workspace(&self) -> Option<&WorkspaceLayout> {
        self.state.current()
    }

    #[must_use]
    pub fn current_workspace_id(&self) -> Option<&WorkspaceId> {
        self.state.current_workspace_id.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Create an empty workspace. It does not become current.
    pub fn create_workspace(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
    ) -> WorkspaceLayout {
        let workspace = WorkspaceLayout::new(name, LayoutItem::empty(), self.now())
            .with_description(description);
        self.insert(workspace)
    }

    /// Create a workspace from a template, with fresh ids on every node.
    ///
    /// `name` defaults to the template name. Returns `None` for an unknown
    /// template.
    pub fn create_from_template(
        &mut self,
        template_id: &str,
        name: Option<&str>,
    ) -> Option<WorkspaceLayout> {
        let template = self.templates.get(template_id)?;
        let name = name.unwrap_or(&template.name).to_string();
        let description = (!template.description.is_empty()).then(|| template.description.clone());
        let root = template.instantiate();
        let workspace = WorkspaceLayout::new(name, root, self.now()).with_description(description);
        tracing::debug!(
            template = template_id,
            workspace = %workspace.id,
            "workspace created from template"
        );
        Some(self.insert(workspace))
    }

    /// Copy of an existing workspace with new workspace and node ids.
    pub fn duplicate_workspace(&mut self, id: &WorkspaceId) -> Option<WorkspaceLayout> {
        let source = self.state.get(id)?;
        let copy = WorkspaceLayout::new(
            format!("{} (copy)", source.name),
            source.root.with_fresh_ids(),
            self.now(),
        )
        .with_description(source.description.clone());
        Some(self.insert(copy))
    }

    /// Replace the stored workspace with the same id.
    ///
    /// Sizes are normalized and `updatedAt` is bumped; `createdAt` is kept.
    /// Returns `false` if no workspace has that id or the tree is invalid.
    pub fn update_workspace(&mut self, mut workspace: WorkspaceLayout) -> bool {
        workspace.root.normalize_sizes();
        if let Err(error) = workspace.root.validate() {
            tracing::warn!(workspace = %workspace.id, %error, "rejected workspace update");
            return false;
        }
        let now = self.now();
        let Some(slot) = self.state.get_mut(&workspace.id) else {
            return false;
        };
        workspace.created_at = slot.created_at;
        workspace.updated_at = now;
        *slot = workspace;
        tracing::debug!(workspace = %slot.id, "workspace updated");
        self.commit();
        true
    }

    pub fn rename_workspace(&mut self, id: &WorkspaceId, name: impl Into<String>) -> bool {
        let now = self.now();
        let Some(slot) = self.state.get_mut(id) else {
            return false;
        };
        slot.name = name.into();
        slot.updated_at = now;
        tracing::debug!(workspace = %id, "workspace renamed");
        self.commit();
        true
    }

    /// Apply a tree operation to a stored workspace.
    ///
    /// `Ok(false)` if the workspace does not exist; an operation error leaves
    /// the workspace untouched and nothing is persisted or notified.
    pub fn apply_operation(
        &mut self,
        id: &WorkspaceId,
        op: &LayoutOp,
    ) -> Result<bool, LayoutOpError> {
        let now = self.now();
        let Some(slot) = self.state.get_mut(id) else {
            return Ok(false);
        };
        op.apply_to(&mut slot.root)?;
        slot.updated_at = now;
        tracing::debug!(workspace = %id, ?op, "layout operation applied");
        self.commit();
        Ok(true)
    }

    /// Remove a workspace. If it was current, the first remaining workspace
    /// becomes current (or none).
    pub fn delete_workspace(&mut self, id: &WorkspaceId) -> bool {
        let before = self.state.workspaces.len();
        self.state.workspaces.retain(|w| &w.id != id);
        if self.state.workspaces.len() == before {
            return false;
        }
        self.state.repair_current();
        tracing::debug!(
            workspace = %id,
            current = ?self.state.current_workspace_id,
            "workspace deleted"
        );
        self.commit();
        true
    }

    /// Make `id` current. Unknown ids return `false` and change nothing.
    pub fn set_current_workspace(&mut self, id: &WorkspaceId) -> bool {
        if !self.state.contains(id) {
            return false;
        }
        self.state.current_workspace_id = Some(id.clone());
        tracing::debug!(workspace = %id, "current workspace switched");
        self.commit();
        true
    }

    /// Serialize a workspace for transport.
    #[must_use]
    pub fn export_workspace(&self, id: &WorkspaceId) -> Option<String> {
        let workspace = self.state.get(id)?;
        let envelope = ExportEnvelope {
            format_version: EXPORT_FORMAT_VERSION,
            workspace,
        };
        match serde_json::to_string_pretty(&envelope) {
            Ok(text) => Some(text),
            Err(error) => {
                tracing::warn!(workspace = %id, %error, "failed to serialize workspace for export");
                None
            }
        }
    }

    /// Parse an export and add it as a new workspace.
    ///
    /// The workspace and every node get fresh ids and timestamps. On error the
    /// workspace list is unchanged.
    pub fn import_workspace(&mut self, text: &str) -> Result<WorkspaceLayout, ImportError> {
        let envelope: ImportEnvelope = serde_json::from_str(text)?;
        if envelope.format_version != EXPORT_FORMAT_VERSION {
            return Err(ImportError::UnsupportedVersion {
                found: envelope.format_version,
                supported: EXPORT_FORMAT_VERSION,
            });
        }
        let imported = envelope.workspace;
        let mut root = imported.root.with_fresh_ids();
        root.normalize_sizes();
        root.validate().map_err(ImportError::InvalidLayout)?;

        let workspace = WorkspaceLayout::new(imported.name, root, self.now())
            .with_description(imported.description);
        tracing::debug!(workspace = %workspace.id, "workspace imported");
        Ok(self.insert(workspace))
    }

    #[must_use]
    pub fn get_templates(&self) -> &[WorkspaceTemplate] {
        self.templates.templates()
    }

    /// Register a listener called after every mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&WorkspaceState) + 'static) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn now(&self) -> OffsetDateTime {
        (self.clock)()
    }

    fn insert(&mut self, workspace: WorkspaceLayout) -> WorkspaceLayout {
        tracing::debug!(workspace = %workspace.id, name = %workspace.name, "workspace added");
        self.state.workspaces.push(workspace.clone());
        self.commit();
        workspace
    }

    /// Persist, then notify.
    fn commit(&mut self) {
        self.persist();
        self.listeners.notify(&self.state);
    }

    fn persist(&self) {
        let key = &self.config.storage_key;
        let raw = match serde_json::to_string(&self.state) {
            Ok(raw) => raw,
            Err(error) => {
                tracing::warn!(key = %key, %error, "failed to serialize workspace state");
                return;
            }
        };
        if let Err(error) = self.store.set(key, &raw) {
            tracing::warn!(
                key = %key,
                backend = self.store.name(),
                %error,
                "failed to persist workspace state"
            );
        }
    }
}

impl fmt::Debug for WorkspaceManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceManager")
            .field("backend", &self.store.name())
            .field("config", &self.config)
            .field("workspaces", &self.state.workspaces.len())
            .field("current", &self.state.current_workspace_id)
            .field("templates", &self.templates.len())
            .field("listeners", &self.listeners)
            .finish()
    }
}
