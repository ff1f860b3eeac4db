//! On-disk project descriptor: workspace file, project config and the
//! ordered component store.
//!
//! All mutation is buffered in memory; `write` persists everything in one
//! pass at the end of a successful create, so an aborted create never
//! leaves a half-written descriptor behind.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use domain::error::WorkbenchError;
use domain::ports::{ComponentStore, ConfigStore, Scope};
use domain::resolver::ComponentRecord;

/// Directory holding the project config and component store files.
pub const DESCRIPTOR_DIR: &str = ".iotworkbench";

const PROJECT_CONFIG_FILE: &str = "project.json";
const COMPONENT_STORE_FILE: &str = "components.json";
const WORKSPACE_STORE_FILE: &str = "workspace-components.json";

#[derive(Debug, Serialize, Deserialize)]
struct WorkspaceFile {
    folders: Vec<WorkspaceFolder>,
    #[serde(default)]
    settings: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WorkspaceFolder {
    path: String,
}

#[derive(Default)]
struct DescriptorState {
    folders: Vec<String>,
    settings: BTreeMap<String, serde_json::Value>,
    config: BTreeMap<String, String>,
    // None = the store does not exist (legacy projects)
    project_components: Option<Vec<ComponentRecord>>,
    workspace_components: Option<Vec<ComponentRecord>>,
}

pub struct ProjectDescriptor {
    root: PathBuf,
    state: Mutex<DescriptorState>,
    has_project_config: bool,
}

impl ProjectDescriptor {
    /// Fresh descriptor for a project being created. Nothing touches disk
    /// until `write`.
    pub fn create(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            state: Mutex::new(DescriptorState::default()),
            has_project_config: false,
        }
    }

    /// Reads an existing descriptor back from disk. Missing files are
    /// tolerated: a legacy project may have a config but no component
    /// store, and a plain folder has neither.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let mut state = DescriptorState::default();
        let mut has_project_config = false;

        let workspace_path = root.join(Self::workspace_file_name(&root));
        if workspace_path.exists() {
            let raw = fs::read_to_string(&workspace_path)
                .with_context(|| format!("Failed to read {}", workspace_path.display()))?;
            let workspace: WorkspaceFile =
                serde_json::from_str(&raw).context("Malformed workspace descriptor")?;
            state.folders = workspace.folders.into_iter().map(|f| f.path).collect();
            state.settings = workspace.settings;
        }

        let config_path = root.join(DESCRIPTOR_DIR).join(PROJECT_CONFIG_FILE);
        if config_path.exists() {
            let raw = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            state.config = serde_json::from_str(&raw).context("Malformed project config")?;
            has_project_config = true;
        }

        state.project_components = Self::read_store(&root, COMPONENT_STORE_FILE)?;
        state.workspace_components = Self::read_store(&root, WORKSPACE_STORE_FILE)?;

        Ok(Self {
            root,
            state: Mutex::new(state),
            has_project_config,
        })
    }

    fn read_store(root: &Path, file: &str) -> Result<Option<Vec<ComponentRecord>>> {
        let path = root.join(DESCRIPTOR_DIR).join(file);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let records =
            serde_json::from_str(&raw).with_context(|| format!("Malformed store {}", file))?;
        Ok(Some(records))
    }

    fn workspace_file_name(root: &Path) -> String {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string());
        format!("{}.code-workspace", name)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a project config file was present on open.
    pub fn has_project_config(&self) -> bool {
        self.has_project_config
    }

    /// Whether the project-scoped component store exists. Legacy projects
    /// predate the store and synthesize their registry instead.
    pub fn has_component_store(&self) -> bool {
        self.lock().project_components.is_some()
    }

    /// Adds a workspace folder root, ignoring duplicates.
    pub fn add_folder(&self, path: &str) {
        let mut state = self.lock();
        if !state.folders.iter().any(|f| f == path) {
            state.folders.push(path.to_string());
        }
    }

    pub fn set_setting(&self, key: &str, value: serde_json::Value) {
        self.lock().settings.insert(key.to_string(), value);
    }

    /// Persists the workspace file, project config and component stores in
    /// one pass.
    pub fn write(&self) -> Result<()> {
        let state = self.lock();
        let descriptor_dir = self.root.join(DESCRIPTOR_DIR);
        fs::create_dir_all(&descriptor_dir)
            .with_context(|| format!("Failed to create {}", descriptor_dir.display()))?;

        let workspace = WorkspaceFile {
            folders: state
                .folders
                .iter()
                .map(|path| WorkspaceFolder { path: path.clone() })
                .collect(),
            settings: state.settings.clone(),
        };
        let workspace_path = self.root.join(Self::workspace_file_name(&self.root));
        fs::write(
            &workspace_path,
            serde_json::to_string_pretty(&workspace).context("Workspace descriptor serialize")?,
        )
        .with_context(|| format!("Failed to write {}", workspace_path.display()))?;

        fs::write(
            descriptor_dir.join(PROJECT_CONFIG_FILE),
            serde_json::to_string_pretty(&state.config).context("Project config serialize")?,
        )
        .context("Failed to write project config")?;

        if let Some(records) = &state.project_components {
            fs::write(
                descriptor_dir.join(COMPONENT_STORE_FILE),
                serde_json::to_string_pretty(records).context("Component store serialize")?,
            )
            .context("Failed to write component store")?;
        }
        if let Some(records) = &state.workspace_components {
            fs::write(
                descriptor_dir.join(WORKSPACE_STORE_FILE),
                serde_json::to_string_pretty(records).context("Workspace store serialize")?,
            )
            .context("Failed to write workspace component store")?;
        }

        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DescriptorState> {
        self.state.lock().expect("descriptor state poisoned")
    }
}

impl ConfigStore for ProjectDescriptor {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().config.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), WorkbenchError> {
        self.lock().config.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl ComponentStore for ProjectDescriptor {
    fn create_if_not_exists(&self, scope: Scope) -> Result<(), WorkbenchError> {
        let mut state = self.lock();
        let store = match scope {
            Scope::Project => &mut state.project_components,
            Scope::Workspace => &mut state.workspace_components,
        };
        if store.is_none() {
            *store = Some(Vec::new());
        }
        Ok(())
    }

    fn get_sorted_components(&self, scope: Scope) -> Result<Vec<ComponentRecord>, WorkbenchError> {
        let state = self.lock();
        let store = match scope {
            Scope::Project => &state.project_components,
            Scope::Workspace => &state.workspace_components,
        };
        // Records are kept in append order, which is dependency-resolvable
        // front to back.
        Ok(store.clone().unwrap_or_default())
    }

    fn update_component(
        &self,
        scope: Scope,
        record: ComponentRecord,
    ) -> Result<(), WorkbenchError> {
        let mut state = self.lock();
        let store = match scope {
            Scope::Project => &mut state.project_components,
            Scope::Workspace => &mut state.workspace_components,
        };
        let records = store.get_or_insert_with(Vec::new);
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::component::{ComponentType, DependencyKind};
    use domain::resolver::ComponentRecord;

    #[test]
    fn write_then_open_round_trips_everything() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("my-iot-app");
        fs::create_dir_all(&root).unwrap();

        let descriptor = ProjectDescriptor::create(&root);
        descriptor.add_folder("Device");
        descriptor.add_folder("StreamAnalytics");
        descriptor.add_folder("Device"); // duplicate, ignored
        descriptor.set_setting("iotworkbench.board", serde_json::json!("devkit"));
        descriptor.set("boardId", "devkit").unwrap();
        descriptor.create_if_not_exists(Scope::Project).unwrap();
        descriptor
            .update_component(
                Scope::Project,
                ComponentRecord::new(ComponentType::IotHub, "hub-1"),
            )
            .unwrap();
        descriptor
            .update_component(
                Scope::Project,
                ComponentRecord::new(ComponentType::StreamAnalyticsJob, "asa-1")
                    .with_dependency("hub-1", DependencyKind::Input),
            )
            .unwrap();
        descriptor.write().unwrap();

        assert!(root.join("my-iot-app.code-workspace").exists());

        let reopened = ProjectDescriptor::open(&root).unwrap();
        assert!(reopened.has_project_config());
        assert!(reopened.has_component_store());
        assert_eq!(reopened.get("boardId").as_deref(), Some("devkit"));

        let records = reopened.get_sorted_components(Scope::Project).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "hub-1");
        assert_eq!(records[1].dependencies[0].id, "hub-1");
    }

    #[test]
    fn nothing_on_disk_until_write() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("pending");
        fs::create_dir_all(&root).unwrap();

        let descriptor = ProjectDescriptor::create(&root);
        descriptor.set("boardId", "devkit").unwrap();
        descriptor.create_if_not_exists(Scope::Project).unwrap();

        assert!(!root.join(DESCRIPTOR_DIR).exists());
        assert!(!root.join("pending.code-workspace").exists());
    }

    #[test]
    fn open_tolerates_missing_component_store() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("legacy");
        fs::create_dir_all(root.join(DESCRIPTOR_DIR)).unwrap();
        fs::write(
            root.join(DESCRIPTOR_DIR).join("project.json"),
            r#"{"boardId": "devkit", "functionPath": "Functions"}"#,
        )
        .unwrap();

        let descriptor = ProjectDescriptor::open(&root).unwrap();
        assert!(descriptor.has_project_config());
        assert!(!descriptor.has_component_store());
        assert!(descriptor
            .get_sorted_components(Scope::Project)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn update_component_replaces_by_id() {
        let descriptor = ProjectDescriptor::create("/tmp/unused");
        descriptor.create_if_not_exists(Scope::Project).unwrap();
        descriptor
            .update_component(
                Scope::Project,
                ComponentRecord::new(ComponentType::IotHub, "hub-1"),
            )
            .unwrap();
        descriptor
            .update_component(
                Scope::Project,
                ComponentRecord::new(ComponentType::IotHub, "hub-1")
                    .with_dependency("x", DependencyKind::Other),
            )
            .unwrap();

        let records = descriptor.get_sorted_components(Scope::Project).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].dependencies.len(), 1);
    }
}
