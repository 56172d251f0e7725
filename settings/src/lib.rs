//! User settings for launching Camel applications.
//!
//! The backing file follows the editor `settings.json` convention: a flat
//! jsonc object keyed by dotted option names. Every accessor re-reads the
//! file, so a launch always sees the currently persisted values. A missing
//! file, a missing key or a wrongly-typed value all fall back to the
//! default for that key, never an error.

use std::path::{Path, PathBuf};

use serde_json::Value;

pub const JBANG_VERSION: &str = "camel.debugAdapter.JBangVersion";
pub const CAMEL_VERSION: &str = "camel.debugAdapter.CamelVersion";
pub const EXTRA_LAUNCH_PARAMETER: &str = "camel.debugAdapter.ExtraLaunchParameter";
pub const RED_HAT_MAVEN_REPOSITORY: &str = "camel.debugAdapter.RedHatMavenRepository";
pub const RED_HAT_MAVEN_REPOSITORY_GLOBAL: &str = "camel.debugAdapter.redHatMavenRepository.global";
pub const KUBERNETES_RUN_PARAMETERS: &str = "camel.debugAdapter.KubernetesRunParameters";

pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the platform configuration directory.
    pub fn default_path() -> eyre::Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory"))?;
        Ok(config_dir.join("camel-companion").join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn string(&self, key: &str) -> String {
        self.read()
            .as_ref()
            .and_then(|root| root.get(key))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    pub fn string_list(&self, key: &str) -> Vec<String> {
        self.read()
            .as_ref()
            .and_then(|root| root.get(key))
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn flag(&self, key: &str) -> bool {
        self.read()
            .as_ref()
            .and_then(|root| root.get(key))
            .and_then(Value::as_bool)
            .unwrap_or_default()
    }

    fn read(&self) -> Option<Value> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        match jsonc_parser::parse_to_serde_value(&contents, &Default::default()) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "unparsable settings file");
                None
            }
        }
    }
}

/// Immutable snapshot of every launch-relevant option, taken once per
/// launch so a single composition never observes a settings change halfway
/// through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchSettings {
    pub jbang_version: String,
    pub camel_version: String,
    pub extra_launch_parameters: Vec<String>,
    pub red_hat_maven_repository: String,
    pub global_maven_repository_placeholder: bool,
    pub kubernetes_run_parameters: Vec<String>,
}

impl LaunchSettings {
    pub fn snapshot(store: &SettingsStore) -> Self {
        Self {
            jbang_version: store.string(JBANG_VERSION),
            camel_version: store.string(CAMEL_VERSION),
            extra_launch_parameters: store.string_list(EXTRA_LAUNCH_PARAMETER),
            red_hat_maven_repository: store.string(RED_HAT_MAVEN_REPOSITORY),
            global_maven_repository_placeholder: store.flag(RED_HAT_MAVEN_REPOSITORY_GLOBAL),
            kubernetes_run_parameters: store.string_list(KUBERNETES_RUN_PARAMETERS),
        }
    }
}
