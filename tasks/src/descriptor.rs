use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use launcher::{compose, ArgumentVector, LaunchMode, LaunchScope};
use serde::Serialize;
use settings::LaunchSettings;

pub const LABEL_DEBUG_OPENED: &str =
    "Start Opened Camel application with debug enabled with JBang";
pub const LABEL_RUN_OPENED: &str = "Run with JBang Opened Camel Application";
pub const LABEL_DEBUG_ALL: &str = "Start All Camel applications with debug enabled with JBang";
pub const LABEL_RUN_ALL: &str = "Run with JBang All Camel Applications";
pub const LABEL_DEBUG_FOLDER: &str =
    "Start All Camel applications from containing folder with debug enabled with JBang";
pub const LABEL_RUN_FOLDER: &str = "Run with JBang All Camel Applications from containing folder";
pub const LABEL_DEPLOY: &str = "Deploy Integration with Apache Camel Kubernetes Run";

const SUSPEND_ENV: &str = "CAMEL_DEBUGGER_SUSPEND";
const DEBUG_PROBLEM_MATCHER: &str = "$camel.debug.problemMatcher";

/// Editor-variable placeholders, resolved by the task executor, kept so the
/// provided catalog matches what a tasks.json would contain.
const RELATIVE_FILE: &str = "${relativeFile}";
const FILE_DIRNAME: &str = "${fileDirname}";

/// One runnable shell task as surfaced to the host task system.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDescriptor {
    pub label: String,
    #[serde(rename = "type")]
    pub task_type: &'static str,
    pub command: &'static str,
    pub args: ArgumentVector,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    pub is_background: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_matcher: Option<String>,
    pub reveal: bool,
}

/// Eagerly builds the whole task catalog, in a fixed order.
pub fn provide_tasks(settings: &LaunchSettings, workspace_root: Option<&Path>) -> Vec<TaskDescriptor> {
    [
        LABEL_DEBUG_OPENED,
        LABEL_RUN_OPENED,
        LABEL_DEBUG_ALL,
        LABEL_RUN_ALL,
        LABEL_DEBUG_FOLDER,
        LABEL_RUN_FOLDER,
        LABEL_DEPLOY,
    ]
    .iter()
    .map(|label| {
        task_for_label(label, settings, workspace_root)
            .unwrap_or_else(|_| unreachable!("catalog labels are all known"))
    })
    .collect()
}

/// Builds the task for one of the fixed labels. An unknown label is a
/// caller bug, not a runtime condition.
pub fn task_for_label(
    label: &str,
    settings: &LaunchSettings,
    workspace_root: Option<&Path>,
) -> eyre::Result<TaskDescriptor> {
    let opened = LaunchScope::OpenedFile {
        relative_path: RELATIVE_FILE.to_string(),
    };
    let folder = LaunchScope::ContainingFolder {
        dir: PathBuf::from(FILE_DIRNAME),
    };
    let (mode, scope) = match label {
        LABEL_DEBUG_OPENED => (LaunchMode::Debug, opened),
        LABEL_RUN_OPENED => (LaunchMode::Run, opened),
        LABEL_DEBUG_ALL => (LaunchMode::Debug, LaunchScope::Workspace),
        LABEL_RUN_ALL => (LaunchMode::Run, LaunchScope::Workspace),
        LABEL_DEBUG_FOLDER => (LaunchMode::Debug, folder),
        LABEL_RUN_FOLDER => (LaunchMode::Run, folder),
        LABEL_DEPLOY => (LaunchMode::Deploy, LaunchScope::Workspace),
        other => eyre::bail!("no task is provided for label {other:?}"),
    };
    Ok(launch_task(label, &mode, &scope, settings, workspace_root))
}

/// All tasks are pre-built by [`provide_tasks`]; nothing is lazily
/// resolved.
pub fn resolve_task(_label: &str) -> Option<TaskDescriptor> {
    None
}

/// `camel plugin add <name>`, built on demand rather than listed in the
/// catalog.
pub fn plugin_task(
    name: &str,
    settings: &LaunchSettings,
    workspace_root: Option<&Path>,
) -> TaskDescriptor {
    let mode = LaunchMode::AddPlugin {
        name: name.to_string(),
    };
    let mut task = launch_task(
        &format!("Add Camel JBang plugin {name}"),
        &mode,
        &LaunchScope::Workspace,
        settings,
        workspace_root,
    );
    task.is_background = false;
    task
}

/// Builds a task for a concrete mode and scope, for callers that resolved
/// the editor placeholders themselves.
pub fn launch_task(
    label: &str,
    mode: &LaunchMode,
    scope: &LaunchScope,
    settings: &LaunchSettings,
    workspace_root: Option<&Path>,
) -> TaskDescriptor {
    let args = compose(mode, scope, settings, workspace_root);
    let debug = matches!(mode, LaunchMode::Debug);

    let mut env = BTreeMap::new();
    if debug {
        // A debugger must attach before any message is processed.
        env.insert(SUSPEND_ENV.to_string(), "true".to_string());
    }

    TaskDescriptor {
        label: label.to_string(),
        task_type: "shell",
        command: "jbang",
        args,
        cwd: scope.working_dir().map(Path::to_path_buf),
        env,
        is_background: true,
        problem_matcher: debug.then(|| DEBUG_PROBLEM_MATCHER.to_string()),
        reveal: debug,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_order_is_stable() {
        let tasks = provide_tasks(&LaunchSettings::default(), None);
        let labels: Vec<_> = tasks.iter().map(|task| task.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                LABEL_DEBUG_OPENED,
                LABEL_RUN_OPENED,
                LABEL_DEBUG_ALL,
                LABEL_RUN_ALL,
                LABEL_DEBUG_FOLDER,
                LABEL_RUN_FOLDER,
                LABEL_DEPLOY,
            ]
        );
    }

    #[test]
    fn debug_tasks_suspend_the_debugger() {
        let task = task_for_label(LABEL_DEBUG_OPENED, &LaunchSettings::default(), None).unwrap();
        assert_eq!(task.env.get(SUSPEND_ENV).map(String::as_str), Some("true"));
        assert_eq!(task.problem_matcher.as_deref(), Some(DEBUG_PROBLEM_MATCHER));
        assert!(task.reveal);
    }

    #[test]
    fn run_tasks_do_not_touch_the_environment() {
        let task = task_for_label(LABEL_RUN_OPENED, &LaunchSettings::default(), None).unwrap();
        assert!(task.env.is_empty());
        assert_eq!(task.problem_matcher, None);
    }

    #[test]
    fn folder_tasks_run_from_the_folder() {
        let task = task_for_label(LABEL_RUN_FOLDER, &LaunchSettings::default(), None).unwrap();
        assert_eq!(task.cwd.as_deref(), Some(Path::new(FILE_DIRNAME)));

        let task = task_for_label(LABEL_RUN_ALL, &LaunchSettings::default(), None).unwrap();
        assert_eq!(task.cwd, None);
    }

    #[test]
    fn unknown_label_is_an_error() {
        let result = task_for_label("Make coffee", &LaunchSettings::default(), None);
        assert!(result.is_err());
    }

    #[test]
    fn nothing_is_lazily_resolved() {
        assert!(resolve_task(LABEL_RUN_OPENED).is_none());
    }

    #[test]
    fn plugin_task_is_foreground() {
        let task = plugin_task("kubernetes", &LaunchSettings::default(), None);
        assert!(!task.is_background);
        let values: Vec<_> = task.args.values().collect();
        assert_eq!(values, vec!["camel@apache/camel", "plugin", "add", "kubernetes"]);
    }

    #[test]
    fn descriptor_serializes_with_the_shell_task_shape() {
        let task = task_for_label(LABEL_DEBUG_OPENED, &LaunchSettings::default(), None).unwrap();
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["type"], "shell");
        assert_eq!(json["command"], "jbang");
        assert_eq!(json["isBackground"], true);
        assert_eq!(json["env"][SUSPEND_ENV], "true");
        assert!(json["args"].is_array());
    }
}
