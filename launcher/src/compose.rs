use std::path::Path;

use settings::LaunchSettings;
use walkdir::WalkDir;

use crate::{ArgumentVector, LaunchMode, LaunchScope};

const LAUNCHER_ALIAS: &str = "camel@apache/camel";
const VENDOR_MARKER: &str = "redhat";
const REPOSITORY_FLAG_VERSION_PREFIX: &str = "4.8";
const GLOBAL_REPOS_PLACEHOLDER: &str = "#repos,";

/// Extra launch parameter that only makes sense when the workspace actually
/// ships XSLT stylesheets; jbang fails on a glob with no match.
const XSL_WILDCARD: &str = "*.xsl";

/// Builds the launcher argument vector for one launch.
///
/// Token order is fixed: version pin, suspend flag, launcher alias and
/// subcommand, file pattern, reload/logging flags, debug dependency,
/// camel-version flag, repository flag, user extra parameters, kubernetes
/// parameters. Missing settings shrink the vector, they never fail it.
pub fn compose(
    mode: &LaunchMode,
    scope: &LaunchScope,
    settings: &LaunchSettings,
    workspace_root: Option<&Path>,
) -> ArgumentVector {
    let mut args = ArgumentVector::default();

    if !settings.jbang_version.is_empty() {
        args.push_strong(format!("-Dcamel.jbang.version={}", settings.jbang_version));
    }
    if matches!(mode, LaunchMode::Debug) {
        args.push_strong("-Dorg.apache.camel.debugger.suspend=true");
        if matches!(scope, LaunchScope::OpenedFile { .. }) {
            args.push("--verbose");
        }
    }

    args.push(LAUNCHER_ALIAS);
    match mode {
        LaunchMode::Run | LaunchMode::Debug => {
            args.push("run");
            args.push(scope.pattern());
            args.push("--dev");
            args.push("--logging-level=info");
        }
        LaunchMode::Deploy => {
            args.push("kubernetes");
            args.push("run");
            args.push(scope.pattern());
        }
        LaunchMode::AddPlugin { name } => {
            args.push("plugin");
            args.push("add");
            args.push(name.clone());
        }
    }

    if matches!(mode, LaunchMode::Debug) {
        args.push_strong("--dep=org.apache.camel:camel-debug");
    }

    if !settings.camel_version.is_empty() {
        args.push(format!("--camel-version={}", settings.camel_version));
    }
    if let Some(repository) = maven_repository_argument(settings) {
        args.push(repository);
    }

    for parameter in &settings.extra_launch_parameters {
        if parameter == XSL_WILDCARD && !workspace_contains_extension(workspace_root, "xsl") {
            tracing::debug!(parameter = %parameter, "dropping extra parameter, no matching file in workspace");
            continue;
        }
        args.push(parameter.clone());
    }

    if matches!(mode, LaunchMode::Deploy) {
        for parameter in &settings.kubernetes_run_parameters {
            args.push(parameter.clone());
        }
    }

    args
}

/// Productized builds need the Red Hat maven repository on the resolver
/// path. Camel 4.8 moved the flag to `--repository=`, and jbang versions
/// before 4.8 do not understand the new name, so in that combination the
/// flag is dropped rather than renamed back.
fn maven_repository_argument(settings: &LaunchSettings) -> Option<String> {
    if !settings.camel_version.contains(VENDOR_MARKER) {
        return None;
    }
    let url = &settings.red_hat_maven_repository;
    if url.is_empty() {
        return None;
    }
    let placeholder = if settings.global_maven_repository_placeholder {
        GLOBAL_REPOS_PLACEHOLDER
    } else {
        ""
    };
    if settings.camel_version.starts_with(REPOSITORY_FLAG_VERSION_PREFIX) {
        if settings.jbang_version.starts_with(REPOSITORY_FLAG_VERSION_PREFIX) {
            return Some(format!("--repository={placeholder}{url}"));
        }
        return None;
    }
    Some(format!("--repos={placeholder}{url}"))
}

fn workspace_contains_extension(workspace_root: Option<&Path>, extension: &str) -> bool {
    let Some(root) = workspace_root else {
        return false;
    };
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .any(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|e| e == extension)
                    .unwrap_or(false)
        })
}
