use std::process::ExitStatus;

use eyre::WrapErr;

use crate::{TaskDescriptor, TaskEvents};

/// Spawns the task's shell command and blocks until it exits.
///
/// The exit status is reported back as-is; a failing launcher surfaces
/// through its own terminal output and is not interpreted here.
pub fn execute_task(task: &TaskDescriptor, events: &TaskEvents) -> eyre::Result<ExitStatus> {
    let mut command = std::process::Command::new(task.command);
    command.args(task.args.values());
    if let Some(cwd) = &task.cwd {
        command.current_dir(cwd);
    }
    command.envs(&task.env);

    tracing::debug!(label = %task.label, command = %task.args.shell_line(), "spawning task");
    let mut child = command
        .spawn()
        .wrap_err_with(|| format!("spawning task {:?}", task.label))?;
    let status = child
        .wait()
        .wrap_err_with(|| format!("waiting for task {:?}", task.label))?;

    if !status.success() {
        tracing::warn!(label = %task.label, status = ?status, "task exited with failure");
    }
    events.notify_task_end(&task.label);
    Ok(status)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn trivial_task() -> TaskDescriptor {
        TaskDescriptor {
            label: "true".to_string(),
            task_type: "shell",
            command: "true",
            args: Default::default(),
            cwd: None,
            env: BTreeMap::new(),
            is_background: false,
            problem_matcher: None,
            reveal: false,
        }
    }

    #[test]
    fn task_end_is_notified_after_exit() {
        let events = TaskEvents::new();
        let rx = events.wait_for_task_end("true");
        let status = execute_task(&trivial_task(), &events).unwrap();
        assert!(status.success());
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn missing_binary_is_an_error() {
        let mut task = trivial_task();
        task.command = "definitely-not-a-binary-on-path";
        let events = TaskEvents::new();
        assert!(execute_task(&task, &events).is_err());
    }
}
