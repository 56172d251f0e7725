//! Shell-task descriptors for launching Camel applications, plus the
//! notification hub used to wait for a launched task to finish.

mod descriptor;
mod events;
mod exec;

pub use descriptor::{
    launch_task, plugin_task, provide_tasks, resolve_task, task_for_label, TaskDescriptor,
    LABEL_DEBUG_ALL, LABEL_DEBUG_FOLDER, LABEL_DEBUG_OPENED, LABEL_DEPLOY, LABEL_RUN_ALL,
    LABEL_RUN_FOLDER, LABEL_RUN_OPENED,
};
pub use events::TaskEvents;
pub use exec::execute_task;
