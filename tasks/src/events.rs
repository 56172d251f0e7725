use std::sync::{Arc, Mutex};

use crossbeam_channel::{bounded, Receiver, Sender};

struct Waiter {
    label: String,
    tx: Sender<()>,
}

/// Broadcast hub for task lifecycle notifications.
///
/// Each call to [`TaskEvents::wait_for_task_end`] registers its own
/// one-shot channel, so several callers can wait on the same label at
/// once; every registered waiter resolves on the first matching end
/// notification it observes and is then dropped.
#[derive(Clone, Default)]
pub struct TaskEvents {
    waiters: Arc<Mutex<Vec<Waiter>>>,
}

impl TaskEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wait_for_task_end(&self, label: impl Into<String>) -> Receiver<()> {
        let (tx, rx) = bounded(1);
        self.waiters.lock().unwrap().push(Waiter {
            label: label.into(),
            tx,
        });
        rx
    }

    pub fn notify_task_end(&self, label: &str) {
        let mut waiters = self.waiters.lock().unwrap();
        waiters.retain(|waiter| {
            if waiter.label == label {
                let _ = waiter.tx.send(());
                false
            } else {
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waiter_resolves_on_matching_end() {
        let events = TaskEvents::new();
        let rx = events.wait_for_task_end("build");
        events.notify_task_end("build");
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn waiter_ignores_other_labels() {
        let events = TaskEvents::new();
        let rx = events.wait_for_task_end("build");
        events.notify_task_end("deploy");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn concurrent_waiters_on_the_same_label_all_resolve() {
        let events = TaskEvents::new();
        let first = events.wait_for_task_end("build");
        let second = events.wait_for_task_end("build");
        events.notify_task_end("build");
        assert!(first.try_recv().is_ok());
        assert!(second.try_recv().is_ok());
    }

    #[test]
    fn a_waiter_resolves_at_most_once() {
        let events = TaskEvents::new();
        let rx = events.wait_for_task_end("build");
        events.notify_task_end("build");
        events.notify_task_end("build");
        assert!(rx.try_recv().is_ok());
        // channel disconnected after the first resolution
        assert!(rx.try_recv().is_err());
    }
}
