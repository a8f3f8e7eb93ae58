use crate::model;
use crate::notify::{Notifier, Reminder};
use crate::store::TaskStore;
use crossbeam_channel::{RecvTimeoutError, Sender, bounded};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use time::OffsetDateTime;

/// Background reminder scanner. Wakes on a fixed interval, snapshots the
/// store, and fires at most one notification per task reminder. The wait is
/// a timed channel receive so shutdown interrupts it immediately, and the
/// thread is joined rather than killed, so it never dies mid-write.
pub struct SchedulerHandle {
    shutdown: Sender<()>,
    thread: JoinHandle<()>,
}

impl SchedulerHandle {
    pub fn shutdown(self) {
        let _ = self.shutdown.send(());
        let _ = self.thread.join();
    }
}

pub fn spawn(
    store: Arc<TaskStore>,
    notifier: Box<dyn Notifier + Send>,
    interval: Duration,
) -> SchedulerHandle {
    let (shutdown, shutdown_rx) = bounded::<()>(1);
    let thread = std::thread::spawn(move || {
        tracing::debug!(interval_secs = interval.as_secs(), "reminder scheduler started");
        loop {
            match shutdown_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    run_cycle(&store, notifier.as_ref(), OffsetDateTime::now_utc());
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        tracing::debug!("reminder scheduler stopped");
    });

    SchedulerHandle { shutdown, thread }
}

/// One scan over a store snapshot. A failure on one task is logged and the
/// scan moves on; nothing here terminates the scheduler loop. Returns the
/// number of reminders fired.
pub fn run_cycle(store: &TaskStore, notifier: &dyn Notifier, now: OffsetDateTime) -> usize {
    let snapshot = store.list();
    let mut fired = 0;

    for task in &snapshot {
        if task.completed || task.reminder_fired {
            continue;
        }
        let reminder_at = match task.reminder_at.as_deref() {
            Some(value) => value,
            None => continue,
        };
        match model::parse_rfc3339(reminder_at) {
            Ok(when) if when <= now => {}
            Ok(_) => continue,
            Err(err) => {
                tracing::warn!(task_id = %task.id, error = %err, "skipping unreadable reminder");
                continue;
            }
        }

        if let Err(err) = notifier.notify(&Reminder::for_task(task)) {
            tracing::warn!(task_id = %task.id, error = %err, "reminder notification failed");
            continue;
        }

        // The flag flips in memory even if the save fails, so the reminder
        // cannot fire twice within this process.
        if let Err(err) = store.mark_reminder_fired(&task.id) {
            tracing::warn!(task_id = %task.id, error = %err, "could not persist reminder flag");
        }
        fired += 1;
    }

    fired
}
