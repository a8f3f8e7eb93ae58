use crate::error::AppError;
use crate::model::{Priority, Task};
use crossbeam_channel::{Receiver, Sender, unbounded};

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::DesktopNotifier;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::DesktopNotifier;

/// A due-reminder event, detached from the store so consumers never hold
/// a reference into shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub task_id: String,
    pub title: String,
    pub description: String,
    pub due_at: Option<String>,
    pub priority: Priority,
}

impl Reminder {
    pub fn for_task(task: &Task) -> Self {
        Self {
            task_id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            due_at: task.due_at.clone(),
            priority: task.priority,
        }
    }
}

pub trait Notifier {
    fn notify(&self, reminder: &Reminder) -> Result<(), AppError>;
}

pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _reminder: &Reminder) -> Result<(), AppError> {
        Ok(())
    }
}

/// Sink used when no interface consumes reminders.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, reminder: &Reminder) -> Result<(), AppError> {
        tracing::info!(
            task_id = %reminder.task_id,
            title = %reminder.title,
            priority = reminder.priority.label(),
            "reminder due"
        );
        Ok(())
    }
}

/// Sends reminders over a channel; the receiver is the poll point the
/// command interface drains for display.
pub struct ChannelNotifier {
    sender: Sender<Reminder>,
}

pub fn reminder_channel() -> (ChannelNotifier, Receiver<Reminder>) {
    let (sender, receiver) = unbounded();
    (ChannelNotifier { sender }, receiver)
}

impl Notifier for ChannelNotifier {
    fn notify(&self, reminder: &Reminder) -> Result<(), AppError> {
        self.sender
            .send(reminder.clone())
            .map_err(|_| AppError::notification("reminder channel disconnected"))
    }
}

pub fn notifier_from_env() -> Box<dyn Notifier + Send> {
    if std::env::var("TASKTRACKR_DISABLE_NOTIFICATIONS").is_ok() {
        return Box::new(NoopNotifier);
    }

    platform_notifier().unwrap_or_else(|_| Box::new(NoopNotifier))
}

#[cfg(target_os = "linux")]
pub fn platform_notifier() -> Result<Box<dyn Notifier + Send>, AppError> {
    Ok(Box::new(DesktopNotifier))
}

#[cfg(windows)]
pub fn platform_notifier() -> Result<Box<dyn Notifier + Send>, AppError> {
    Ok(Box::new(DesktopNotifier))
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn platform_notifier() -> Result<Box<dyn Notifier + Send>, AppError> {
    Err(AppError::notification(
        "desktop notifications are not supported on this platform",
    ))
}
