use crate::error::AppError;
use crate::notify::{Notifier, Reminder};
use notify_rust::Notification;

pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, reminder: &Reminder) -> Result<(), AppError> {
        let mut body = reminder.title.clone();
        if !reminder.description.is_empty() {
            body.push('\n');
            body.push_str(&reminder.description);
        }
        if let Some(due_at) = reminder.due_at.as_deref() {
            body.push_str(&format!("\nDue: {due_at}"));
        }
        body.push_str(&format!("\nPriority: {}", reminder.priority.label()));

        Notification::new()
            .summary("TaskTrackr reminder")
            .body(&body)
            .show()
            .map(|_| ())
            .map_err(|err| AppError::notification(err.to_string()))
    }
}
