use crate::error::AppError;
use crate::notify::{Notifier, Reminder};
use tauri_winrt_notification::Toast;

pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, reminder: &Reminder) -> Result<(), AppError> {
        let detail = match reminder.due_at.as_deref() {
            Some(due_at) => format!("Due: {due_at} | Priority: {}", reminder.priority.label()),
            None => format!("Priority: {}", reminder.priority.label()),
        };

        Toast::new(Toast::POWERSHELL_APP_ID)
            .title("TaskTrackr reminder")
            .text1(&reminder.title)
            .text2(&detail)
            .show()
            .map_err(|err| AppError::notification(err.to_string()))
    }
}
