use crate::error::AppError;
use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Priority {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(AppError::validation(format!(
                "priority must be low, medium, or high (got {other:?})"
            ))),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_at: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub reminder_at: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub reminder_fired: bool,
    pub created_at: String,
}

/// Raw creation fields, validated by the store before a `Task` exists.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_at: Option<String>,
    pub priority: Option<String>,
    pub reminder_at: Option<String>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_at: Option<String>,
    pub priority: Option<String>,
    pub reminder_at: Option<String>,
}

const DATETIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn validate_title(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("title is required"));
    }
    Ok(trimmed.to_string())
}

fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

fn to_rfc3339(value: OffsetDateTime) -> Result<String, AppError> {
    value
        .to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|err| AppError::validation(err.to_string()))
}

pub fn now_rfc3339() -> Result<String, AppError> {
    to_rfc3339(OffsetDateTime::now_utc())
}

/// Accepts RFC3339, `YYYY-MM-DD HH:MM`, or a bare `YYYY-MM-DD` (midnight).
/// Naive inputs are interpreted in the local offset; the result is
/// normalized to UTC RFC3339 for storage.
pub fn parse_datetime(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("datetime is required"));
    }

    if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return to_rfc3339(parsed);
    }

    let offset = local_offset();
    if let Ok(parsed) = PrimitiveDateTime::parse(trimmed, DATETIME_FORMAT) {
        return to_rfc3339(parsed.assume_offset(offset));
    }
    if let Ok(date) = Date::parse(trimmed, DATE_FORMAT) {
        return to_rfc3339(PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_offset(offset));
    }

    Err(AppError::validation(
        "datetime must be RFC3339, YYYY-MM-DD HH:MM, or YYYY-MM-DD",
    ))
}

pub fn parse_rfc3339(timestamp: &str) -> Result<OffsetDateTime, AppError> {
    OffsetDateTime::parse(timestamp, &Rfc3339)
        .map_err(|_| AppError::validation(format!("{timestamp:?} is not an RFC3339 timestamp")))
}

pub fn ensure_not_past(timestamp: &str, now: OffsetDateTime) -> Result<(), AppError> {
    let parsed = parse_rfc3339(timestamp)?;
    if parsed < now {
        return Err(AppError::validation("reminder time is in the past"));
    }
    Ok(())
}
