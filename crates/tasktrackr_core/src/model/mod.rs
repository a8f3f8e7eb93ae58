mod task;

pub use task::{
    Priority, Task, TaskDraft, TaskPatch, ensure_not_past, now_rfc3339, parse_datetime,
    parse_rfc3339, validate_title,
};
