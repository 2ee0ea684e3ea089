//! Client-side form validation for roster members and to-dos.
//!
//! Failures here are reported as [`CoreError::Validation`] and never reach
//! the store.

use chrono::NaiveDate;

use crate::error::CoreError;

pub const MEMBER_NAME_EMPTY: &str = "Member name cannot be empty";
pub const MEMBER_ALREADY_EXISTS: &str = "Member already exists";
pub const TASK_TEXT_EMPTY: &str = "Task description cannot be empty";
pub const ASSIGNEE_REQUIRED: &str = "Please assign the task to a family member";

/// Date format accepted for due dates (`YYYY-MM-DD`).
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Validate a new roster name against the currently loaded names.
///
/// Returns the trimmed name. Matching is exact and case-sensitive.
pub fn validate_member_name(name: &str, existing: &[String]) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(MEMBER_NAME_EMPTY.to_string()));
    }
    if existing.iter().any(|m| m == trimmed) {
        return Err(CoreError::Validation(MEMBER_ALREADY_EXISTS.to_string()));
    }
    Ok(trimmed.to_string())
}

/// A to-do that passed validation and is ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTodo {
    pub task_text: String,
    pub assigned_to: String,
    pub due_date: Option<NaiveDate>,
}

/// Validate the to-do form.
///
/// `roster_size` is the number of loaded family members: an assignee is only
/// required when there is someone to pick.
pub fn validate_new_todo(
    task_text: &str,
    assigned_to: &str,
    due_date: Option<&str>,
    roster_size: usize,
) -> Result<ValidatedTodo, CoreError> {
    let task_text = task_text.trim();
    if task_text.is_empty() {
        return Err(CoreError::Validation(TASK_TEXT_EMPTY.to_string()));
    }
    if assigned_to.is_empty() && roster_size > 0 {
        return Err(CoreError::Validation(ASSIGNEE_REQUIRED.to_string()));
    }

    Ok(ValidatedTodo {
        task_text: task_text.to_string(),
        assigned_to: assigned_to.to_string(),
        due_date: parse_due_date(due_date)?,
    })
}

/// Parse an optional due date. Absent or blank input means no due date.
pub fn parse_due_date(raw: Option<&str>) -> Result<Option<NaiveDate>, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, DUE_DATE_FORMAT)
            .map(Some)
            .map_err(|_| CoreError::Validation(format!("Invalid due date '{s}', expected YYYY-MM-DD"))),
    }
}
