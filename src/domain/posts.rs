use std::cmp::Ordering;

use time::{Date, format_description::FormatItem, macros::format_description};

use super::entities::{CommentRecord, PostRecord};
use super::error::DomainError;

pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[day padding:none] [month repr:long] [year]");

/// Upper bound on post and comment bodies, in characters.
pub const MAX_TEXT_CHARS: usize = 10_000;

/// Listing order shared by every timeline: newest first, id breaks ties.
pub fn newest_first(left: &PostRecord, right: &PostRecord) -> Ordering {
    right
        .created_at
        .cmp(&left.created_at)
        .then_with(|| right.id.cmp(&left.id))
}

/// Comments read top to bottom.
pub fn oldest_first(left: &CommentRecord, right: &CommentRecord) -> Ordering {
    left.created_at
        .cmp(&right.created_at)
        .then_with(|| left.id.cmp(&right.id))
}

/// Validate a post or comment body, returning it with surrounding whitespace removed.
pub fn normalize_text(field: &'static str, text: &str) -> Result<String, DomainError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > MAX_TEXT_CHARS {
        return Err(DomainError::validation(format!(
            "{field} exceeds {MAX_TEXT_CHARS} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Normalize an optional image reference; blank values mean "no image".
pub fn normalize_image(image: Option<&str>) -> Option<String> {
    image
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub fn format_human_date(date: Date) -> String {
    date.format(HUMAN_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}
