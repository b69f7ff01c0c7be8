//! Common validation utilities.

use validator::ValidationError;

/// Returns true when the value is empty or contains only whitespace.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validates that a text field carries at least one non-whitespace character.
///
/// Phrase titles and bodies are both required; a value made only of spaces
/// counts as missing.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if is_blank(value) {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be empty".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Checks both required phrase fields at once.
///
/// Used where a whole `{title, content}` pair is accepted or skipped as a unit,
/// e.g. batch items and client-side drafts.
pub fn has_title_and_content(title: &str, content: &str) -> bool {
    !is_blank(title) && !is_blank(content)
}
