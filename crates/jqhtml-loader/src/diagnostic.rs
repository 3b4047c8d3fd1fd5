//! Conversion of compile failures into build diagnostics.

use std::path::Path;

use jqhtml_build::{Location, Message};

use crate::compiler::CompileError;

/// Text used when the compiler reports no message.
pub const FALLBACK_MESSAGE: &str = "jqhtml compilation failed";

/// Treats empty strings like missing values.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Builds the diagnostic text for a compile error.
///
/// The message comes first, then `Context:` after a blank line, then
/// `Suggestion:` on its own line. Absent or empty parts are skipped.
pub fn format_message(error: &CompileError) -> String {
    let mut text = present(&error.message)
        .unwrap_or(FALLBACK_MESSAGE)
        .to_string();

    if let Some(context) = present(&error.context) {
        text.push_str("\n\nContext: ");
        text.push_str(context);
    }
    if let Some(suggestion) = present(&error.suggestion) {
        text.push_str("\nSuggestion: ");
        text.push_str(suggestion);
    }

    text
}

/// Location of a compile error in `file`, if the compiler reported a line.
///
/// Line 0 counts as unknown. A missing column becomes 0.
pub fn location(error: &CompileError, file: &Path) -> Option<Location> {
    match error.line {
        Some(line) if line > 0 => Some(Location::new(file, line, error.column.unwrap_or(0))),
        _ => None,
    }
}

/// Converts a compile error into a single build diagnostic.
pub fn to_message(error: &CompileError, file: &Path) -> Message {
    Message {
        text: format_message(error),
        location: location(error, file),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_message_only() {
        let err = CompileError::new("Unexpected token");
        assert_eq!(format_message(&err), "Unexpected token");
    }

    #[test]
    fn test_missing_message_uses_fallback() {
        assert_eq!(format_message(&CompileError::default()), FALLBACK_MESSAGE);
        assert_eq!(format_message(&CompileError::new("")), FALLBACK_MESSAGE);
    }

    #[test]
    fn test_context_and_suggestion_order() {
        let err = CompileError::new("Bad tag")
            .context("<div")
            .suggestion("Close the tag");
        assert_eq!(
            format_message(&err),
            "Bad tag\n\nContext: <div\nSuggestion: Close the tag"
        );
    }

    #[test]
    fn test_context_only() {
        let err = CompileError::new("Bad tag").context("<div");
        assert_eq!(format_message(&err), "Bad tag\n\nContext: <div");
    }

    #[test]
    fn test_suggestion_only() {
        let err = CompileError::new("Bad tag").suggestion("Close the tag");
        assert_eq!(format_message(&err), "Bad tag\nSuggestion: Close the tag");
    }

    #[test]
    fn test_empty_context_is_skipped() {
        let err = CompileError::new("Bad tag").context("").suggestion("fix it");
        assert_eq!(format_message(&err), "Bad tag\nSuggestion: fix it");
    }

    #[test]
    fn test_location_requires_line() {
        let file = Path::new("/src/App.jqhtml");
        assert_eq!(location(&CompileError::new("x"), file), None);
        assert_eq!(location(&CompileError::new("x").line(0), file), None);
        assert_eq!(
            location(&CompileError::new("x").line(4), file),
            Some(Location::new(file, 4, 0))
        );
        assert_eq!(
            location(&CompileError::new("x").at(4, 10), file),
            Some(Location::new(file, 4, 10))
        );
    }

    #[test]
    fn test_to_message() {
        let file = Path::new("/src/App.jqhtml");
        let msg = to_message(&CompileError::new("Unexpected token").at(4, 10), file);
        assert_eq!(
            msg,
            Message::new("Unexpected token").with_location(Location::new(file, 4, 10))
        );
    }
}
