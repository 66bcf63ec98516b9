//! Input sanitisation applied before persistence.
//!
//! Free-text fields are sanitised by the services, never by the storage
//! adapters, so every write path goes through the same rules: plain fields
//! are trimmed, rich text is additionally HTML-escaped.

/// Trim surrounding whitespace from a plain text field.
#[must_use]
pub fn plain_text(value: &str) -> String {
    value.trim().to_owned()
}

/// Normalise a user identifier.
///
/// Trims whitespace and drops a trailing `@gmail.com`, the default mail
/// domain of the upstream identity provider, so the short and long forms of
/// the same identity map to one record.
#[must_use]
pub fn google_id(value: &str) -> String {
    let trimmed = value.trim();
    trimmed
        .strip_suffix("@gmail.com")
        .unwrap_or(trimmed)
        .to_owned()
}

/// Escape HTML-sensitive characters in rich text and trim the result.
///
/// Applied to the profile bio, which is rendered back into markup by the
/// front end.
#[must_use]
pub fn rich_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.trim().chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '/' => escaped.push_str("&#x2f;"),
            other => escaped.push(other),
        }
    }
    escaped
}
