//! Input normalisation shared by the services.

use domains::{DomainError, Result};

/// Derives a slug from a title: lowercase, spaces become `-`, and anything
/// outside `[A-Za-z0-9_-]` is dropped.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| is_slug_char(*c))
        .collect()
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.chars().all(is_slug_char)
}

/// Top-level path segments served by the router itself.
pub const RESERVED_USERNAMES: [&str; 4] = ["api", "health", "metrics", "static"];

/// Usernames share the slug alphabet since they are URL segments too, and
/// must not shadow a fixed route.
pub fn is_valid_username(username: &str) -> bool {
    is_valid_slug(username)
        && !RESERVED_USERNAMES
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(username))
}

/// Trims a required field and rejects it when blank.
pub fn required(value: Option<&str>, message: &str) -> Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(DomainError::validation(message)),
    }
}

/// Trims an optional field; blank means absent.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Words in an HTML fragment, ignoring tags. Good enough for reading time.
pub fn word_count(html: &str) -> usize {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.split_whitespace().count()
}

/// Estimated minutes to read at 200 words per minute, never below one.
pub fn reading_minutes(html: &str) -> usize {
    word_count(html).div_ceil(200).max(1)
}
