//! Shell-style wildcard matching for cache keys.

use regex::Regex;
use tracing::warn;

/// Match `key` against a pattern where `*` matches any run of characters and
/// `?` matches exactly one. The pattern is anchored at both ends; every other
/// character matches literally.
pub fn matches(key: &str, pattern: &str) -> bool {
    if pattern == "*" {
        return true;
    }

    let mut translated = String::with_capacity(pattern.len() + 8);
    translated.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => translated.push_str(".*"),
            '?' => translated.push('.'),
            other => translated.push_str(&regex::escape(&other.to_string())),
        }
    }
    translated.push('$');

    match Regex::new(&translated) {
        Ok(regex) => regex.is_match(key),
        Err(err) => {
            warn!(pattern, error = %err, "Failed to compile wildcard pattern");
            false
        }
    }
}
