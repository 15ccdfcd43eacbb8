//! Package identifier checks.

use regex::Regex;
use std::sync::LazyLock;

// At least two dot-separated segments, each starting with a letter.
static PACKAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*(?:\.[A-Za-z][A-Za-z0-9_]*)+$").unwrap()
});

/// Check that `value` is a well-formed package identifier such as
/// `com.example.app`.
///
/// Returns a human readable reason on failure.
pub fn check_package_name(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("must not be empty".to_string());
    }
    if !PACKAGE_REGEX.is_match(value) {
        return Err(format!(
            "'{}' is not a valid package identifier (two or more dot-separated segments, each starting with a letter and holding only letters, digits or '_')",
            value
        ));
    }
    Ok(())
}
