use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref SLUG_RE: Regex = Regex::new(r"^[a-z0-9][a-z0-9_-]*$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Lowercase identifier safe to use as a directory or file name fragment.
pub fn is_slug(value: &str) -> bool {
    SLUG_RE.is_match(value)
}

/// Collapses anything outside `[A-Za-z0-9_-]` into `_`.
pub fn sanitize_file_fragment(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Treats `None` and blank strings alike, mirroring how the browser sends
/// optional form values.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
