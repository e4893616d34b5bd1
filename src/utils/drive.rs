//! Google Drive share-link handling.
//!
//! Share links (`/file/d/<id>/view`, `open?id=<id>`) return an HTML preview page,
//! not the media itself. Before downloading we rewrite them to the endpoints that
//! serve bytes directly.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FILE_PATH_RE: Regex = Regex::new(r"drive\.google\.com/file/d/([a-zA-Z0-9_-]+)").unwrap();
    static ref QUERY_ID_RE: Regex = Regex::new(r"[?&]id=([a-zA-Z0-9_-]+)").unwrap();
    static ref ENDPOINT_ID_RE: Regex = Regex::new(r"(?:thumbnail|uc)\?id=([a-zA-Z0-9_-]+)").unwrap();
}

pub fn extract_file_id(url: &str) -> Option<&str> {
    [&*FILE_PATH_RE, &*QUERY_ID_RE, &*ENDPOINT_ID_RE]
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn is_drive_url(url: &str) -> bool {
    url.contains("drive.google.com")
}

/// Browser share links, as opposed to URLs already pointing at a media endpoint.
pub fn is_share_link(url: &str) -> bool {
    is_drive_url(url) && (FILE_PATH_RE.is_match(url) || url.contains("/open?id="))
}

/// Image endpoint for Drive links; anything else is returned untouched.
/// Cached media is always a still image, reel covers included.
pub fn direct_image_url(url: &str) -> String {
    if !is_drive_url(url) {
        return url.to_string();
    }

    match extract_file_id(url) {
        Some(id) => format!("https://drive.google.com/thumbnail?id={}&sz=w1600", id),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_share_path() {
        let url = "https://drive.google.com/file/d/1AbC_def-23/view?usp=sharing";
        assert_eq!(extract_file_id(url), Some("1AbC_def-23"));
    }

    #[test]
    fn test_extract_from_open_query() {
        assert_eq!(extract_file_id("https://drive.google.com/open?id=XYZ987"), Some("XYZ987"));
        assert_eq!(
            extract_file_id("https://drive.google.com/uc?export=download&id=XYZ987"),
            Some("XYZ987")
        );
    }

    #[test]
    fn test_image_links_use_thumbnail_endpoint() {
        assert_eq!(
            direct_image_url("https://drive.google.com/file/d/abc123/view"),
            "https://drive.google.com/thumbnail?id=abc123&sz=w1600"
        );
        assert_eq!(
            direct_image_url("https://drive.google.com/open?id=abc123"),
            "https://drive.google.com/thumbnail?id=abc123&sz=w1600"
        );
    }

    #[test]
    fn test_share_link_detection() {
        assert!(is_share_link("https://drive.google.com/file/d/abc123/view"));
        assert!(is_share_link("https://drive.google.com/open?id=abc123"));
        assert!(!is_share_link("https://drive.google.com/uc?export=download&id=abc123"));
        assert!(!is_share_link("https://drive.google.com/thumbnail?id=abc123&sz=w1600"));
    }

    #[test]
    fn test_foreign_urls_pass_through() {
        let url = "https://cdn.example.com/image.jpg?id=42";
        assert_eq!(direct_image_url(url), url);
    }
}
