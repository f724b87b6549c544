//! Folder and file name derivation.

use url::Url;

use crate::error::{Error, Result};

/// Suffix of files that are still being written.
pub const TEMP_SUFFIX: &str = ".part";

/// Validate and sanitize a filename by replacing invalid characters.
///
/// Returns an error if the filename is a relative path reference.
pub fn sanitize_filename(name: &str) -> Result<String> {
    // Reject path separators (should be sanitized, not allowed)
    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in filename: '{}'",
            name
        )));
    }

    // Reject null bytes
    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed in filename: '{}'",
            name
        )));
    }

    // Sanitize remaining problematic characters
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    // Reject empty or whitespace-only names
    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Filename cannot be empty or whitespace-only".to_string(),
        ));
    }

    reject_relative_reference(sanitized)
}

/// Sanitize a scraped title name into a single directory name.
///
/// Separators are replaced instead of rejected and runs of whitespace are
/// collapsed, since the name comes from page text.
pub fn sanitize_path_component(name: &str) -> Result<String> {
    // Reject null bytes
    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed: '{}'",
            name
        )));
    }

    // Sanitize problematic characters (replace with underscore)
    let sanitized: String = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    // Windows refuses trailing dots
    let sanitized = sanitized.trim_end_matches('.').to_string();

    // Reject empty or whitespace-only names
    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Path component cannot be empty or whitespace-only".to_string(),
        ));
    }

    reject_relative_reference(sanitized)
}

/// A separator-free name can only traverse when it is `.` or `..` itself.
fn reject_relative_reference(name: String) -> Result<String> {
    if name == "." || name == ".." {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }
    Ok(name)
}

fn last_segment(url: &Url) -> Option<&str> {
    url.path_segments()?.filter(|s| !s.is_empty()).last()
}

/// Derive a chapter's folder name from the last path segment of its URL.
pub fn chapter_folder_name(url: &Url) -> Result<String> {
    let segment = last_segment(url).ok_or_else(|| {
        Error::InvalidFilename(format!("Chapter URL has no path segment: {}", url))
    })?;
    sanitize_filename(&percent_decode(segment))
}

/// Derive a page's local file name from its URL, falling back to `page_<n>`.
pub fn page_file_name(url: &Url, index: usize) -> Result<String> {
    match last_segment(url) {
        Some(segment) => sanitize_filename(&percent_decode(segment)),
        None => Ok(format!("page_{}", index + 1)),
    }
}

fn percent_decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_valid() {
        assert_eq!(sanitize_filename("01.jpg").unwrap(), "01.jpg");
        assert_eq!(sanitize_filename("file:name.png").unwrap(), "file_name.png");
    }

    #[test]
    fn test_sanitize_filename_rejects_traversal_and_separators() {
        assert!(sanitize_filename("../etc/passwd").is_err());
        assert!(sanitize_filename("path/to/file.jpg").is_err());
        assert!(sanitize_filename("file\0name.jpg").is_err());
        assert!(sanitize_filename("   ").is_err());
        assert!(sanitize_filename("..").is_err());
        assert!(sanitize_filename(".").is_err());
    }

    #[test]
    fn test_sanitize_filename_keeps_doubled_dots() {
        assert_eq!(sanitize_filename("01..jpg").unwrap(), "01..jpg");
        assert_eq!(sanitize_filename("ch..2").unwrap(), "ch..2");
    }

    #[test]
    fn test_sanitize_path_component_title() {
        assert_eq!(
            sanitize_path_component("  It's Not My Fault\n  That I'm Not Popular! ").unwrap(),
            "It's Not My Fault That I'm Not Popular!"
        );
        assert_eq!(sanitize_path_component("Fate/Zero").unwrap(), "Fate_Zero");
        assert_eq!(sanitize_path_component("Title...").unwrap(), "Title");
        assert_eq!(sanitize_path_component("../evil").unwrap(), ".._evil");
        assert!(sanitize_path_component("..").is_err());
        assert!(sanitize_path_component(" \n ").is_err());
    }

    #[test]
    fn test_sanitize_path_component_keeps_ellipsis() {
        assert_eq!(
            sanitize_path_component("Wait... What?").unwrap(),
            "Wait... What_"
        );
        assert_eq!(sanitize_path_component("A..B").unwrap(), "A..B");
    }

    #[test]
    fn test_doubled_dots_in_urls() {
        let url = Url::parse("https://h1.example.org/auto/01..jpg").unwrap();
        assert_eq!(page_file_name(&url, 0).unwrap(), "01..jpg");

        let url = Url::parse("https://readmanga.me/title/vol1..ch2").unwrap();
        assert_eq!(chapter_folder_name(&url).unwrap(), "vol1..ch2");
    }

    #[test]
    fn test_chapter_folder_name() {
        let url = Url::parse("https://readmanga.me/some_title/vol1-ch2?mtr=1").unwrap();
        assert_eq!(chapter_folder_name(&url).unwrap(), "vol1-ch2");

        let url = Url::parse("https://readmanga.me/some_title/vol1/3/").unwrap();
        assert_eq!(chapter_folder_name(&url).unwrap(), "3");

        let url = Url::parse("https://readmanga.me/").unwrap();
        assert!(chapter_folder_name(&url).is_err());
    }

    #[test]
    fn test_page_file_name() {
        let url = Url::parse("https://h1.example.org/auto/15/20/01.png_res.jpg?t=1").unwrap();
        assert_eq!(page_file_name(&url, 0).unwrap(), "01.png_res.jpg");

        let url = Url::parse("https://h1.example.org/a/my%20page.jpg").unwrap();
        assert_eq!(page_file_name(&url, 0).unwrap(), "my page.jpg");

        let url = Url::parse("https://h1.example.org/").unwrap();
        assert_eq!(page_file_name(&url, 4).unwrap(), "page_5");
    }
}
