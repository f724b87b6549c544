//! Error types for the manga-downloader application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Site errors
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Malformed page {url}: {message}")]
    MalformedPage { url: String, message: String },

    #[error("Missing embedded manifest: {0}")]
    MissingManifest(String),

    #[error("Could not decode embedded data: {0}")]
    Decode(String),

    #[error("Duplicate chapter folder '{0}' in title")]
    DuplicateChapter(String),

    // Download errors
    #[error("Gave up on {what} after {attempts} attempt(s): {last_error}")]
    GiveUp {
        what: String,
        attempts: u32,
        last_error: String,
    },

    #[error("{0} page(s) could not be downloaded")]
    IncompleteDownload(u64),

    // Archive errors
    #[error("Archive error for {folder}: {message}")]
    Archive { folder: String, message: String },

    // File system errors
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a malformed page error.
    pub fn malformed(url: impl ToString, message: impl Into<String>) -> Self {
        Error::MalformedPage {
            url: url.to_string(),
            message: message.into(),
        }
    }
}

impl Error {
    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_)
            | Error::ConfigValidation { .. }
            | Error::MissingConfig(_)
            | Error::TomlParse(_) => exit_codes::CONFIG_ERROR,
            Error::Fetch(_)
            | Error::MalformedPage { .. }
            | Error::MissingManifest(_)
            | Error::Decode(_)
            | Error::DuplicateChapter(_)
            | Error::GiveUp { .. }
            | Error::Http(_)
            | Error::UrlParse(_)
            | Error::Json(_)
            | Error::InvalidFilename(_) => exit_codes::FATAL_ERROR,
            Error::Archive { .. } | Error::Zip(_) => exit_codes::ARCHIVE_ERROR,
            Error::IncompleteDownload(_) => exit_codes::SOME_PAGES_FAILED,
            Error::Io(_) => exit_codes::UNEXPECTED_ERROR,
        }
    }
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FATAL_ERROR: i32 = 1;
    pub const ARCHIVE_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const SOME_PAGES_FAILED: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_exit_with_config_code() {
        assert_eq!(Error::Config("x".into()).exit_code(), 3);
        assert_eq!(Error::MissingConfig("title.url".into()).exit_code(), 3);
        assert_eq!(
            Error::ConfigValidation {
                field: "download.concurrency".into(),
                message: "must be at least 1".into(),
            }
            .exit_code(),
            3
        );
        let toml_err = toml::from_str::<toml::Value>("= broken").unwrap_err();
        assert_eq!(Error::from(toml_err).exit_code(), 3);
    }

    #[test]
    fn test_discovery_and_parse_errors_are_fatal() {
        let fatal = [
            Error::Fetch("HTTP 404".into()),
            Error::malformed("https://readmanga.me/t", "no chapter links found"),
            Error::MissingManifest("rm_h.init".into()),
            Error::Decode("page list is empty".into()),
            Error::DuplicateChapter("1".into()),
            Error::GiveUp {
                what: "chapter".into(),
                attempts: 6,
                last_error: "HTTP 503".into(),
            },
            Error::InvalidFilename("..".into()),
            Error::from(url::Url::parse("not a url").unwrap_err()),
        ];
        for err in fatal {
            assert_eq!(err.exit_code(), exit_codes::FATAL_ERROR, "{}", err);
        }
    }

    #[test]
    fn test_archive_incomplete_and_unexpected_codes() {
        let archive = Error::Archive {
            folder: "ch1".into(),
            message: "disk full".into(),
        };
        assert_eq!(archive.exit_code(), 2);
        assert_eq!(Error::IncompleteDownload(3).exit_code(), 4);
        let io = Error::from(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert_eq!(io.exit_code(), 5);
    }
}
