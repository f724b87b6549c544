//! Configuration structures and loading logic.

use crate::config::modes::{MarkerTieBreak, MirrorStrategy};
use crate::download::retry::RetryPolicy;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub title: TitleConfig,

    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub archive: ArchiveConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

/// Target title configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TitleConfig {
    /// Root (listing) page of the title to download.
    #[serde(default)]
    pub url: Option<String>,
}

/// Download options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Base directory for downloads.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Maximum number of page downloads running at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Whether to show the page progress bar.
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            directory: None,
            concurrency: default_concurrency(),
            show_progress: true,
        }
    }
}

/// Retry behaviour for chapter loads and page downloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempts per page image, across the primary host and its mirrors.
    #[serde(default = "default_page_attempts")]
    pub page_attempts: u32,

    /// First backoff delay between page attempts, in milliseconds.
    #[serde(default = "default_page_base_delay_ms")]
    pub page_base_delay_ms: u64,

    /// Upper bound for the page backoff delay, in milliseconds.
    #[serde(default = "default_page_max_delay_ms")]
    pub page_max_delay_ms: u64,

    /// Attempts per chapter document load.
    #[serde(default = "default_chapter_attempts")]
    pub chapter_attempts: u32,

    /// Fixed wait between chapter document loads, in seconds.
    #[serde(default = "default_chapter_interval")]
    pub chapter_interval_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            page_attempts: default_page_attempts(),
            page_base_delay_ms: default_page_base_delay_ms(),
            page_max_delay_ms: default_page_max_delay_ms(),
            chapter_attempts: default_chapter_attempts(),
            chapter_interval_secs: default_chapter_interval(),
        }
    }
}

impl RetryConfig {
    /// Exponential backoff policy used for page images.
    pub fn page_policy(&self) -> RetryPolicy {
        RetryPolicy::exponential(
            Duration::from_millis(self.page_base_delay_ms),
            Duration::from_millis(self.page_max_delay_ms),
            self.page_attempts,
        )
    }

    /// Fixed interval policy used for chapter documents.
    pub fn chapter_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(
            Duration::from_secs(self.chapter_interval_secs),
            self.chapter_attempts,
        )
    }
}

/// Site layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// CSS selector for the title name node on the root page.
    #[serde(default = "default_title_selector")]
    pub title_selector: String,

    /// CSS selector for chapter anchors on the root page.
    #[serde(default = "default_chapter_selector")]
    pub chapter_selector: String,

    /// Failover host selection strategy.
    #[serde(default)]
    pub mirror_strategy: MirrorStrategy,

    /// Resolution for chapter pages carrying a marker more than once.
    #[serde(default)]
    pub tie_break: MarkerTieBreak,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title_selector: default_title_selector(),
            chapter_selector: default_chapter_selector(),
            mirror_strategy: MirrorStrategy::default(),
            tie_break: MarkerTieBreak::default(),
        }
    }
}

/// Chapter archive configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Whether to pack chapter folders once downloading finished.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Deflate level, 0 (store fastest) to 9 (smallest).
    #[serde(default = "default_compression_level")]
    pub compression_level: i32,

    /// Delete each chapter folder after its archive was written.
    #[serde(default)]
    pub remove_folders: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            compression_level: default_compression_level(),
            remove_folders: false,
        }
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Browser user agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36".to_string()
}

fn default_title_selector() -> String {
    "span.name".to_string()
}

fn default_chapter_selector() -> String {
    "div.chapters-link a".to_string()
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    8
}

fn default_page_attempts() -> u32 {
    8
}

fn default_page_base_delay_ms() -> u64 {
    500
}

fn default_page_max_delay_ms() -> u64 {
    8_000
}

fn default_chapter_attempts() -> u32 {
    6
}

fn default_chapter_interval() -> u64 {
    10
}

fn default_compression_level() -> i32 {
    9
}

fn default_timeout() -> u64 {
    60
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Configuration file not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the effective download directory.
    pub fn download_directory(&self) -> PathBuf {
        self.download
            .directory
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
}
