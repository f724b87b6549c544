//! Configuration module for the manga-downloader.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Mirror selection and manifest tie-break modes
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{
    ArchiveConfig, Config, DownloadConfig, HttpConfig, RetryConfig, SiteConfig, TitleConfig,
};
pub use modes::{MarkerTieBreak, MirrorStrategy};
pub use validation::{parse_title_url, validate_config};
