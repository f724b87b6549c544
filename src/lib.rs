//! Manga Downloader - downloads manga titles chapter by chapter.
//!
//! This library discovers the chapters of a title from its listing page,
//! decodes the page list embedded in each chapter page and downloads every
//! page image with mirror failover and bounded retry.
//!
//! # Features
//!
//! - Chapter discovery with configurable CSS selectors
//! - Embedded page manifest decoding
//! - Bounded concurrent page downloads
//! - Random or round-robin mirror failover
//! - One zip archive per chapter folder
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use manga_downloader::{parse_title_url, Config, TitleDownloadDriver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let url = parse_title_url(config.title.url.as_deref())?;
//!
//!     let report = TitleDownloadDriver::from_config(&config)?.run(&url).await?;
//!     println!("{} pages downloaded", report.stats.pages_downloaded);
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod manifest;
pub mod output;
pub mod site;

// Re-exports for convenience
pub use config::{parse_title_url, Config};
pub use download::{RunReport, TitleDownloadDriver};
pub use error::{Error, Result};
pub use manifest::{Chapter, Manifest, MirrorSet, Page, Title};
