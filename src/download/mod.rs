//! Download module for title downloading.
//!
//! This module provides:
//! - Bounded retry with backoff
//! - Mirror host selection
//! - Page downloading with failover
//! - Chapter scheduling into a bounded task group
//! - The whole-title driver and its statistics

pub mod chapter;
pub mod driver;
pub mod group;
pub mod mirror;
pub mod page;
pub mod retry;
pub mod state;

pub use chapter::{ChapterDownloadOrchestrator, ScheduledChapter};
pub use driver::{DownloadSettings, TitleDownloadDriver};
pub use group::TaskGroup;
pub use mirror::{selector_for, HostSelector, RandomSelector, RoundRobinSelector};
pub use page::PageFetcher;
pub use retry::{retry, Backoff, RetryPolicy};
pub use state::{DownloadStats, PageOutcome, RunReport};
