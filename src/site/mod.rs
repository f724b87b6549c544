//! Content site module.
//!
//! This module provides:
//! - The transport used for documents and page images
//! - Title and chapter link discovery

pub mod client;
pub mod discover;

#[cfg(test)]
pub mod fake;

pub use client::{HttpTransport, Transport};
pub use discover::ChapterLinkDiscoverer;
