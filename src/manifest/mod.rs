//! Chapter manifest module.
//!
//! Provides:
//! - Title, chapter, page and mirror types
//! - Extraction of page lists and mirrors from chapter pages

pub mod item;
pub mod parser;

pub use item::{Chapter, Manifest, MirrorSet, Page, Title};
pub use parser::{PageManifestParser, ScriptManifestParser};
