//! Filesystem module.
//!
//! Provides:
//! - Path and directory management
//! - Folder and file name derivation

pub mod naming;
pub mod paths;

pub use naming::{
    chapter_folder_name, page_file_name, sanitize_filename, sanitize_path_component,
    TEMP_SUFFIX,
};
pub use paths::{ensure_dir, is_temp_file, remove_temp_files, temp_path_for, title_dir};
