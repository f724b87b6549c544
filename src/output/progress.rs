//! Progress bar utilities.

use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for item counts.
///
/// The length may grow while the bar is shown, as chapters get queued.
pub fn create_item_bar(total: u64, message: &str) -> ProgressBar {
    let bar = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar().template(&format!(
        "{{spinner:.green}} {} [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
        message
    )) {
        bar.set_style(style.progress_chars("#>-"));
    }
    bar.enable_steady_tick(std::time::Duration::from_millis(100));
    bar
}
