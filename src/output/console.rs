//! Console output utilities.

use console::style;

use crate::config::Config;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     Manga Downloader                                  ║
║     Chapters, mirrors and zips                        ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(title_url: &str, config: &Config) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Title:       {}", title_url);
    println!("  Directory:   {}", config.download_directory().display());
    println!("  Concurrency: {}", config.download.concurrency);
    println!(
        "  Mirrors:     {} (page attempts: {})",
        config.site.mirror_strategy, config.retry.page_attempts
    );
    if config.archive.enabled {
        println!(
            "  Archives:    zip, level {}",
            config.archive.compression_level
        );
    } else {
        println!("  Archives:    disabled");
    }
    println!();
}
