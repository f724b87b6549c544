//! Manga Downloader - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use manga_downloader::{
    cli::Args,
    config::{parse_title_url, validate_config, Config},
    download::{RunReport, TitleDownloadDriver},
    error::{exit_codes, Result},
    output::{
        print_banner, print_config_summary, print_done, print_error, print_info,
        print_run_stats, print_success, print_warning,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    // Print banner
    print_banner();

    // Load configuration
    let config_path = args.config.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            config_path.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&config)?;
    let title_url = parse_title_url(config.title.url.as_deref())?;

    print_config_summary(title_url.as_str(), &config);

    print_info(&format!("Loading title {}", title_url));
    let driver = TitleDownloadDriver::from_config(&config)?;
    let report = driver.run(&title_url).await?;

    print_run_stats(&report);
    check_report(report)
}

/// Report how a finished run ended; archive failures win over failed pages.
fn check_report(mut report: RunReport) -> Result<()> {
    match report.take_failure() {
        Some(failure) => {
            for remaining in &report.archives.failures {
                print_error(&remaining.to_string());
            }
            print_done(&report);
            Err(failure)
        }
        None => {
            print_success(&format!(
                "Downloaded {} chapters of '{}'",
                report.stats.chapters, report.title
            ));
            print_done(&report);
            Ok(())
        }
    }
}
