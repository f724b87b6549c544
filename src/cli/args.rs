//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{Config, MarkerTieBreak, MirrorStrategy};

/// Manga title downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "manga-downloader",
    version,
    about = "Download a manga title chapter by chapter and pack each chapter into a zip",
    long_about = "Downloads every chapter of a manga title from its listing page.\n\n\
                  Page images fail over across the mirror hosts advertised by each chapter, \
                  and every chapter folder is packed into a zip archive once all pages finished."
)]
pub struct Args {
    /// Title root (listing) page URL.
    #[arg(env = "MANGA_TITLE_URL")]
    pub url: Option<String>,

    /// Base directory for downloads.
    #[arg(short = 'd', long = "directory")]
    pub download_directory: Option<PathBuf>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Maximum number of concurrent page downloads.
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Attempts per page image before giving up.
    #[arg(long)]
    pub page_attempts: Option<u32>,

    /// Attempts per chapter page load before giving up.
    #[arg(long)]
    pub chapter_attempts: Option<u32>,

    /// Seconds to wait between chapter page load attempts.
    #[arg(long)]
    pub chapter_interval: Option<u64>,

    /// How failover mirrors are chosen.
    #[arg(long, value_enum)]
    pub mirror_strategy: Option<MirrorStrategyArg>,

    /// Which line wins when a chapter page repeats a manifest marker.
    #[arg(long, value_enum)]
    pub tie_break: Option<TieBreakArg>,

    /// Deflate level for chapter archives (0-9).
    #[arg(long)]
    pub compression_level: Option<i32>,

    /// Keep chapter folders without packing them into archives.
    #[arg(long)]
    pub no_archive: bool,

    /// Delete chapter folders once their archive was written.
    #[arg(long)]
    pub remove_folders: bool,

    /// Hide the progress bar.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI mirror strategy argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MirrorStrategyArg {
    /// Pick a mirror at random for every retry.
    Random,
    /// Cycle through mirrors in order.
    RoundRobin,
}

impl From<MirrorStrategyArg> for MirrorStrategy {
    fn from(arg: MirrorStrategyArg) -> Self {
        match arg {
            MirrorStrategyArg::Random => MirrorStrategy::Random,
            MirrorStrategyArg::RoundRobin => MirrorStrategy::RoundRobin,
        }
    }
}

/// CLI marker tie-break argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TieBreakArg {
    /// Use the first matching line.
    First,
    /// Use the last matching line.
    Last,
    /// Fail the chapter.
    Reject,
}

impl From<TieBreakArg> for MarkerTieBreak {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::First => MarkerTieBreak::First,
            TieBreakArg::Last => MarkerTieBreak::Last,
            TieBreakArg::Reject => MarkerTieBreak::Reject,
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(self, config: &mut Config) {
        if let Some(url) = self.url {
            config.title.url = Some(url);
        }

        if let Some(dir) = self.download_directory {
            config.download.directory = Some(dir);
        }

        if let Some(concurrency) = self.concurrency {
            config.download.concurrency = concurrency;
        }

        if let Some(attempts) = self.page_attempts {
            config.retry.page_attempts = attempts;
        }

        if let Some(attempts) = self.chapter_attempts {
            config.retry.chapter_attempts = attempts;
        }

        if let Some(interval) = self.chapter_interval {
            config.retry.chapter_interval_secs = interval;
        }

        if let Some(strategy) = self.mirror_strategy {
            config.site.mirror_strategy = strategy.into();
        }

        if let Some(tie_break) = self.tie_break {
            config.site.tie_break = tie_break.into();
        }

        if let Some(level) = self.compression_level {
            config.archive.compression_level = level;
        }

        // Boolean flags (only override if set to non-default)
        if self.no_archive {
            config.archive.enabled = false;
        }

        if self.remove_folders {
            config.archive.remove_folders = true;
        }

        if self.quiet {
            config.download.show_progress = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_url_and_overrides() {
        let args = Args::parse_from([
            "manga-downloader",
            "https://readmanga.me/some_title",
            "-j",
            "4",
            "--mirror-strategy",
            "round-robin",
            "--no-archive",
            "-q",
        ]);

        let mut config = Config::default();
        args.merge_into_config(&mut config);

        assert_eq!(
            config.title.url.as_deref(),
            Some("https://readmanga.me/some_title")
        );
        assert_eq!(config.download.concurrency, 4);
        assert_eq!(config.site.mirror_strategy, MirrorStrategy::RoundRobin);
        assert!(!config.archive.enabled);
        assert!(!config.download.show_progress);
    }

    #[test]
    fn test_unset_flags_keep_config_values() {
        let args = Args::parse_from(["manga-downloader"]);

        let mut config = Config::default();
        config.title.url = Some("https://readmanga.me/from_file".to_string());
        config.retry.page_attempts = 3;
        args.merge_into_config(&mut config);

        assert_eq!(
            config.title.url.as_deref(),
            Some("https://readmanga.me/from_file")
        );
        assert_eq!(config.retry.page_attempts, 3);
        assert!(config.archive.enabled);
    }
}
