//! Whole-title download: discover, schedule, join, archive.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use indicatif::ProgressBar;
use url::Url;

use crate::archive::{archive_all, ArchiveOptions, ArchiveReport};
use crate::config::{Config, SiteConfig};
use crate::download::chapter::ChapterDownloadOrchestrator;
use crate::download::group::TaskGroup;
use crate::download::mirror::{selector_for, HostSelector};
use crate::download::page::PageFetcher;
use crate::download::retry::RetryPolicy;
use crate::download::state::{DownloadStats, PageOutcome, RunReport};
use crate::error::{Error, Result};
use crate::fs::{ensure_dir, remove_temp_files, title_dir};
use crate::manifest::{PageManifestParser, ScriptManifestParser};
use crate::output::create_item_bar;
use crate::site::{ChapterLinkDiscoverer, HttpTransport, Transport};

/// Runtime settings of a download run.
#[derive(Debug, Clone)]
pub struct DownloadSettings {
    pub download_dir: PathBuf,
    pub concurrency: usize,
    pub page_policy: RetryPolicy,
    pub chapter_policy: RetryPolicy,
    /// `None` disables archiving.
    pub archive: Option<ArchiveOptions>,
    pub show_progress: bool,
}

impl DownloadSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            download_dir: config.download_directory(),
            concurrency: config.download.concurrency,
            page_policy: config.retry.page_policy(),
            chapter_policy: config.retry.chapter_policy(),
            archive: config.archive.enabled.then(|| ArchiveOptions {
                compression_level: config.archive.compression_level,
                remove_folders: config.archive.remove_folders,
            }),
            show_progress: config.download.show_progress,
        }
    }
}

/// Downloads one title end to end.
pub struct TitleDownloadDriver {
    discoverer: ChapterLinkDiscoverer,
    transport: Arc<dyn Transport>,
    parser: Arc<dyn PageManifestParser>,
    selector: Arc<dyn HostSelector>,
    settings: DownloadSettings,
}

impl TitleDownloadDriver {
    pub fn new(
        transport: Arc<dyn Transport>,
        parser: Arc<dyn PageManifestParser>,
        selector: Arc<dyn HostSelector>,
        site: &SiteConfig,
        settings: DownloadSettings,
    ) -> Result<Self> {
        let discoverer = ChapterLinkDiscoverer::new(
            Arc::clone(&transport),
            &site.title_selector,
            &site.chapter_selector,
        )?;

        Ok(Self {
            discoverer,
            transport,
            parser,
            selector,
            settings,
        })
    }

    /// Build a driver with the HTTP transport and script manifest parser.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(
            &config.http.user_agent,
            Duration::from_secs(config.http.timeout_secs),
        )?);

        Self::new(
            transport,
            Arc::new(ScriptManifestParser::new(config.site.tie_break)),
            selector_for(config.site.mirror_strategy),
            &config.site,
            DownloadSettings::from_config(config),
        )
    }

    /// Download every chapter of the title at `title_url`, then archive them.
    ///
    /// Discovery and manifest errors abort the run. Pages that exhaust their
    /// retries are counted as failed and the run continues.
    pub async fn run(&self, title_url: &Url) -> Result<RunReport> {
        let started = Instant::now();

        let title = self.discoverer.discover(title_url).await?;
        let chapters = title.chapter_folders()?;
        tracing::info!("Found {} chapters of '{}'", chapters.len(), title.name);

        let title_dir = title_dir(&self.settings.download_dir, &title.name);
        ensure_dir(&title_dir).await?;

        let progress = if self.settings.show_progress {
            create_item_bar(0, "Pages")
        } else {
            ProgressBar::hidden()
        };

        let fetcher = Arc::new(PageFetcher::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.selector),
            self.settings.page_policy.clone(),
        ));
        let orchestrator = ChapterDownloadOrchestrator::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.parser),
            fetcher,
            self.settings.chapter_policy.clone(),
            progress.clone(),
        );

        let mut stats = DownloadStats::default();
        let mut group: TaskGroup<PageOutcome> = TaskGroup::new(self.settings.concurrency);

        let mut scheduled_dirs = Vec::with_capacity(chapters.len());
        for (chapter_url, folder_name) in &chapters {
            match orchestrator
                .schedule_chapter(chapter_url, folder_name, &title_dir, &mut group)
                .await
            {
                Ok(scheduled) => {
                    stats.add_chapter(scheduled.page_count);
                    scheduled_dirs.push(title_dir.join(&scheduled.folder_name));
                }
                Err(e) => {
                    progress.finish_and_clear();
                    abort_pages(group, &scheduled_dirs).await;
                    return Err(e);
                }
            }
        }

        tracing::info!(
            "Waiting for {} page downloads ({} still running)",
            group.spawned(),
            group.pending()
        );
        for joined in group.join_all().await {
            match joined {
                Ok(outcome) => stats.record(&outcome),
                Err(e) => {
                    tracing::error!("Page task did not finish: {}", e);
                    stats.record_lost_task();
                }
            }
        }
        progress.finish_and_clear();

        let archives = match &self.settings.archive {
            Some(options) => {
                let dir = title_dir.clone();
                let options = options.clone();
                tokio::task::spawn_blocking(move || archive_all(&dir, &options))
                    .await
                    .map_err(|e| Error::Archive {
                        folder: title_dir.display().to_string(),
                        message: e.to_string(),
                    })??
            }
            None => ArchiveReport::default(),
        };

        Ok(RunReport {
            title: title.name,
            title_dir,
            stats,
            archives,
            elapsed: started.elapsed(),
        })
    }
}

/// Stop every page task and clear the temp files they left behind.
async fn abort_pages(group: TaskGroup<PageOutcome>, chapter_dirs: &[PathBuf]) {
    tracing::warn!("Aborting {} queued page downloads", group.pending());
    group.shutdown().await;

    for dir in chapter_dirs {
        if let Err(e) = remove_temp_files(dir).await {
            tracing::warn!("Could not clean {}: {}", dir.display(), e);
        }
    }
}
