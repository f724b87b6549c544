//! Chapter manifest loading and page task scheduling.

use std::path::Path;
use std::sync::Arc;

use indicatif::ProgressBar;
use url::Url;

use crate::download::group::TaskGroup;
use crate::download::page::PageFetcher;
use crate::download::retry::{retry, RetryPolicy};
use crate::download::state::PageOutcome;
use crate::error::Result;
use crate::fs::ensure_dir;
use crate::manifest::{Chapter, PageManifestParser};
use crate::site::Transport;

/// What was queued for a chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledChapter {
    pub folder_name: String,
    pub page_count: usize,
}

/// Turns chapter URLs into page download tasks.
pub struct ChapterDownloadOrchestrator {
    transport: Arc<dyn Transport>,
    parser: Arc<dyn PageManifestParser>,
    fetcher: Arc<PageFetcher>,
    chapter_policy: RetryPolicy,
    progress: ProgressBar,
}

impl ChapterDownloadOrchestrator {
    pub fn new(
        transport: Arc<dyn Transport>,
        parser: Arc<dyn PageManifestParser>,
        fetcher: Arc<PageFetcher>,
        chapter_policy: RetryPolicy,
        progress: ProgressBar,
    ) -> Self {
        Self {
            transport,
            parser,
            fetcher,
            chapter_policy,
            progress,
        }
    }

    /// Load a chapter, decode its manifest and queue one task per page.
    ///
    /// Returns as soon as the tasks are queued; they are awaited through the group.
    pub async fn schedule_chapter(
        &self,
        chapter_url: &Url,
        folder_name: &str,
        title_dir: &Path,
        group: &mut TaskGroup<PageOutcome>,
    ) -> Result<ScheduledChapter> {
        let raw = retry(
            &self.chapter_policy,
            &format!("chapter {}", chapter_url),
            |_| {
                let transport = Arc::clone(&self.transport);
                let url = chapter_url.clone();
                async move { transport.get_text(&url).await }
            },
        )
        .await?;

        let manifest = self.parser.parse(&raw)?;
        let chapter = Chapter::from_manifest(chapter_url.clone(), folder_name.to_string(), manifest)?;

        let primary_host = chapter.pages[0].primary_url.host_str();
        if !chapter.mirrors.has_alternative_to(primary_host) {
            tracing::warn!(
                "Chapter {} has no mirror besides {}; failover will retry the same host",
                chapter.folder_name,
                primary_host.unwrap_or("the primary host")
            );
        }

        let chapter_dir = title_dir.join(&chapter.folder_name);
        ensure_dir(&chapter_dir).await?;

        let page_count = chapter.pages.len();
        self.progress.inc_length(page_count as u64);
        tracing::info!(
            "Queued chapter {} ({} pages, {} mirrors)",
            chapter.folder_name,
            page_count,
            chapter.mirrors.len()
        );

        for page in chapter.pages {
            let fetcher = Arc::clone(&self.fetcher);
            let mirrors = Arc::clone(&chapter.mirrors);
            let chapter_dir = chapter_dir.clone();
            let chapter_name = chapter.folder_name.clone();
            let progress = self.progress.clone();

            group.spawn(async move {
                let result = fetcher
                    .fetch(&page, &mirrors, &chapter_dir)
                    .await
                    .map(|(_, bytes)| bytes);
                progress.inc(1);
                PageOutcome {
                    chapter: chapter_name,
                    file_name: page.file_name,
                    result,
                }
            });
        }

        Ok(ScheduledChapter {
            folder_name: chapter.folder_name,
            page_count,
        })
    }
}
