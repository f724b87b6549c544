//! Download statistics and run reports.

use std::path::PathBuf;
use std::time::Duration;

use crate::archive::ArchiveReport;
use crate::error::Error;

/// Result of a single page task.
#[derive(Debug)]
pub struct PageOutcome {
    pub chapter: String,
    pub file_name: String,
    pub result: Result<u64, Error>,
}

/// Page counters for one title.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DownloadStats {
    pub chapters: u64,
    pub pages_scheduled: u64,
    pub pages_downloaded: u64,
    pub pages_failed: u64,
    pub bytes_downloaded: u64,
}

impl DownloadStats {
    /// Record a scheduled chapter and its page count.
    pub fn add_chapter(&mut self, pages: usize) {
        self.chapters += 1;
        self.pages_scheduled += pages as u64;
    }

    /// Record a finished page task.
    pub fn record(&mut self, outcome: &PageOutcome) {
        match &outcome.result {
            Ok(bytes) => {
                self.pages_downloaded += 1;
                self.bytes_downloaded += bytes;
            }
            Err(e) => {
                tracing::error!(
                    "Page {}/{} not downloaded: {}",
                    outcome.chapter,
                    outcome.file_name,
                    e
                );
                self.pages_failed += 1;
            }
        }
    }

    /// Record a task that panicked or was cancelled.
    pub fn record_lost_task(&mut self) {
        self.pages_failed += 1;
    }
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunReport {
    pub title: String,
    pub title_dir: PathBuf,
    pub stats: DownloadStats,
    pub archives: ArchiveReport,
    pub elapsed: Duration,
}

impl RunReport {
    /// Elapsed wall-clock time in minutes.
    pub fn elapsed_minutes(&self) -> f64 {
        self.elapsed.as_secs_f64() / 60.0
    }

    /// The error that decides how a finished run exits, if any.
    ///
    /// Archive failures win over failed pages.
    pub fn take_failure(&mut self) -> Option<Error> {
        if !self.archives.failures.is_empty() {
            return Some(self.archives.failures.remove(0));
        }
        if self.stats.pages_failed > 0 {
            return Some(Error::IncompleteDownload(self.stats.pages_failed));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_outcomes() {
        let mut stats = DownloadStats::default();
        stats.add_chapter(2);
        stats.record(&PageOutcome {
            chapter: "ch1".into(),
            file_name: "01.jpg".into(),
            result: Ok(100),
        });
        stats.record(&PageOutcome {
            chapter: "ch1".into(),
            file_name: "02.jpg".into(),
            result: Err(Error::Fetch("HTTP 404".into())),
        });

        assert_eq!(stats.chapters, 1);
        assert_eq!(stats.pages_scheduled, 2);
        assert_eq!(stats.pages_downloaded, 1);
        assert_eq!(stats.pages_failed, 1);
        assert_eq!(stats.bytes_downloaded, 100);
    }

    fn report(pages_failed: u64, archive_failures: usize) -> RunReport {
        RunReport {
            title: "Some Title".into(),
            title_dir: PathBuf::from("/dl/Some Title"),
            stats: DownloadStats {
                chapters: 2,
                pages_scheduled: 5,
                pages_downloaded: 5 - pages_failed,
                pages_failed,
                bytes_downloaded: 0,
            },
            archives: ArchiveReport {
                archived: Vec::new(),
                failures: (0..archive_failures)
                    .map(|i| Error::Archive {
                        folder: format!("ch{}", i + 1),
                        message: "disk full".into(),
                    })
                    .collect(),
            },
            elapsed: Duration::from_secs(90),
        }
    }

    #[test]
    fn test_clean_run_has_no_failure() {
        let mut report = report(0, 0);
        assert!(report.take_failure().is_none());
        assert_eq!(report.elapsed_minutes(), 1.5);
    }

    #[test]
    fn test_failed_pages_exit_incomplete() {
        let failure = report(2, 0).take_failure().unwrap();
        assert!(matches!(failure, Error::IncompleteDownload(2)));
        assert_eq!(failure.exit_code(), 4);
    }

    #[test]
    fn test_archive_failure_wins_over_failed_pages() {
        let failure = report(2, 1).take_failure().unwrap();
        assert!(matches!(&failure, Error::Archive { folder, .. } if folder == "ch1"));
        assert_eq!(failure.exit_code(), 2);
    }
}
