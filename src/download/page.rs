//! Page image downloading with mirror failover.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::download::mirror::{rehost, HostSelector};
use crate::download::retry::{retry, RetryPolicy};
use crate::error::Result;
use crate::fs::temp_path_for;
use crate::manifest::{MirrorSet, Page};
use crate::site::Transport;

/// Downloads single pages, moving to another mirror after every failure.
pub struct PageFetcher {
    transport: Arc<dyn Transport>,
    selector: Arc<dyn HostSelector>,
    policy: RetryPolicy,
}

impl PageFetcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        selector: Arc<dyn HostSelector>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            selector,
            policy,
        }
    }

    /// Download `page` into `dest_dir`, returning the final path and byte count.
    ///
    /// The first attempt uses the page's primary URL, later ones the same URL on
    /// a mirror host. Data lands in a `.part` file that is only renamed into
    /// place once complete.
    pub async fn fetch(
        &self,
        page: &Page,
        mirrors: &MirrorSet,
        dest_dir: &Path,
    ) -> Result<(PathBuf, u64)> {
        let dest = page.destination(dest_dir);
        let temp = temp_path_for(&dest);
        let what = format!("page {}", page.primary_url);

        let bytes = retry(&self.policy, &what, |attempt| {
            let url = if attempt == 1 {
                Ok(page.primary_url.clone())
            } else {
                rehost(&page.primary_url, self.selector.pick(mirrors))
            };
            let transport = Arc::clone(&self.transport);
            let temp = temp.clone();
            let dest = dest.clone();

            async move {
                let url = url?;
                tracing::debug!("Downloading {} (attempt {})", url, attempt);

                match transport.download(&url, &temp).await {
                    Ok(bytes) => {
                        tokio::fs::rename(&temp, &dest).await?;
                        Ok(bytes)
                    }
                    Err(e) => {
                        let _ = tokio::fs::remove_file(&temp).await;
                        Err(e)
                    }
                }
            }
        })
        .await?;

        Ok((dest, bytes))
    }
}
