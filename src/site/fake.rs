//! In-memory transport for network-free tests.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;
use url::Url;

use crate::error::{Error, Result};
use crate::site::client::Transport;

/// Serves documents by full URL and files by path, on any host not marked failing.
#[derive(Default)]
pub struct FakeTransport {
    pages: HashMap<String, String>,
    files: HashMap<String, Vec<u8>>,
    failing_hosts: HashSet<String>,
    flaky_pages: Mutex<HashMap<String, usize>>,
    gate: Option<Arc<Semaphore>>,
    requests: Mutex<Vec<String>>,
    downloads_started: AtomicUsize,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    /// Serve `body` for `path` on every healthy host.
    pub fn with_file(mut self, path: &str, body: &[u8]) -> Self {
        self.files.insert(path.to_string(), body.to_vec());
        self
    }

    pub fn with_failing_host(mut self, host: &str) -> Self {
        self.failing_hosts.insert(host.to_string());
        self
    }

    /// Fail the first `failures` loads of a document.
    pub fn with_flaky_page(self, url: &str, failures: usize) -> Self {
        self.flaky_pages
            .lock()
            .unwrap()
            .insert(url.to_string(), failures);
        self
    }

    /// Hold every download until the semaphore hands out a permit.
    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn downloads_started(&self) -> usize {
        self.downloads_started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get_text(&self, url: &Url) -> Result<String> {
        self.requests.lock().unwrap().push(url.to_string());

        {
            let mut flaky = self.flaky_pages.lock().unwrap();
            if let Some(remaining) = flaky.get_mut(url.as_str()) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(Error::Fetch(format!("GET {}: HTTP 503", url)));
                }
            }
        }

        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| Error::Fetch(format!("GET {}: HTTP 404", url)))
    }

    async fn download(&self, url: &Url, dest: &Path) -> Result<u64> {
        self.requests.lock().unwrap().push(url.to_string());
        self.downloads_started.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            // Like a real transport, the file exists while the body is pending.
            tokio::fs::write(dest, b"").await?;
            let _permit = gate
                .acquire()
                .await
                .map_err(|e| Error::Fetch(e.to_string()))?;
        }

        if let Some(host) = url.host_str() {
            if self.failing_hosts.contains(host) {
                return Err(Error::Fetch(format!("GET {}: connection refused", url)));
            }
        }

        let body = self
            .files
            .get(url.path())
            .ok_or_else(|| Error::Fetch(format!("GET {}: HTTP 404", url)))?;
        tokio::fs::write(dest, body).await?;
        Ok(body.len() as u64)
    }
}
