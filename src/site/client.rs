//! HTTP transport for pages and images.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::error::{Error, Result};

/// Fetches documents and files from the content site.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET a document and return its body as text.
    async fn get_text(&self, url: &Url) -> Result<String>;

    /// GET a file and stream it to `dest`, returning the number of bytes written.
    async fn download(&self, url: &Url, dest: &Path) -> Result<u64>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new transport with the given user agent and request timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn get(&self, url: &Url) -> Result<Response> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("GET {}: {}", url, e)))?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(Error::Fetch(format!("GET {}: HTTP {}", url, status)));
        }

        Ok(response)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_text(&self, url: &Url) -> Result<String> {
        let response = self.get(url).await?;
        response
            .text()
            .await
            .map_err(|e| Error::Fetch(format!("GET {}: {}", url, e)))
    }

    async fn download(&self, url: &Url, dest: &Path) -> Result<u64> {
        let response = self.get(url).await?;

        let mut file = File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Fetch(format!("Stream error: {}", e)))?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
        }

        file.flush().await?;

        if downloaded == 0 {
            return Err(Error::Fetch(format!("GET {}: empty body", url)));
        }

        Ok(downloaded)
    }
}
