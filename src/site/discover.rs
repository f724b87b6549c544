//! Title and chapter link discovery from a title's root page.

use std::sync::Arc;

use scraper::{Html, Selector};
use url::Url;

use crate::error::{Error, Result};
use crate::fs::sanitize_path_component;
use crate::manifest::Title;
use crate::site::client::Transport;

/// Finds a title's name and chapter URLs.
pub struct ChapterLinkDiscoverer {
    transport: Arc<dyn Transport>,
    title_selector: Selector,
    chapter_selector: Selector,
}

impl ChapterLinkDiscoverer {
    pub fn new(
        transport: Arc<dyn Transport>,
        title_selector: &str,
        chapter_selector: &str,
    ) -> Result<Self> {
        Ok(Self {
            transport,
            title_selector: parse_selector("site.title_selector", title_selector)?,
            chapter_selector: parse_selector("site.chapter_selector", chapter_selector)?,
        })
    }

    /// Load the root page and extract the title. Fetch errors are not retried.
    pub async fn discover(&self, root_url: &Url) -> Result<Title> {
        let html = self.transport.get_text(root_url).await?;
        self.parse_title(root_url, &html)
    }

    /// Extract the title name and chapter URLs from a root page document.
    pub fn parse_title(&self, root_url: &Url, html: &str) -> Result<Title> {
        let document = Html::parse_document(html);

        let raw_name: String = document
            .select(&self.title_selector)
            .next()
            .ok_or_else(|| Error::malformed(root_url, "title name node not found"))?
            .text()
            .collect();

        if raw_name.trim().is_empty() {
            return Err(Error::malformed(root_url, "title name is empty"));
        }
        let name = sanitize_path_component(&raw_name)?;

        let anchors: Vec<_> = document.select(&self.chapter_selector).collect();
        if anchors.is_empty() {
            return Err(Error::malformed(root_url, "no chapter links found"));
        }

        let site_root = site_root(root_url);
        let mut chapters = Vec::with_capacity(anchors.len());
        for anchor in anchors {
            match anchor.value().attr("href").map(str::trim) {
                Some(href) if !href.is_empty() => {
                    chapters.push(resolve_chapter_url(&site_root, href)?);
                }
                _ => tracing::debug!("Skipping chapter anchor without href"),
            }
        }

        if chapters.is_empty() {
            return Err(Error::malformed(root_url, "chapter links have no href"));
        }

        tracing::debug!("Found {} chapters for '{}'", chapters.len(), name);

        Ok(Title {
            root_url: root_url.clone(),
            name,
            chapters,
        })
    }
}

fn parse_selector(field: &str, selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| Error::ConfigValidation {
        field: field.to_string(),
        message: format!("Invalid selector '{}': {:?}", selector, e),
    })
}

/// Scheme, host and port of a URL, without path, query or fragment.
fn site_root(url: &Url) -> Url {
    let mut root = url.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    root
}

/// Chapter links are site-absolute: any path prefix of the root page is dropped.
fn resolve_chapter_url(site_root: &Url, href: &str) -> Result<Url> {
    let href = if href.starts_with('/') || href.contains("://") {
        href.to_string()
    } else {
        format!("/{}", href)
    };
    Ok(site_root.join(&href)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::fake::FakeTransport;

    const ROOT_PAGE: &str = r#"
        <html><body>
          <h1><span class="name">  Some   Title </span></h1>
          <div class="expandable chapters-link">
            <table>
              <tr><td><a href="/some_title/vol1/2?mtr=1">Vol 1 - 2</a></td></tr>
              <tr><td><a href="some_title/vol1/1">Vol 1 - 1</a></td></tr>
              <tr><td><a>broken</a></td></tr>
            </table>
          </div>
        </body></html>
    "#;

    fn discoverer(transport: FakeTransport) -> ChapterLinkDiscoverer {
        ChapterLinkDiscoverer::new(Arc::new(transport), "span.name", "div.chapters-link a")
            .unwrap()
    }

    #[tokio::test]
    async fn test_discover_title() {
        let root = Url::parse("https://readmanga.me/some_title?x=1").unwrap();
        let transport = FakeTransport::new().with_page(root.as_str(), ROOT_PAGE);

        let title = discoverer(transport).discover(&root).await.unwrap();

        assert_eq!(title.name, "Some Title");
        assert_eq!(
            title.chapters,
            vec![
                Url::parse("https://readmanga.me/some_title/vol1/2?mtr=1").unwrap(),
                Url::parse("https://readmanga.me/some_title/vol1/1").unwrap(),
            ]
        );
    }

    #[test]
    fn test_resolution_drops_root_path() {
        let root = Url::parse("http://localhost:8080/catalog/some_title").unwrap();
        let html = r#"<span class="name">T</span>
            <div class="chapters-link"><a href="/t/ch1">1</a></div>"#;

        let title = discoverer(FakeTransport::new())
            .parse_title(&root, html)
            .unwrap();
        assert_eq!(title.chapters[0].as_str(), "http://localhost:8080/t/ch1");
    }

    #[test]
    fn test_missing_title_name() {
        let root = Url::parse("https://readmanga.me/t").unwrap();
        let html = r#"<div class="chapters-link"><a href="/t/ch1">1</a></div>"#;

        let err = discoverer(FakeTransport::new())
            .parse_title(&root, html)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedPage { .. }));
    }

    #[test]
    fn test_missing_chapter_links() {
        let root = Url::parse("https://readmanga.me/t").unwrap();
        let html = r#"<span class="name">T</span><div class="chapters-link"></div>"#;

        let err = discoverer(FakeTransport::new())
            .parse_title(&root, html)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedPage { .. }));
    }

    #[tokio::test]
    async fn test_root_fetch_error_propagates() {
        let root = Url::parse("https://readmanga.me/t").unwrap();
        let err = discoverer(FakeTransport::new())
            .discover(&root)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
    }
}
