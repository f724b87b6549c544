//! Title, chapter and page data model.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use url::Url;

use crate::error::{Error, Result};
use crate::fs::{chapter_folder_name, page_file_name};

/// A title discovered from its root page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    pub root_url: Url,
    /// Filesystem-safe name, used directly as the title folder.
    pub name: String,
    /// Chapter URLs in reading order.
    pub chapters: Vec<Url>,
}

impl Title {
    /// Pair every chapter URL with its folder name, rejecting collisions.
    pub fn chapter_folders(&self) -> Result<Vec<(Url, String)>> {
        let mut seen = HashSet::new();
        let mut folders = Vec::with_capacity(self.chapters.len());

        for url in &self.chapters {
            let folder = chapter_folder_name(url)?;
            if !seen.insert(folder.clone()) {
                return Err(Error::DuplicateChapter(folder));
            }
            folders.push((url.clone(), folder));
        }

        Ok(folders)
    }
}

/// Alternate hosts serving a chapter's page images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorSet {
    hosts: Vec<Url>,
}

impl MirrorSet {
    /// Build a mirror set; at least one host is required.
    pub fn new(hosts: Vec<Url>) -> Result<Self> {
        if hosts.is_empty() {
            return Err(Error::Decode("mirror list is empty".into()));
        }
        if let Some(bad) = hosts.iter().find(|h| h.host_str().is_none()) {
            return Err(Error::Decode(format!("mirror '{}' has no host", bad)));
        }
        Ok(Self { hosts })
    }

    pub fn hosts(&self) -> &[Url] {
        &self.hosts
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Whether any mirror differs from the given host.
    pub fn has_alternative_to(&self, host: Option<&str>) -> bool {
        self.hosts.iter().any(|h| h.host_str() != host)
    }
}

/// Page list and mirrors decoded from a chapter page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub pages: Vec<Url>,
    pub mirrors: MirrorSet,
}

/// A single page image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub index: usize,
    pub primary_url: Url,
    /// Local file name inside the chapter folder.
    pub file_name: String,
}

impl Page {
    pub fn new(index: usize, primary_url: Url) -> Result<Self> {
        let file_name = page_file_name(&primary_url, index)?;
        Ok(Self {
            index,
            primary_url,
            file_name,
        })
    }

    /// Destination of this page inside a chapter folder.
    pub fn destination(&self, chapter_dir: &Path) -> PathBuf {
        chapter_dir.join(&self.file_name)
    }
}

/// A chapter with its decoded pages.
#[derive(Debug, Clone)]
pub struct Chapter {
    pub url: Url,
    pub folder_name: String,
    pub pages: Vec<Page>,
    pub mirrors: Arc<MirrorSet>,
}

impl Chapter {
    /// Build a chapter from its manifest; page file names must not collide.
    pub fn from_manifest(url: Url, folder_name: String, manifest: Manifest) -> Result<Self> {
        if manifest.pages.is_empty() {
            return Err(Error::Decode(format!("chapter {} has no pages", url)));
        }

        let mut seen = HashSet::new();
        let mut pages = Vec::with_capacity(manifest.pages.len());
        for (index, page_url) in manifest.pages.into_iter().enumerate() {
            let page = Page::new(index, page_url)?;
            if !seen.insert(page.file_name.clone()) {
                return Err(Error::Decode(format!(
                    "chapter {} lists page file '{}' twice",
                    url, page.file_name
                )));
            }
            pages.push(page);
        }

        Ok(Self {
            url,
            folder_name,
            pages,
            mirrors: Arc::new(manifest.mirrors),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_mirror_set_requires_hosts() {
        assert!(matches!(MirrorSet::new(vec![]), Err(Error::Decode(_))));

        let mirrors = MirrorSet::new(vec![url("https://h1.example.org/")]).unwrap();
        assert_eq!(mirrors.len(), 1);
        assert!(!mirrors.has_alternative_to(Some("h1.example.org")));
        assert!(mirrors.has_alternative_to(Some("h2.example.org")));
    }

    #[test]
    fn test_duplicate_chapter_folders_rejected() {
        let title = Title {
            root_url: url("https://readmanga.me/title"),
            name: "Title".into(),
            chapters: vec![
                url("https://readmanga.me/title/vol1/1"),
                url("https://readmanga.me/title/vol2/1"),
            ],
        };
        assert!(matches!(
            title.chapter_folders(),
            Err(Error::DuplicateChapter(name)) if name == "1"
        ));
    }

    #[test]
    fn test_chapter_from_manifest() {
        let manifest = Manifest {
            pages: vec![
                url("https://h1.example.org/auto/01.jpg"),
                url("https://h1.example.org/auto/02.jpg"),
            ],
            mirrors: MirrorSet::new(vec![url("https://h2.example.org/")]).unwrap(),
        };
        let chapter = Chapter::from_manifest(
            url("https://readmanga.me/title/vol1-ch1"),
            "vol1-ch1".into(),
            manifest,
        )
        .unwrap();

        assert_eq!(chapter.pages.len(), 2);
        assert_eq!(chapter.pages[1].index, 1);
        assert_eq!(
            chapter.pages[1].destination(Path::new("/dl/Title/vol1-ch1")),
            PathBuf::from("/dl/Title/vol1-ch1/02.jpg")
        );
    }

    #[test]
    fn test_chapter_rejects_colliding_page_names() {
        let manifest = Manifest {
            pages: vec![
                url("https://h1.example.org/a/01.jpg"),
                url("https://h1.example.org/b/01.jpg"),
            ],
            mirrors: MirrorSet::new(vec![url("https://h2.example.org/")]).unwrap(),
        };
        let result =
            Chapter::from_manifest(url("https://readmanga.me/t/c1"), "c1".into(), manifest);
        assert!(matches!(result, Err(Error::Decode(_))));
    }
}
