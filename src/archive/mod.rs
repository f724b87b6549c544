//! Chapter folder archiving.
//!
//! Every immediate subdirectory of a title folder is packed into a sibling
//! `<name>.zip` holding the files directly inside it. A failing folder is
//! recorded and the remaining folders are still processed.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};
use crate::fs::{is_temp_file, temp_path_for};

/// Archive settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// Deflate level, 0-9.
    pub compression_level: i32,
    /// Delete a chapter folder once its archive was written.
    pub remove_folders: bool,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            compression_level: 9,
            remove_folders: false,
        }
    }
}

/// Archives written and folders that failed.
#[derive(Debug, Default)]
pub struct ArchiveReport {
    pub archived: Vec<PathBuf>,
    pub failures: Vec<Error>,
}

impl ArchiveReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Archive every chapter folder inside `title_dir`.
///
/// Must only run once every page task of the title has finished.
pub fn archive_all(title_dir: &Path, options: &ArchiveOptions) -> Result<ArchiveReport> {
    let mut folders = Vec::new();
    for entry in fs::read_dir(title_dir).map_err(|e| archive_error(title_dir, e))? {
        let path = entry.map_err(|e| archive_error(title_dir, e))?.path();
        if path.is_dir() && !is_temp_file(&path) {
            folders.push(path);
        }
    }
    folders.sort();

    let mut report = ArchiveReport::default();
    for folder in folders {
        let archive_path = archive_path_for(&folder);
        match archive_folder(&folder, &archive_path, options.compression_level) {
            Ok(entries) => {
                tracing::info!(
                    "Archived {} ({} files)",
                    archive_path.display(),
                    entries
                );
                if options.remove_folders {
                    if let Err(e) = fs::remove_dir_all(&folder) {
                        tracing::warn!("Could not remove {}: {}", folder.display(), e);
                    }
                }
                report.archived.push(archive_path);
            }
            Err(e) => {
                tracing::error!("Failed to archive {}: {}", folder.display(), e);
                report.failures.push(archive_error(&folder, e));
            }
        }
    }

    Ok(report)
}

/// `<parent>/<folder name>.zip`.
pub fn archive_path_for(folder: &Path) -> PathBuf {
    let name = folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    folder.with_file_name(format!("{}.zip", name))
}

/// Pack the regular files directly inside `folder` into `archive_path`.
///
/// Returns the number of entries written.
pub fn archive_folder(folder: &Path, archive_path: &Path, level: i32) -> Result<usize> {
    let mut files = Vec::new();
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() && !is_temp_file(&path) {
            files.push(path);
        }
    }
    files.sort();

    let temp = temp_path_for(archive_path);
    let written = write_archive(&files, &temp, level).and_then(|count| {
        fs::rename(&temp, archive_path)?;
        Ok(count)
    });

    if written.is_err() {
        let _ = fs::remove_file(&temp);
    }
    written
}

fn write_archive(files: &[PathBuf], dest: &Path, level: i32) -> Result<usize> {
    let mut zip = ZipWriter::new(File::create(dest)?);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(level));

    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        zip.start_file(name, options)?;
        let mut file = File::open(path)?;
        io::copy(&mut file, &mut zip)?;
    }

    zip.finish()?;
    Ok(files.len())
}

fn archive_error(folder: &Path, e: impl std::fmt::Display) -> Error {
    Error::Archive {
        folder: folder.display().to_string(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_archive(path: &Path) -> Vec<(String, Vec<u8>)> {
        let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut entries = Vec::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).unwrap();
            let mut body = Vec::new();
            entry.read_to_end(&mut body).unwrap();
            entries.push((entry.name().to_string(), body));
        }
        entries
    }

    #[test]
    fn test_archive_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let chapter = dir.path().join("vol1-ch1");
        fs::create_dir(&chapter).unwrap();
        fs::write(chapter.join("a.jpg"), b"\xff\xd8 first page").unwrap();
        fs::write(chapter.join("b.jpg"), vec![7u8; 4096]).unwrap();

        let report = archive_all(dir.path(), &ArchiveOptions::default()).unwrap();

        assert!(report.is_success());
        assert_eq!(report.archived, vec![dir.path().join("vol1-ch1.zip")]);
        assert_eq!(
            read_archive(&dir.path().join("vol1-ch1.zip")),
            vec![
                ("a.jpg".to_string(), b"\xff\xd8 first page".to_vec()),
                ("b.jpg".to_string(), vec![7u8; 4096]),
            ]
        );
        assert!(chapter.exists());
    }

    #[test]
    fn test_archive_is_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let chapter = dir.path().join("ch1");
        fs::create_dir_all(chapter.join("nested")).unwrap();
        fs::write(chapter.join("01.jpg"), b"1").unwrap();
        fs::write(chapter.join("02.jpg.part"), b"half").unwrap();
        fs::write(chapter.join("nested/inner.jpg"), b"x").unwrap();

        let count = archive_folder(&chapter, &dir.path().join("ch1.zip"), 9).unwrap();

        assert_eq!(count, 1);
        let names: Vec<String> = read_archive(&dir.path().join("ch1.zip"))
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec!["01.jpg"]);
    }

    #[test]
    fn test_failing_folder_does_not_stop_others() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["ch1", "ch2"] {
            fs::create_dir(dir.path().join(name)).unwrap();
            fs::write(dir.path().join(name).join("01.jpg"), name).unwrap();
        }
        // A directory squatting on the temp archive path makes ch1 fail.
        fs::create_dir(dir.path().join("ch1.zip.part")).unwrap();

        let report = archive_all(dir.path(), &ArchiveOptions::default()).unwrap();

        assert_eq!(report.archived, vec![dir.path().join("ch2.zip")]);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(&report.failures[0], Error::Archive { folder, .. } if folder.ends_with("ch1")));
        assert!(!dir.path().join("ch1.zip").exists());
    }

    #[test]
    fn test_remove_folders_after_archiving() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("ch1")).unwrap();
        fs::write(dir.path().join("ch1/01.jpg"), b"1").unwrap();

        let options = ArchiveOptions {
            remove_folders: true,
            ..ArchiveOptions::default()
        };
        archive_all(dir.path(), &options).unwrap();

        assert!(dir.path().join("ch1.zip").exists());
        assert!(!dir.path().join("ch1").exists());
    }
}
