use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("refusing to save under name {0:?}")]
    InvalidName(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("save task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Where decrypted plaintext ends up
///
/// Called at most once per download, and only with fully decrypted bytes.
#[async_trait::async_trait]
pub trait SaveSink: Send + Sync {
    async fn save(&self, name: &str, data: Vec<u8>) -> Result<PathBuf, SaveError>;
}

/// Reject names that would land outside the target directory
///
/// Display names come from the server's listing, so they are treated as
/// untrusted: no separators, no `.`/`..`, no NULs.
pub fn sanitize_file_name(name: &str) -> Result<&str, SaveError> {
    let trimmed = name.trim();
    let bad = trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\\', '\0']);
    if bad {
        return Err(SaveError::InvalidName(name.to_string()));
    }
    Ok(trimmed)
}

/// Saves files into one directory, atomically and without clobbering
///
/// Data is written to a temporary file next to the destination and renamed
/// into place, so a failed save never leaves a partial file behind. An
/// existing `report.pdf` makes the next save land as `report (1).pdf`.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

const MAX_RENAME_ATTEMPTS: usize = 1000;

fn candidate(name: &str, attempt: usize) -> String {
    if attempt == 0 {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{} ({}).{}", stem, attempt, ext),
        _ => format!("{} ({})", name, attempt),
    }
}

fn save_blocking(dir: &Path, name: &str, data: &[u8]) -> Result<PathBuf, SaveError> {
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;

    for attempt in 0..MAX_RENAME_ATTEMPTS {
        let target = dir.join(candidate(name, attempt));
        match tmp.persist_noclobber(&target) {
            Ok(_) => return Ok(target),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => tmp = e.file,
            Err(e) => return Err(e.error.into()),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free file name for {:?} in {}", name, dir.display()),
    )
    .into())
}

#[async_trait::async_trait]
impl SaveSink for DirectorySink {
    async fn save(&self, name: &str, data: Vec<u8>) -> Result<PathBuf, SaveError> {
        let name = sanitize_file_name(name)?.to_string();
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || save_blocking(&dir, &name, &data)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("report.pdf").unwrap(), "report.pdf");
        assert_eq!(sanitize_file_name(" spaced.txt ").unwrap(), "spaced.txt");
        for bad in ["", " ", ".", "..", "../etc/passwd", "a/b", "a\\b", "nul\0"] {
            assert!(sanitize_file_name(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_candidate_names() {
        assert_eq!(candidate("report.pdf", 0), "report.pdf");
        assert_eq!(candidate("report.pdf", 2), "report (2).pdf");
        assert_eq!(candidate("README", 1), "README (1)");
        assert_eq!(candidate(".bashrc", 1), ".bashrc (1)");
    }

    #[tokio::test]
    async fn test_save_does_not_clobber() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());

        let first = sink.save("a.txt", b"one".to_vec()).await.unwrap();
        let second = sink.save("a.txt", b"two".to_vec()).await.unwrap();

        assert_eq!(first, dir.path().join("a.txt"));
        assert_eq!(second, dir.path().join("a (1).txt"));
        assert_eq!(std::fs::read(&first).unwrap(), b"one");
        assert_eq!(std::fs::read(&second).unwrap(), b"two");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn test_save_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("downloads/today");
        let sink = DirectorySink::new(&nested);

        let path = sink.save("x.bin", vec![1, 2, 3]).await.unwrap();
        assert_eq!(path, nested.join("x.bin"));
    }

    #[tokio::test]
    async fn test_save_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());

        let err = sink.save("../escape.txt", vec![0]).await.unwrap_err();
        assert!(matches!(err, SaveError::InvalidName(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
