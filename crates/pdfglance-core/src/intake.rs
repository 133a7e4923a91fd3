use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// The only declared type accepted by intake.
pub const PDF_MIME: &str = "application/pdf";

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where a selected file's bytes come from.
#[derive(Debug, Clone, Serialize)]
pub enum FileSource {
    Path(PathBuf),
    /// In-memory bytes; serialized as their length.
    Memory(#[serde(serialize_with = "serialize_len")] Arc<[u8]>),
}

fn serialize_len<S: Serializer>(bytes: &Arc<[u8]>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(bytes.len() as u64)
}

impl FileSource {
    /// Read the full contents.
    pub async fn read_bytes(&self) -> std::io::Result<Arc<[u8]>> {
        match self {
            FileSource::Path(path) => Ok(Arc::from(tokio::fs::read(path).await?)),
            FileSource::Memory(bytes) => Ok(Arc::clone(bytes)),
        }
    }
}

impl PartialEq for FileSource {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FileSource::Path(a), FileSource::Path(b)) => a == b,
            (FileSource::Memory(a), FileSource::Memory(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A file picked by the user, as the picker reports it.
///
/// `declared_type` is whatever the picker claims the file is; it is not
/// sniffed from content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedFile {
    pub name: String,
    pub declared_type: String,
    pub size: u64,
    pub source: FileSource,
}

impl SelectedFile {
    /// Describe a file on disk, deriving its declared type from the file name.
    /// Unknown extensions yield an empty declared type.
    pub fn from_path(path: &Path) -> Result<Self, IntakeError> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(IntakeError::NotAFile(path.to_path_buf()));
        }

        let declared_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("")
            .to_string();

        Ok(Self {
            name: display_name(path),
            declared_type,
            size: metadata.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// Describe an in-memory file with an explicit declared type.
    pub fn from_bytes(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            size: bytes.len() as u64,
            source: FileSource::Memory(bytes),
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.declared_type == PDF_MIME
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_extension_declares_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.PDF");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let file = SelectedFile::from_path(&path).unwrap();
        assert_eq!(file.name, "paper.PDF");
        assert_eq!(file.declared_type, PDF_MIME);
        assert_eq!(file.size, 8);
        assert!(file.is_pdf());
    }

    #[test]
    fn other_extensions_are_not_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("notes.txt");
        std::fs::write(&txt, b"hello").unwrap();
        let file = SelectedFile::from_path(&txt).unwrap();
        assert_eq!(file.declared_type, "text/plain");
        assert!(!file.is_pdf());

        let bare = dir.path().join("README");
        std::fs::write(&bare, b"hello").unwrap();
        let file = SelectedFile::from_path(&bare).unwrap();
        assert_eq!(file.declared_type, "");
        assert!(!file.is_pdf());
    }

    #[test]
    fn directories_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = SelectedFile::from_path(dir.path()).unwrap_err();
        assert!(matches!(err, IntakeError::NotAFile(_)));
    }

    #[test]
    fn declared_type_must_match_exactly() {
        let file = SelectedFile::from_bytes("a.pdf", "application/pdf; charset=binary", vec![1u8]);
        assert!(!file.is_pdf());
        let file = SelectedFile::from_bytes("a.pdf", "Application/PDF", vec![1u8]);
        assert!(!file.is_pdf());
    }

    #[tokio::test]
    async fn read_bytes_from_both_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, b"abc").unwrap();

        let on_disk = SelectedFile::from_path(&path).unwrap();
        assert_eq!(&*on_disk.source.read_bytes().await.unwrap(), b"abc");

        let in_memory = SelectedFile::from_bytes("doc.pdf", PDF_MIME, b"xyz".to_vec());
        assert_eq!(in_memory.size, 3);
        assert_eq!(&*in_memory.source.read_bytes().await.unwrap(), b"xyz");
    }
}
