//! Input loading: turn a user-picked path or in-memory buffer into a
//! [`SelectedFile`].
//!
//! [`SelectedFile::from_path`] plays the role of the file picker. Like a
//! picker restricted to `application/pdf`, it refuses anything that does not
//! start with the `%PDF` magic bytes, so the user gets a meaningful error
//! before a multi-minute upload is attempted.

use crate::error::ClientError;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// MIME type sent for the `file` multipart field.
pub const PDF_MIME: &str = "application/pdf";

const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// The PDF chosen by the user, held in memory until replaced.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    mime: String,
    bytes: Vec<u8>,
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl SelectedFile {
    /// Build a selection from bytes already in memory. No validation.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mime: PDF_MIME.to_string(),
            bytes: bytes.into(),
        }
    }

    /// Read a local PDF, validating existence, permissions and magic bytes.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ClientError::FileNotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => ClientError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => ClientError::FileRead {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        check_magic(path, &bytes)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.pdf".to_string());

        debug!("Loaded PDF {} ({} bytes)", path.display(), bytes.len());
        Ok(Self::from_bytes(name, bytes))
    }

    /// File name reported in the multipart `file` part.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn check_magic(path: &Path, bytes: &[u8]) -> Result<(), ClientError> {
    if bytes.len() >= 4 && &bytes[..4] != PDF_MAGIC {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(ClientError::NotAPdf {
            path: PathBuf::from(path),
            magic,
        });
    }
    Ok(())
}
