//! Uploaded artifacts: the inputs of the dispatcher.

use std::borrow::Cow;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use crate::error::IngestionResult;

/// A file-like input handed to the [`super::Dispatcher`].
#[derive(Clone, PartialEq, Eq)]
pub enum Artifact {
    /// A named byte stream, e.g. a browser upload.
    Upload {
        /// Client-supplied file name (`sales.csv`).
        name: String,
        /// File contents.
        bytes: Vec<u8>,
    },
    /// A file on disk identified by its path string.
    Path(PathBuf),
}

impl Artifact {
    /// Create an upload artifact from a file name and its contents.
    pub fn upload(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Artifact::Upload {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Create a path artifact.
    pub fn path(path: impl AsRef<Path>) -> Self {
        Artifact::Path(path.as_ref().to_path_buf())
    }

    /// The name the format is detected from.
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            Artifact::Upload { name, .. } => Cow::Borrowed(name.as_str()),
            Artifact::Path(path) => path.to_string_lossy(),
        }
    }

    /// Lower-cased text after the last `.` of the file name; empty when there is none.
    ///
    /// A leading dot alone (`.env`) does not start an extension.
    pub fn extension(&self) -> String {
        let name = self.name();
        Path::new(name.as_ref())
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }

    /// Final path component of the name, extension included.
    pub fn base_name(&self) -> String {
        let name = self.name();
        Path::new(name.as_ref())
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string())
    }

    /// The artifact's contents. Reads the file for [`Artifact::Path`].
    pub fn read_bytes(&self) -> IngestionResult<Cow<'_, [u8]>> {
        match self {
            Artifact::Upload { bytes, .. } => Ok(Cow::Borrowed(bytes.as_slice())),
            Artifact::Path(path) => Ok(Cow::Owned(std::fs::read(path)?)),
        }
    }

    /// Identity used for memoizing loads: the name plus a hash of upload contents.
    ///
    /// Path artifacts are identified by their path alone.
    pub fn fingerprint(&self) -> String {
        match self {
            Artifact::Upload { name, bytes } => {
                let mut hasher = DefaultHasher::new();
                bytes.hash(&mut hasher);
                format!("upload:{name}:{}:{:016x}", bytes.len(), hasher.finish())
            }
            Artifact::Path(path) => format!("path:{}", path.display()),
        }
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::Upload { name, bytes } => f
                .debug_struct("Upload")
                .field("name", name)
                .field("bytes_len", &bytes.len())
                .finish(),
            Artifact::Path(path) => f.debug_tuple("Path").field(path).finish(),
        }
    }
}

impl From<&str> for Artifact {
    fn from(path: &str) -> Self {
        Artifact::path(path)
    }
}

impl From<PathBuf> for Artifact {
    fn from(path: PathBuf) -> Self {
        Artifact::Path(path)
    }
}
