//! Loading plain-text and markdown documents from a directory.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::document::Document;
use crate::error::{RagError, Result};

/// File extensions picked up by [`DocumentLoader`].
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md"];

/// Reads every `.txt` and `.md` file directly inside a directory.
///
/// Subdirectories are not descended into. Files are returned sorted by file
/// name, and each document carries a `source` metadata entry holding the file
/// name. A file that cannot be read as UTF-8 text is logged and skipped.
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    directory: PathBuf,
}

impl DocumentLoader {
    /// Create a loader for `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    /// The directory this loader reads from.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Load all supported documents.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::LoaderError`] if the directory itself cannot be
    /// listed. Individual unreadable files do not fail the call.
    pub fn load(&self) -> Result<Vec<Document>> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.directory).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                let source = e.into_io_error().unwrap_or_else(|| {
                    std::io::Error::other("directory walk failed")
                });
                RagError::LoaderError { path: self.directory.clone(), source }
            })?;
            if entry.file_type().is_file() && is_supported(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    let source = path
                        .file_name()
                        .map(|name| name.to_string_lossy().to_string())
                        .unwrap_or_default();
                    debug!(file = %source, chars = text.chars().count(), "loaded document");
                    documents.push(Document::new(text).with_metadata("source", source));
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping unreadable document");
                }
            }
        }

        info!(
            directory = %self.directory.display(),
            documents = documents.len(),
            "documents loaded"
        );
        Ok(documents)
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext)))
}

/// Load all supported documents from `directory`.
///
/// Shorthand for `DocumentLoader::new(directory).load()`.
pub fn load_documents(directory: impl AsRef<Path>) -> Result<Vec<Document>> {
    DocumentLoader::new(directory.as_ref()).load()
}
