//! Loads documents from a directory of local files.
//!
//! Plain text and markdown are read as UTF-8; PDFs go through the
//! pdf-extract crate. Unsupported extensions are skipped with a warning,
//! while a supported file that cannot be read aborts the walk.

use std::path::Path;

use walkdir::WalkDir;

use crate::domain::{Document, DomainError, SourceRef};

const TEXT_EXTENSIONS: &[&str] = &["txt", "md"];

/// Walks `dir` in file-name order and loads every supported file.
pub fn load_directory(dir: &Path) -> Result<Vec<Document>, DomainError> {
    if !dir.is_dir() {
        return Err(DomainError::ingestion(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut docs = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| DomainError::ingestion(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        match load_file(entry.path())? {
            Some(doc) => {
                tracing::debug!(path = %entry.path().display(), chars = doc.text.chars().count(), "loaded");
                docs.push(doc);
            }
            None => {
                tracing::warn!(path = %entry.path().display(), "skipping unsupported file type");
            }
        }
    }

    Ok(docs)
}

/// Loads one file, or `None` if its extension is not supported.
pub fn load_file(path: &Path) -> Result<Option<Document>, DomainError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some(e) if TEXT_EXTENSIONS.contains(&e) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                DomainError::ingestion(format!("failed to read {}: {e}", path.display()))
            })?;
            Ok(Some(Document::new(SourceRef::file(path), text)))
        }
        Some("pdf") => {
            let text = pdf_extract::extract_text(path).map_err(|e| {
                DomainError::ingestion(format!(
                    "failed to extract text from {}: {e}",
                    path.display()
                ))
            })?;
            Ok(Some(Document::new(SourceRef::file(path), text)))
        }
        _ => Ok(None),
    }
}
