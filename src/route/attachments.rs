//! Attachment bookkeeping and per-request staging.
//!
//! A route only records *where* its files live. Every execution stages them
//! again: ASCII names are uploaded straight from their source path, while
//! names with non-ASCII characters get an ASCII replacement and a copy of the
//! file inside a `TempDir` owned by [`StagedUploads`]. Dropping the staged set
//! removes the copies, whichever way the request ended.

use crate::error::{GotenbergError, Result};
use bytes::Bytes;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

const OCTET_STREAM: &str = "application/octet-stream";

/// A file on disk registered under an upload name.
#[derive(Debug, Clone)]
pub(crate) struct FileAttachment {
    pub source: PathBuf,
}

/// Content supplied directly by the caller.
#[derive(Debug, Clone)]
pub(crate) struct InMemoryFile {
    pub data: Bytes,
    pub mime: Option<String>,
}

/// One disk file ready to be streamed.
#[derive(Debug)]
pub(crate) struct StagedFile {
    pub name: String,
    pub path: PathBuf,
    pub mime: String,
}

/// One in-memory part ready to be sent.
#[derive(Debug)]
pub(crate) struct StagedBytes {
    pub name: String,
    pub data: Bytes,
    pub mime: String,
}

/// Everything one execution uploads. Holds the temp copies alive.
#[derive(Debug)]
pub(crate) struct StagedUploads {
    pub files: Vec<StagedFile>,
    pub memory: Vec<StagedBytes>,
    _temp_dir: Option<TempDir>,
}

impl StagedUploads {
    pub fn len(&self) -> usize {
        self.files.len() + self.memory.len()
    }
}

/// Default upload name for `path`: its final component.
pub(crate) fn default_upload_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// MIME type for an upload, guessed from its name.
pub(crate) fn guess_mime(name: &str) -> String {
    mime_guess::from_path(name)
        .first_raw()
        .unwrap_or(OCTET_STREAM)
        .to_string()
}

/// Replace every non-ASCII character with `_`.
pub(crate) fn ascii_safe_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect()
}

/// `candidate`, or `candidate` with `-N` before its extension if taken.
fn unique_name(candidate: String, used: &mut HashSet<String>) -> String {
    if used.insert(candidate.clone()) {
        return candidate;
    }
    let (stem, ext) = match candidate.rfind('.') {
        Some(dot) if dot > 0 => candidate.split_at(dot),
        _ => (candidate.as_str(), ""),
    };
    let mut n = 1u32;
    loop {
        let next = format!("{stem}-{n}{ext}");
        if used.insert(next.clone()) {
            return next;
        }
        n += 1;
    }
}

/// File name of the `index`-th temp copy, keeping the upload's extension.
fn copy_file_name(index: usize, upload: &str) -> String {
    match Path::new(upload).extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("upload-{index}.{ext}"),
        None => format!("upload-{index}"),
    }
}

/// Resolve the names and temp copies for one execution.
pub(crate) async fn stage(
    files: &BTreeMap<String, FileAttachment>,
    memory: &BTreeMap<String, InMemoryFile>,
) -> Result<StagedUploads> {
    let mut used: HashSet<String> = files
        .keys()
        .chain(memory.keys())
        .filter(|n| n.is_ascii())
        .cloned()
        .collect();

    let (plain, foreign): (Vec<_>, Vec<_>) = files.iter().partition(|(name, _)| name.is_ascii());

    let mut staged_files: Vec<StagedFile> = plain
        .into_iter()
        .map(|(name, attachment)| StagedFile {
            name: name.clone(),
            path: attachment.source.clone(),
            mime: guess_mime(name),
        })
        .collect();

    let temp_dir = if foreign.is_empty() {
        None
    } else {
        let dir = TempDir::new().map_err(|e| {
            GotenbergError::Internal(format!("tempdir for attachment copies: {e}"))
        })?;
        for (index, (name, attachment)) in foreign.into_iter().enumerate() {
            let safe = unique_name(ascii_safe_name(name), &mut used);
            warn!("Upload name '{}' is not ASCII, sending a copy as '{}'", name, safe);

            tokio::fs::metadata(&attachment.source)
                .await
                .map_err(|e| GotenbergError::AttachmentIo {
                    path: attachment.source.clone(),
                    source: e,
                })?;

            // Upload names may contain separators; the copy itself stays flat.
            let copy = dir.path().join(copy_file_name(index, &safe));
            tokio::fs::copy(&attachment.source, &copy)
                .await
                .map_err(|e| GotenbergError::AttachmentIo {
                    path: copy.clone(),
                    source: e,
                })?;
            debug!("Copied {} -> {}", attachment.source.display(), copy.display());

            staged_files.push(StagedFile {
                mime: guess_mime(&safe),
                name: safe,
                path: copy,
            });
        }
        Some(dir)
    };

    let mut staged_memory = Vec::with_capacity(memory.len());
    for (name, file) in memory {
        let upload = if name.is_ascii() {
            name.clone()
        } else {
            let safe = unique_name(ascii_safe_name(name), &mut used);
            warn!("Upload name '{}' is not ASCII, sending it as '{}'", name, safe);
            safe
        };
        staged_memory.push(StagedBytes {
            mime: file.mime.clone().unwrap_or_else(|| guess_mime(&upload)),
            name: upload,
            data: file.data.clone(),
        });
    }

    Ok(StagedUploads {
        files: staged_files,
        memory: staged_memory,
        _temp_dir: temp_dir,
    })
}
