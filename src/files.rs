use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::{debug, warn};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

use crate::event_source::UiEvent;

// The image check is a pattern match anywhere in the MIME string, not an
// exact prefix comparison.
static IMAGE_MIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("image.*").expect("Failed to compile image MIME regex"));

/// Where a selected file's bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Disk(PathBuf),
    Memory(Vec<u8>),
}

/// One entry of the file list attached to the upload input, whether it
/// arrived through the picker or through a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    source: FileSource,
}

impl SelectedFile {
    /// A file picked from disk. The MIME type is derived from the
    /// extension the same way the upload form's allow-list does.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime = path
            .extension()
            .and_then(|e| e.to_str())
            .map(mime_for_extension)
            .unwrap_or("application/octet-stream");
        Self {
            name,
            mime: mime.to_string(),
            source: FileSource::Disk(path.to_path_buf()),
        }
    }

    pub fn in_memory(
        name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            source: FileSource::Memory(bytes),
        }
    }

    pub fn is_image(&self) -> bool {
        IMAGE_MIME_RE.is_match(&self.mime)
    }

    pub fn is_pdf(&self) -> bool {
        self.mime == "application/pdf"
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }
}

/// Extension to MIME mapping for the file types the upload form accepts.
pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct FileReadError(pub String);

/// Asynchronous data-URL reader. Implementations deliver the result as a
/// [`UiEvent::FileRead`] whenever the read finishes; nothing cancels a
/// read that is already in flight.
pub trait FileReader {
    fn read_as_data_url(&self, file: &SelectedFile);
}

/// Reads file bytes on a worker thread and reports back through the
/// shared event channel.
pub struct ThreadFileReader {
    events: flume::Sender<UiEvent>,
}

impl ThreadFileReader {
    pub fn new(events: flume::Sender<UiEvent>) -> Self {
        Self { events }
    }
}

impl FileReader for ThreadFileReader {
    fn read_as_data_url(&self, file: &SelectedFile) {
        let file = file.clone();
        let events = self.events.clone();
        std::thread::spawn(move || {
            let result = read_data_url(&file);
            if let Err(e) = &result {
                warn!("Data-URL read of '{}' failed: {}", file.name, e);
            } else {
                debug!("Data-URL read of '{}' completed", file.name);
            }
            let _ = events.send(UiEvent::FileRead {
                file_name: file.name,
                result,
            });
        });
    }
}

/// Encode a file's bytes as a `data:MIME;base64,...` URL.
pub fn read_data_url(file: &SelectedFile) -> Result<String, FileReadError> {
    let bytes = match &file.source {
        FileSource::Disk(path) => fs::read(path)
            .map_err(|e| FileReadError(format!("{}: {}", path.display(), e)))?,
        FileSource::Memory(bytes) => bytes.clone(),
    };
    Ok(format!("data:{};base64,{}", file.mime, BASE64.encode(&bytes)))
}
