// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! File intake: validation of candidate files and preview ownership

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::preview::{PreviewHandle, PreviewId, PreviewStore};
use crate::Result;

/// A file offered by the user (picker or drag-and-drop)
#[derive(Debug, Clone)]
pub struct Candidate {
    pub name: String,
    /// Declared media type, e.g. `image/png`
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl Candidate {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, declaring its media type from the extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Ok(Self::new(name, media_type_for_path(path), bytes))
    }

    pub fn is_image(&self) -> bool {
        is_image_media_type(&self.media_type)
    }
}

/// Media type declared for a path, based on its extension
pub fn media_type_for_path(path: &Path) -> String {
    if let Ok(format) = image::ImageFormat::from_path(path) {
        return format.to_mime_type().to_string();
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("svg") => "image/svg+xml",
        Some("heic") | Some("heif") => "image/heif",
        Some("txt") | Some("md") | Some("log") => "text/plain",
        Some("html") | Some("htm") => "text/html",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("mp4") => "video/mp4",
        Some("mp3") => "audio/mpeg",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// True when the essence of `media_type` is in the `image/` tree
pub fn is_image_media_type(media_type: &str) -> bool {
    let essence = media_type.split(';').next().unwrap_or_default().trim();
    essence.len() > "image/".len()
        && essence
            .get(.."image/".len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

/// Why a candidate was not accepted. Silent: never shown as an error state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("not an image (declared type {media_type:?})")]
    NotAnImage { media_type: String },

    #[error("file is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },
}

/// The currently selected image. Owns its preview; dropping it releases the preview.
#[derive(Debug)]
pub struct SelectedImage {
    name: String,
    media_type: String,
    bytes: Arc<[u8]>,
    digest: String,
    preview: PreviewHandle,
}

impl SelectedImage {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// blake3 hex digest of the image bytes
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn preview_id(&self) -> PreviewId {
        self.preview.id()
    }

    /// Build the payload for one remote call
    pub fn request(&self) -> AnalysisRequest {
        AnalysisRequest {
            file_name: self.name.clone(),
            media_type: self.media_type.clone(),
            bytes: Arc::clone(&self.bytes),
        }
    }
}

/// Payload of a single scoring request
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}

/// Validates candidates and manages the preview of the current selection
pub struct FileIntake {
    previews: Arc<dyn PreviewStore>,
    max_bytes: Option<u64>,
}

impl FileIntake {
    pub fn new(previews: Arc<dyn PreviewStore>) -> Self {
        Self {
            previews,
            max_bytes: None,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: Option<u64>) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Check a candidate without touching any state
    pub fn check(&self, candidate: &Candidate) -> std::result::Result<(), Rejection> {
        if !candidate.is_image() {
            return Err(Rejection::NotAnImage {
                media_type: candidate.media_type.clone(),
            });
        }
        if let Some(limit) = self.max_bytes {
            let size = candidate.bytes.len() as u64;
            if size > limit {
                return Err(Rejection::TooLarge { size, limit });
            }
        }
        Ok(())
    }

    /// Replace the selection in `slot` with `candidate`.
    ///
    /// On rejection `slot` is left exactly as it was. On acceptance the
    /// previous selection's preview is released before the new one is
    /// allocated.
    pub fn select(
        &self,
        slot: &mut Option<SelectedImage>,
        candidate: Candidate,
    ) -> std::result::Result<PreviewId, Rejection> {
        if let Err(rejection) = self.check(&candidate) {
            debug!(name = %candidate.name, %rejection, "candidate rejected");
            return Err(rejection);
        }

        drop(slot.take());

        let Candidate { name, media_type, bytes } = candidate;
        let digest = blake3::hash(&bytes).to_hex().to_string();
        let bytes: Arc<[u8]> = Arc::from(bytes);
        let preview = PreviewHandle::allocate(
            Arc::clone(&self.previews),
            &name,
            &media_type,
            Arc::clone(&bytes),
        );
        let id = preview.id();

        info!(%name, %media_type, size = bytes.len(), digest = &digest[..12], "image selected");
        *slot = Some(SelectedImage {
            name,
            media_type,
            bytes,
            digest,
            preview,
        });
        Ok(id)
    }
}
