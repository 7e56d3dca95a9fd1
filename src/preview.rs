// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Locally-scoped preview resources for selected images

use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::Result;

/// Identifier of one allocated preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewId(Uuid);

impl PreviewId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PreviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "preview:{}", self.0)
    }
}

/// Backend that owns preview resources
pub trait PreviewStore: Send + Sync {
    /// Allocate a preview bound to the given image bytes
    fn allocate(&self, name: &str, media_type: &str, bytes: Arc<[u8]>) -> PreviewId;

    /// Release a preview. Called exactly once per allocation.
    fn release(&self, id: PreviewId);
}

/// Owner of a single preview allocation; releases it on drop
pub struct PreviewHandle {
    id: PreviewId,
    store: Arc<dyn PreviewStore>,
}

impl PreviewHandle {
    pub fn allocate(
        store: Arc<dyn PreviewStore>,
        name: &str,
        media_type: &str,
        bytes: Arc<[u8]>,
    ) -> Self {
        let id = store.allocate(name, media_type, bytes);
        debug!(%id, name, "preview allocated");
        Self { id, store }
    }

    pub fn id(&self) -> PreviewId {
        self.id
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.store.release(self.id);
        debug!(id = %self.id, "preview released");
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle").field("id", &self.id).finish()
    }
}

struct Preview {
    name: String,
    media_type: String,
    bytes: Arc<[u8]>,
}

#[derive(Default)]
struct StoreState {
    previews: HashMap<PreviewId, Preview>,
    allocated: u64,
    released: u64,
}

/// Process-local preview store keeping image bytes in memory
#[derive(Default)]
pub struct InMemoryPreviewStore {
    state: Mutex<StoreState>,
}

impl InMemoryPreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of previews currently alive
    pub fn live(&self) -> usize {
        self.lock().previews.len()
    }

    /// Total allocations over the store's lifetime
    pub fn allocated(&self) -> u64 {
        self.lock().allocated
    }

    /// Total releases over the store's lifetime
    pub fn released(&self) -> u64 {
        self.lock().released
    }

    pub fn contains(&self, id: PreviewId) -> bool {
        self.lock().previews.contains_key(&id)
    }

    pub fn bytes(&self, id: PreviewId) -> Option<Arc<[u8]>> {
        self.lock().previews.get(&id).map(|p| Arc::clone(&p.bytes))
    }

    pub fn describe(&self, id: PreviewId) -> Option<(String, String)> {
        self.lock()
            .previews
            .get(&id)
            .map(|p| (p.name.clone(), p.media_type.clone()))
    }

    /// Pixel dimensions of a preview, read from the image header only
    pub fn dimensions(&self, id: PreviewId) -> Option<Result<(u32, u32)>> {
        let bytes = self.bytes(id)?;
        Some(read_dimensions(&bytes))
    }
}

fn read_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    let reader = image::ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}

impl PreviewStore for InMemoryPreviewStore {
    fn allocate(&self, name: &str, media_type: &str, bytes: Arc<[u8]>) -> PreviewId {
        let id = PreviewId::new();
        let mut state = self.lock();
        state.previews.insert(
            id,
            Preview {
                name: name.to_string(),
                media_type: media_type.to_string(),
                bytes,
            },
        );
        state.allocated += 1;
        id
    }

    fn release(&self, id: PreviewId) {
        let mut state = self.lock();
        if state.previews.remove(&id).is_some() {
            state.released += 1;
        } else {
            warn!(%id, "release of unknown preview");
        }
    }
}
