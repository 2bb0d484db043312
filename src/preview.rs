//! Revocable preview handles for uploaded files
//!
//! A preview maps a short-lived `preview:<uuid>` reference to the file it
//! displays. Each [`PreviewHandle`] owns exactly one registry entry and
//! releases it when dropped, so removing, replacing or clearing an upload
//! never leaks an entry and never releases one twice.

use crate::models::ImageFile;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

const PREVIEW_SCHEME: &str = "preview:";

#[derive(Clone, Default)]
pub struct PreviewRegistry {
    entries: Arc<Mutex<HashMap<Uuid, ImageFile>>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<Uuid, ImageFile>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a preview for `file`. Released when the handle drops.
    pub fn create(&self, file: &ImageFile) -> PreviewHandle {
        let id = Uuid::new_v4();
        self.entries().insert(id, file.clone());
        tracing::debug!("Created preview {} for {}", id, file.name);

        PreviewHandle {
            id,
            registry: self.clone(),
        }
    }

    /// Look up the file behind a live preview reference.
    pub fn resolve(&self, url: &str) -> Option<ImageFile> {
        let id = url.strip_prefix(PREVIEW_SCHEME)?.parse::<Uuid>().ok()?;
        self.entries().get(&id).cloned()
    }

    /// Number of previews currently held.
    pub fn live_count(&self) -> usize {
        self.entries().len()
    }

    fn revoke(&self, id: &Uuid) {
        if self.entries().remove(id).is_some() {
            tracing::debug!("Revoked preview {}", id);
        }
    }
}

/// Unique owner of one preview entry.
pub struct PreviewHandle {
    id: Uuid,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn url(&self) -> String {
        format!("{}{}", PREVIEW_SCHEME, self.id)
    }
}

impl std::fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PreviewHandle").field(&self.url()).finish()
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.revoke(&self.id);
    }
}
