//! Local preset cache.
//!
//! [`PresetCache`] keeps the last known preset listings per category so the
//! wizard can still offer presets when the store is unreachable. Persistence
//! goes through an injected [`CacheBackend`]: the cache loads once when it is
//! opened and saves after every change.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use atelier_core::category::Category;
use atelier_core::preset::{PresetRecord, RecommendedPresetRecord};

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Everything the cache persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedPresets {
    #[serde(default)]
    pub own: HashMap<Category, Vec<PresetRecord>>,
    #[serde(default)]
    pub recommended: HashMap<Category, Vec<RecommendedPresetRecord>>,
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache file is corrupt: {0}")]
    Format(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Previously saved snapshot, or `None` when nothing was saved yet.
    async fn load(&self) -> Result<Option<CachedPresets>, CacheError>;

    async fn save(&self, snapshot: &CachedPresets) -> Result<(), CacheError>;
}

/// Stores the snapshot as pretty-printed JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CacheBackend for JsonFileBackend {
    async fn load(&self) -> Result<Option<CachedPresets>, CacheError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, snapshot: &CachedPresets) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        // Atomic replace.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// Keeps the snapshot in memory only.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slot: Mutex<Option<CachedPresets>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn load(&self) -> Result<Option<CachedPresets>, CacheError> {
        Ok(self.slot.lock().await.clone())
    }

    async fn save(&self, snapshot: &CachedPresets) -> Result<(), CacheError> {
        *self.slot.lock().await = Some(snapshot.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PresetCache
// ---------------------------------------------------------------------------

pub struct PresetCache {
    backend: Arc<dyn CacheBackend>,
    state: RwLock<CachedPresets>,
}

impl PresetCache {
    /// Open the cache, loading whatever the backend holds.
    ///
    /// A backend that fails to load (unreadable or corrupt file) yields an
    /// empty cache; the next save overwrites it.
    pub async fn open(backend: Arc<dyn CacheBackend>) -> Self {
        let state = match backend.load().await {
            Ok(Some(snapshot)) => {
                tracing::debug!(
                    categories = snapshot.own.len(),
                    "Preset cache loaded"
                );
                snapshot
            }
            Ok(None) => CachedPresets::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Preset cache unreadable, starting empty");
                CachedPresets::default()
            }
        };
        Self {
            backend,
            state: RwLock::new(state),
        }
    }

    /// Cached own presets for `category`, if any listing was ever stored.
    pub async fn own(&self, category: Category) -> Option<Vec<PresetRecord>> {
        self.state.read().await.own.get(&category).cloned()
    }

    pub async fn recommended(&self, category: Category) -> Option<Vec<RecommendedPresetRecord>> {
        self.state.read().await.recommended.get(&category).cloned()
    }

    pub async fn replace_own(
        &self,
        category: Category,
        presets: Vec<PresetRecord>,
    ) -> Result<(), CacheError> {
        let mut state = self.state.write().await;
        state.own.insert(category, presets);
        self.backend.save(&state).await
    }

    pub async fn replace_recommended(
        &self,
        category: Category,
        presets: Vec<RecommendedPresetRecord>,
    ) -> Result<(), CacheError> {
        let mut state = self.state.write().await;
        state.recommended.insert(category, presets);
        self.backend.save(&state).await
    }

    /// Insert or replace (matched by id) one own preset, newest first.
    pub async fn upsert_own(&self, preset: PresetRecord) -> Result<(), CacheError> {
        let mut state = self.state.write().await;
        let list = state.own.entry(preset.category).or_default();
        match list
            .iter_mut()
            .find(|p| p.id.is_some() && p.id == preset.id)
        {
            Some(existing) => *existing = preset,
            None => list.insert(0, preset),
        }
        self.backend.save(&state).await
    }

    /// Drop an own preset by id from every category. Returns whether one was
    /// removed.
    pub async fn remove_own(&self, id: &str) -> Result<bool, CacheError> {
        let mut state = self.state.write().await;
        let mut removed = false;
        for list in state.own.values_mut() {
            let before = list.len();
            list.retain(|p| p.id.as_deref() != Some(id));
            removed |= list.len() != before;
        }
        if removed {
            self.backend.save(&state).await?;
        }
        Ok(removed)
    }
}
