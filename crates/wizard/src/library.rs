//! Preset library: the store-facing side of preset management.
//!
//! Fetches a category's own and recommended presets concurrently and joins
//! them before handing them to the controller. A failed own-preset fetch
//! falls back to the cached listing (or an empty one) and reports the error
//! alongside, so the caller can still react to an expired session.

use std::sync::Arc;

use atelier_core::category::Category;
use atelier_core::config_store::ConfigurationRecord;
use atelier_core::preset::{
    self, PresetRecord, PresetUpdate, RecommendedPresetDraft, RecommendedPresetRecord,
};
use atelier_core::selection::WizardSelection;
use atelier_core::services::{PresetStore, ServiceError};

use crate::cache::PresetCache;
use crate::error::{classify, WizardError};

/// Presets offered for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetListing {
    pub category: Category,
    pub own: Vec<PresetRecord>,
    /// Active recommended presets in display order.
    pub recommended: Vec<RecommendedPresetRecord>,
    /// Why the own listing is a fallback, when it is.
    pub own_error: Option<ServiceError>,
}

impl PresetListing {
    pub fn empty(category: Category) -> Self {
        Self {
            category,
            own: Vec::new(),
            recommended: Vec::new(),
            own_error: None,
        }
    }

    pub fn find_own(&self, id: &str) -> Option<&PresetRecord> {
        self.own.iter().find(|p| p.id.as_deref() == Some(id))
    }
}

/// Metadata for publishing a preset as recommended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOptions {
    pub name: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
}

pub struct PresetLibrary {
    store: Arc<dyn PresetStore>,
    cache: Option<Arc<PresetCache>>,
}

impl PresetLibrary {
    pub fn new(store: Arc<dyn PresetStore>) -> Self {
        Self { store, cache: None }
    }

    pub fn with_cache(store: Arc<dyn PresetStore>, cache: Arc<PresetCache>) -> Self {
        Self {
            store,
            cache: Some(cache),
        }
    }

    /// Fetch own and recommended presets for `category` concurrently.
    pub async fn refresh(&self, category: Category) -> PresetListing {
        let (own, recommended) = tokio::join!(
            self.store.fetch_presets(category),
            self.store.fetch_recommended_presets(category),
        );

        let mut recommended = preset::order_recommended(recommended);

        let (own, own_error) = match own {
            Ok(presets) => {
                if let Some(cache) = &self.cache {
                    if let Err(e) = cache.replace_own(category, presets.clone()).await {
                        tracing::warn!(%category, error = %e, "Failed to cache presets");
                    }
                }
                (presets, None)
            }
            Err(e) => {
                tracing::warn!(%category, error = %e, "Failed to fetch presets, using cached list");
                let cached = match &self.cache {
                    Some(cache) => cache.own(category).await.unwrap_or_default(),
                    None => Vec::new(),
                };
                (cached, Some(e))
            }
        };

        // An empty list is also what a failed fetch looks like; keep the
        // cached one instead of overwriting it.
        if let Some(cache) = &self.cache {
            if recommended.is_empty() {
                recommended = cache.recommended(category).await.unwrap_or_default();
            } else if let Err(e) = cache
                .replace_recommended(category, recommended.clone())
                .await
            {
                tracing::warn!(%category, error = %e, "Failed to cache recommended presets");
            }
        }

        tracing::debug!(
            %category,
            own = own.len(),
            recommended = recommended.len(),
            "Preset listing refreshed"
        );

        PresetListing {
            category,
            own,
            recommended,
            own_error,
        }
    }

    /// Validate, serialize and store a new preset.
    pub async fn save(
        &self,
        name: &str,
        selection: &WizardSelection,
        record: &ConfigurationRecord,
    ) -> Result<PresetRecord, LibraryError> {
        preset::validate_preset_name(name).map_err(WizardError::from)?;
        let draft = preset::serialize(name, selection, record);
        let created = self.store.create_preset(&draft).await?;
        self.cache_upsert(created.clone()).await;
        Ok(created)
    }

    pub async fn rename(&self, id: &str, name: &str) -> Result<PresetRecord, LibraryError> {
        preset::validate_preset_name(name).map_err(WizardError::from)?;
        let update = PresetUpdate {
            name: Some(name.trim().to_string()),
        };
        let updated = self.store.update_preset(id, &update).await?;
        self.cache_upsert(updated.clone()).await;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), LibraryError> {
        self.store.delete_preset(id).await?;
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.remove_own(id).await {
                tracing::warn!(preset_id = id, error = %e, "Failed to update preset cache");
            }
        }
        Ok(())
    }

    /// Publish the current state as a recommended preset for its category.
    pub async fn publish(
        &self,
        options: &PublishOptions,
        selection: &WizardSelection,
        record: &ConfigurationRecord,
    ) -> Result<RecommendedPresetRecord, LibraryError> {
        preset::validate_preset_name(&options.name).map_err(WizardError::from)?;
        if let Some(description) = &options.description {
            preset::validate_description(description).map_err(WizardError::from)?;
        }
        let preset_data = preset::serialize(&options.name, selection, record);
        let draft = RecommendedPresetDraft {
            name: preset_data.name.clone(),
            description: options.description.clone(),
            category: preset_data.category,
            subcategory: preset_data.sub_category.clone(),
            is_active: options.is_active,
            display_order: options.display_order,
            preset_data,
        };
        let published = self.store.create_recommended_preset(&draft).await?;
        tracing::info!(
            preset_id = %published.id,
            category = %published.category,
            "Recommended preset published"
        );
        Ok(published)
    }

    async fn cache_upsert(&self, preset: PresetRecord) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.upsert_own(preset).await {
                tracing::warn!(error = %e, "Failed to update preset cache");
            }
        }
    }
}

/// A library failure: either rejected locally or by the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LibraryError {
    #[error(transparent)]
    Invalid(#[from] WizardError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl LibraryError {
    /// The wizard-level view of this failure.
    pub fn classify(&self) -> WizardError {
        match self {
            Self::Invalid(e) => e.clone(),
            Self::Service(e) => classify(e),
        }
    }
}
