//! Collaborator contracts.
//!
//! The wizard talks to three external services: preset storage, the image
//! generation backend and the account service holding the credit balance.
//! Each is an object-safe async trait so the controller can hold them as
//! `Arc<dyn ...>` and tests can substitute in-memory fakes.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::category::Category;
use crate::generation::{GenerationOutput, GenerationRequest};
use crate::preset::{PresetRecord, PresetUpdate, RecommendedPresetDraft, RecommendedPresetRecord};

/// Error returned by any collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The call was abandoned because its cancellation token fired.
    #[error("Request cancelled")]
    Cancelled,

    /// The service answered with a non-success status.
    #[error("Service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The service could not be reached (connect failure, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl ServiceError {
    /// HTTP status, when the service produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[async_trait]
pub trait PresetStore: Send + Sync {
    /// The caller's own presets for `category`, newest first.
    async fn fetch_presets(&self, category: Category) -> Result<Vec<PresetRecord>, ServiceError>;

    /// Persist a new preset and return it with its issued id and timestamps.
    async fn create_preset(&self, record: &PresetRecord) -> Result<PresetRecord, ServiceError>;

    async fn update_preset(
        &self,
        id: &str,
        update: &PresetUpdate,
    ) -> Result<PresetRecord, ServiceError>;

    async fn delete_preset(&self, id: &str) -> Result<(), ServiceError>;

    /// Recommended presets for `category`. Implementations swallow failures
    /// and return an empty list.
    async fn fetch_recommended_presets(&self, category: Category) -> Vec<RecommendedPresetRecord>;

    async fn create_recommended_preset(
        &self,
        draft: &RecommendedPresetDraft,
    ) -> Result<RecommendedPresetRecord, ServiceError>;
}

#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Run one generation. Must return [`ServiceError::Cancelled`] promptly
    /// once `cancel` fires.
    async fn generate(
        &self,
        request: &GenerationRequest,
        cancel: CancellationToken,
    ) -> Result<GenerationOutput, ServiceError>;
}

#[async_trait]
pub trait AccountService: Send + Sync {
    async fn fetch_credit_balance(&self) -> Result<i64, ServiceError>;
}
