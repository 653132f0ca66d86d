//! HTTP implementation of the collaborator contracts against the studio REST
//! API.
//!
//! One [`HttpStudioClient`] serves as preset store, generation backend and
//! account service; share it behind an `Arc` and hand clones of the `Arc` to
//! each consumer.

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use atelier_core::category::Category;
use atelier_core::generation::{GenerationOutput, GenerationRequest};
use atelier_core::preset::{
    PresetRecord, PresetUpdate, RecommendedPresetDraft, RecommendedPresetRecord,
};
use atelier_core::services::{AccountService, GenerationBackend, PresetStore, ServiceError};

use crate::config::ClientConfig;
use crate::error::{error_message, from_reqwest, ClientError};

/// Header carrying the per-attempt id of a generation call.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Body of `GET /credits`.
#[derive(Debug, Deserialize)]
struct CreditBalance {
    balance: i64,
}

/// Client for the studio REST API.
pub struct HttpStudioClient {
    client: reqwest::Client,
    base_url: String,
    auth: Option<HeaderValue>,
}

impl HttpStudioClient {
    /// Build a client with its own connection pool.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Self::with_client(client, config)
    }

    /// Build a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Result<Self, ClientError> {
        let auth = config
            .api_token
            .as_deref()
            .map(|token| {
                let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                    ClientError::Config("STUDIO_API_TOKEN contains invalid characters".into())
                })?;
                value.set_sensitive(true);
                Ok::<_, ClientError>(value)
            })
            .transpose()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            auth,
        })
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Some(value) => request.header(AUTHORIZATION, value.clone()),
            None => request,
        }
    }

    /// Send a request and return the response if its status is a success.
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ServiceError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(response)
    }

    /// Send a request and decode a JSON body.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ServiceError> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl PresetStore for HttpStudioClient {
    async fn fetch_presets(&self, category: Category) -> Result<Vec<PresetRecord>, ServiceError> {
        let request = self
            .client
            .get(self.url("/presets"))
            .query(&[("category", category.as_str())]);
        self.send_json(request).await
    }

    async fn create_preset(&self, record: &PresetRecord) -> Result<PresetRecord, ServiceError> {
        let request = self.client.post(self.url("/presets")).json(record);
        let created: PresetRecord = self.send_json(request).await?;
        tracing::info!(preset_id = ?created.id, name = %created.name, "Preset created");
        Ok(created)
    }

    async fn update_preset(
        &self,
        id: &str,
        update: &PresetUpdate,
    ) -> Result<PresetRecord, ServiceError> {
        let request = self
            .client
            .patch(self.url(&format!("/presets/{id}")))
            .json(update);
        self.send_json(request).await
    }

    async fn delete_preset(&self, id: &str) -> Result<(), ServiceError> {
        let request = self.client.delete(self.url(&format!("/presets/{id}")));
        self.send(request).await?;
        tracing::info!(preset_id = id, "Preset deleted");
        Ok(())
    }

    async fn fetch_recommended_presets(&self, category: Category) -> Vec<RecommendedPresetRecord> {
        let request = self
            .client
            .get(self.url("/recommended-presets"))
            .query(&[("category", category.as_str())]);
        match self.send_json(request).await {
            Ok(presets) => presets,
            Err(e) => {
                tracing::warn!(%category, error = %e, "Failed to fetch recommended presets");
                Vec::new()
            }
        }
    }

    async fn create_recommended_preset(
        &self,
        draft: &RecommendedPresetDraft,
    ) -> Result<RecommendedPresetRecord, ServiceError> {
        let request = self
            .client
            .post(self.url("/recommended-presets"))
            .json(draft);
        self.send_json(request).await
    }
}

#[async_trait]
impl GenerationBackend for HttpStudioClient {
    async fn generate(
        &self,
        request: &GenerationRequest,
        cancel: CancellationToken,
    ) -> Result<GenerationOutput, ServiceError> {
        if cancel.is_cancelled() {
            return Err(ServiceError::Cancelled);
        }

        let request_id = uuid::Uuid::new_v4().to_string();
        let builder = self
            .client
            .post(self.url("/generate"))
            .header(REQUEST_ID_HEADER, &request_id)
            .json(request);

        tracing::debug!(
            %request_id,
            category = %request.category,
            images = request.images.len(),
            "Submitting generation"
        );

        // Dropping the in-flight future aborts the HTTP request.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(%request_id, "Generation cancelled");
                Err(ServiceError::Cancelled)
            }
            result = self.send_json::<GenerationOutput>(builder) => {
                if let Err(e) = &result {
                    tracing::warn!(%request_id, error = %e, "Generation failed");
                }
                result
            }
        }
    }
}

#[async_trait]
impl AccountService for HttpStudioClient {
    async fn fetch_credit_balance(&self) -> Result<i64, ServiceError> {
        let request = self.client.get(self.url("/credits"));
        let body: CreditBalance = self.send_json(request).await?;
        Ok(body.balance)
    }
}
