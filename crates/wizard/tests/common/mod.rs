//! In-memory collaborators shared by the wizard integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use atelier_core::category::Category;
use atelier_core::generation::{GenerationOutput, GenerationRequest};
use atelier_core::preset::{
    PresetRecord, PresetUpdate, RecommendedPresetDraft, RecommendedPresetRecord,
};
use atelier_core::services::{AccountService, GenerationBackend, PresetStore, ServiceError};
use atelier_core::types::ImageRef;
use atelier_wizard::cache::PresetCache;
use atelier_wizard::{Page, WizardController, WizardHost, WizardServices};

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Credits(i64),
    Navigate(Page),
    SessionExpired,
}

#[derive(Default)]
pub struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
}

impl RecordingHost {
    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl WizardHost for RecordingHost {
    fn on_credits_update(&self, balance: i64) {
        self.events.lock().unwrap().push(HostEvent::Credits(balance));
    }

    fn on_navigate(&self, page: Page) {
        self.events.lock().unwrap().push(HostEvent::Navigate(page));
    }

    fn on_session_expired(&self) {
        self.events.lock().unwrap().push(HostEvent::SessionExpired);
    }
}

// ---------------------------------------------------------------------------
// Preset store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakePresetStore {
    pub presets: Mutex<Vec<PresetRecord>>,
    pub recommended: Mutex<Vec<RecommendedPresetRecord>>,
    /// When set, every own-preset call fails with this error.
    pub fail_with: Mutex<Option<ServiceError>>,
    next_id: Mutex<u32>,
}

impl FakePresetStore {
    pub fn fail(&self, err: ServiceError) {
        *self.fail_with.lock().unwrap() = Some(err);
    }

    pub fn recover(&self) {
        *self.fail_with.lock().unwrap() = None;
    }

    fn check(&self) -> Result<(), ServiceError> {
        match self.fail_with.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn issue_id(&self, prefix: &str) -> String {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        format!("{prefix}-{next}")
    }
}

#[async_trait]
impl PresetStore for FakePresetStore {
    async fn fetch_presets(&self, category: Category) -> Result<Vec<PresetRecord>, ServiceError> {
        self.check()?;
        Ok(self
            .presets
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect())
    }

    async fn create_preset(&self, record: &PresetRecord) -> Result<PresetRecord, ServiceError> {
        self.check()?;
        let mut created = record.clone();
        created.id = Some(self.issue_id("p"));
        self.presets.lock().unwrap().insert(0, created.clone());
        Ok(created)
    }

    async fn update_preset(
        &self,
        id: &str,
        update: &PresetUpdate,
    ) -> Result<PresetRecord, ServiceError> {
        self.check()?;
        let mut presets = self.presets.lock().unwrap();
        let existing = presets
            .iter_mut()
            .find(|p| p.id.as_deref() == Some(id))
            .ok_or(ServiceError::Status {
                status: 404,
                message: "Preset not found".into(),
            })?;
        if let Some(name) = &update.name {
            existing.name = name.clone();
        }
        Ok(existing.clone())
    }

    async fn delete_preset(&self, id: &str) -> Result<(), ServiceError> {
        self.check()?;
        self.presets
            .lock()
            .unwrap()
            .retain(|p| p.id.as_deref() != Some(id));
        Ok(())
    }

    async fn fetch_recommended_presets(&self, category: Category) -> Vec<RecommendedPresetRecord> {
        self.recommended
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect()
    }

    async fn create_recommended_preset(
        &self,
        draft: &RecommendedPresetDraft,
    ) -> Result<RecommendedPresetRecord, ServiceError> {
        self.check()?;
        let published = RecommendedPresetRecord {
            id: self.issue_id("r"),
            name: draft.name.clone(),
            description: draft.description.clone(),
            category: draft.category,
            subcategory: draft.subcategory.clone(),
            is_active: draft.is_active,
            display_order: draft.display_order,
            created_by: Some("admin".into()),
            created_at: None,
            preset_data: draft.preset_data.clone(),
        };
        self.recommended.lock().unwrap().push(published.clone());
        Ok(published)
    }
}

// ---------------------------------------------------------------------------
// Generation backend
// ---------------------------------------------------------------------------

pub enum BackendReply {
    Output(GenerationOutput),
    Error(ServiceError),
    /// Block until the attempt's token is cancelled.
    WaitForCancel,
    /// Sleep, then succeed whether or not the token fired.
    OutputAfter(Duration, GenerationOutput),
}

#[derive(Default)]
pub struct FakeBackend {
    replies: Mutex<VecDeque<BackendReply>>,
    pub requests: Mutex<Vec<GenerationRequest>>,
}

impl FakeBackend {
    pub fn push(&self, reply: BackendReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationBackend for FakeBackend {
    async fn generate(
        &self,
        request: &GenerationRequest,
        cancel: CancellationToken,
    ) -> Result<GenerationOutput, ServiceError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(BackendReply::Output(output(1, Some(9))));
        match reply {
            BackendReply::Output(out) => Ok(out),
            BackendReply::Error(err) => Err(err),
            BackendReply::WaitForCancel => {
                cancel.cancelled().await;
                Err(ServiceError::Cancelled)
            }
            BackendReply::OutputAfter(delay, out) => {
                tokio::time::sleep(delay).await;
                Ok(out)
            }
        }
    }
}

pub fn output(credits_used: i64, credits_remaining: Option<i64>) -> GenerationOutput {
    GenerationOutput {
        image: "iVBORw0KGgo=".into(),
        mime_type: "image/png".into(),
        credits_used,
        credits_remaining,
    }
}

// ---------------------------------------------------------------------------
// Account service
// ---------------------------------------------------------------------------

pub struct FakeAccount {
    balances: Mutex<VecDeque<Result<i64, ServiceError>>>,
    pub calls: Mutex<u32>,
}

impl FakeAccount {
    pub fn new(balances: Vec<Result<i64, ServiceError>>) -> Self {
        Self {
            balances: Mutex::new(balances.into()),
            calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl AccountService for FakeAccount {
    async fn fetch_credit_balance(&self) -> Result<i64, ServiceError> {
        *self.calls.lock().unwrap() += 1;
        let mut balances = self.balances.lock().unwrap();
        match balances.len() {
            0 => Err(ServiceError::Transport("no more balances".into())),
            // Keep repeating the last answer.
            1 => balances[0].clone(),
            _ => balances.pop_front().unwrap(),
        }
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub store: Arc<FakePresetStore>,
    pub backend: Arc<FakeBackend>,
    pub host: Arc<RecordingHost>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            store: Arc::new(FakePresetStore::default()),
            backend: Arc::new(FakeBackend::default()),
            host: Arc::new(RecordingHost::default()),
        }
    }

    pub fn services(&self, cache: Option<Arc<PresetCache>>) -> WizardServices {
        WizardServices {
            presets: self.store.clone(),
            backend: self.backend.clone(),
            host: self.host.clone(),
            cache,
        }
    }

    pub fn controller(&self, category: Category) -> WizardController {
        WizardController::new(category, self.services(None))
    }
}

pub fn image(name: &str) -> Option<ImageRef> {
    Some(ImageRef::new(format!("data:image/png;base64,{name}")))
}

/// A men/casual controller with a top image and a bottom type, on the
/// environment step.
pub fn ready_men_controller(harness: &Harness) -> WizardController {
    let mut wizard = harness.controller(Category::Men);
    wizard.set_product_image(0, image("top")).unwrap();
    wizard.set_bottom_type(Some("men-blue-jeans")).unwrap();
    wizard.next().unwrap();
    wizard.next().unwrap();
    wizard
}
