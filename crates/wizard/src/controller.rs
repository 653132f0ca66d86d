//! Wizard controller.
//!
//! Owns the live [`WizardSelection`] and [`ConfigurationStore`], sequences
//! the three steps, runs generation attempts and routes preset operations.
//! All state transitions are synchronous `&mut self` calls; async work
//! re-enters through an attempt epoch so a result that arrives after its
//! attempt was cancelled is discarded.
//!
//! Generation can be driven in one call with [`WizardController::generate`],
//! or split into [`begin_generation`](WizardController::begin_generation),
//! [`GenerationTicket::execute`] and
//! [`complete_generation`](WizardController::complete_generation) when the
//! caller needs to keep the controller responsive while the backend works.

use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

use atelier_core::catalog::OptionEntry;
use atelier_core::category::{AgeGroup, Category, KidsGender, UploadType};
use atelier_core::config_store::{ConfigPatch, ConfigurationRecord, ConfigurationStore};
use atelier_core::derivation;
use atelier_core::generation::{self, GenerationOutput, GenerationRequest};
use atelier_core::preset::{self, OptionChange, PresetRecord, RecommendedPresetRecord};
use atelier_core::selection::{Accessories, WizardSelection};
use atelier_core::services::{GenerationBackend, PresetStore, ServiceError};
use atelier_core::types::ImageRef;
use atelier_core::wizard::{self, KeyCombo, WizardStep};

use crate::cache::PresetCache;
use crate::error::{classify, WizardError};
use crate::host::{Page, WizardHost};
use crate::library::{PresetLibrary, PresetListing, PublishOptions};

/// Message shown for failures the user cannot act on.
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// External collaborators the controller is wired to.
#[derive(Clone)]
pub struct WizardServices {
    pub presets: Arc<dyn PresetStore>,
    pub backend: Arc<dyn GenerationBackend>,
    pub host: Arc<dyn WizardHost>,
    pub cache: Option<Arc<PresetCache>>,
}

// ---------------------------------------------------------------------------
// Generation attempts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStatus {
    Idle,
    Generating { epoch: u64 },
}

/// Everything one attempt needs, detached from the controller.
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    pub epoch: u64,
    pub request: GenerationRequest,
    pub cancel: CancellationToken,
}

impl GenerationTicket {
    /// Run the attempt against `backend`.
    pub async fn execute(self, backend: &dyn GenerationBackend) -> GenerationAttempt {
        let result = backend.generate(&self.request, self.cancel.clone()).await;
        GenerationAttempt {
            epoch: self.epoch,
            cancelled: self.cancel.is_cancelled(),
            result,
        }
    }
}

/// The raw result of one attempt, tagged with its epoch.
#[derive(Debug, Clone)]
pub struct GenerationAttempt {
    pub epoch: u64,
    /// The attempt's token fired before the result was taken. Such a result
    /// is never applied, even when the backend reported success.
    pub cancelled: bool,
    pub result: Result<GenerationOutput, ServiceError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Completed(GenerationOutput),
    /// The attempt was no longer current; nothing changed.
    Discarded,
}

/// Cancels whichever attempt is in flight, from outside the controller.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    current: Arc<Mutex<Option<CancellationToken>>>,
}

impl CancelHandle {
    /// Cancel the in-flight attempt. Returns `false` when none is running.
    pub fn cancel(&self) -> bool {
        match self.slot().as_ref() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    fn set(&self, token: Option<CancellationToken>) {
        *self.slot() = token;
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        // The guarded value is a plain token; a poisoned lock still holds a
        // usable one.
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct WizardController {
    selection: WizardSelection,
    store: ConfigurationStore,
    step: WizardStep,
    status: GenerationStatus,
    epoch: u64,
    session: CancellationToken,
    attempt: CancelHandle,
    error: Option<String>,
    warning: Option<String>,
    credits: Option<i64>,
    presets: PresetListing,
    library: PresetLibrary,
    backend: Arc<dyn GenerationBackend>,
    host: Arc<dyn WizardHost>,
}

impl WizardController {
    pub fn new(category: Category, services: WizardServices) -> Self {
        Self::with_session(category, services, CancellationToken::new())
    }

    /// Build a controller whose attempts descend from `session`, so
    /// cancelling the session cancels any in-flight generation. Dropping the
    /// controller leaves `session` itself untouched.
    pub fn with_session(
        category: Category,
        services: WizardServices,
        session: CancellationToken,
    ) -> Self {
        let selection = WizardSelection::new(category);
        let store = ConfigurationStore::new(ConfigurationRecord::defaults_for(
            category,
            selection.catalog_gender(),
        ));
        let library = match services.cache {
            Some(cache) => PresetLibrary::with_cache(services.presets, cache),
            None => PresetLibrary::new(services.presets),
        };
        Self {
            selection,
            store,
            step: WizardStep::Product,
            status: GenerationStatus::Idle,
            epoch: 0,
            session: session.child_token(),
            attempt: CancelHandle::default(),
            error: None,
            warning: None,
            credits: None,
            presets: PresetListing::empty(category),
            library,
            backend: services.backend,
            host: services.host,
        }
    }

    // -- Read access ----------------------------------------------------------

    pub fn selection(&self) -> &WizardSelection {
        &self.selection
    }

    pub fn config(&self) -> &ConfigurationRecord {
        self.store.current()
    }

    pub fn category(&self) -> Category {
        self.selection.category()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn status(&self) -> GenerationStatus {
        self.status
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.status, GenerationStatus::Generating { .. })
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn credits(&self) -> Option<i64> {
        self.credits
    }

    pub fn presets(&self) -> &PresetListing {
        &self.presets
    }

    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    /// Whether `Next` is allowed from the current step.
    pub fn can_proceed(&self) -> bool {
        match self.step {
            WizardStep::Product => derivation::is_product_step_complete(&self.selection),
            _ => true,
        }
    }

    pub fn shows_bottom_selector(&self) -> bool {
        derivation::selection_shows_bottom_selector(&self.selection)
    }

    pub fn session_token(&self) -> CancellationToken {
        self.session.clone()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.attempt.clone()
    }

    pub fn clear_messages(&mut self) {
        self.error = None;
        self.warning = None;
    }

    // -- Navigation -----------------------------------------------------------

    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_idle()?;
        self.step = wizard::next_step(self.step, self.can_proceed())?;
        Ok(self.step)
    }

    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_idle()?;
        self.step = wizard::previous_step(self.step)?;
        Ok(self.step)
    }

    pub fn jump_to(&mut self, target: WizardStep) -> Result<(), WizardError> {
        self.ensure_idle()?;
        wizard::validate_jump(self.step, target)?;
        self.step = target;
        Ok(())
    }

    // -- Selection ------------------------------------------------------------

    /// Switch category.
    ///
    /// Clears the bottom type, the images and every category field, moves
    /// hair style and body type onto the new category's catalogs when they do
    /// not fit, and returns to the product step. Option history starts over,
    /// and listings of the previous category are dropped.
    pub fn set_category(&mut self, category: Category) -> Result<(), WizardError> {
        self.ensure_idle()?;
        if category == self.category() {
            return Ok(());
        }
        self.selection.set_category(category);
        self.store.set_initial(ConfigurationRecord::defaults_for(
            category,
            self.selection.catalog_gender(),
        ));
        self.align_styling();
        self.store.rebase(*self.store.current());
        self.step = WizardStep::Product;
        self.presets = PresetListing::empty(category);
        tracing::debug!(%category, "Category changed");
        Ok(())
    }

    pub fn set_sub_category(&mut self, id: &str) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.selection.set_sub_category(id)?;
        Ok(())
    }

    pub fn set_kids_gender(&mut self, gender: KidsGender) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.selection.set_kids_gender(gender)?;
        self.align_styling();
        Ok(())
    }

    pub fn set_age_group(&mut self, age_group: AgeGroup) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.selection.set_age_group(age_group)?;
        Ok(())
    }

    pub fn set_upload_type(&mut self, upload_type: UploadType) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.selection.set_upload_type(upload_type);
        Ok(())
    }

    pub fn set_use_custom_model(&mut self, enabled: bool) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.selection.set_use_custom_model(enabled);
        Ok(())
    }

    pub fn set_custom_model_image(&mut self, image: Option<ImageRef>) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.selection.set_custom_model_image(image);
        Ok(())
    }

    pub fn set_product_image(
        &mut self,
        index: usize,
        image: Option<ImageRef>,
    ) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.selection.set_product_image(index, image)?;
        Ok(())
    }

    pub fn set_bottom_type(&mut self, id: Option<&str>) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.selection.set_bottom_type(id)?;
        Ok(())
    }

    pub fn set_accessories(&mut self, accessories: Accessories) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.selection.set_accessories(accessories)?;
        Ok(())
    }

    pub fn set_skin_tone(&mut self, entry: &'static OptionEntry) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.selection.set_skin_tone(entry)?;
        Ok(())
    }

    pub fn set_attire(&mut self, entry: &'static OptionEntry) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.selection.set_attire(entry)?;
        Ok(())
    }

    // -- Configuration --------------------------------------------------------

    /// Apply an option patch as one undoable step.
    ///
    /// Hair style and body type must come from the catalogs of the current
    /// category (and kids gender).
    pub fn update_config(&mut self, patch: &ConfigPatch) -> Result<(), WizardError> {
        self.ensure_idle()?;
        if patch.is_empty() {
            return Ok(());
        }
        let candidate = self.store.current().merged(patch);
        let reset = candidate.styling_reset(self.category(), self.selection.catalog_gender());
        if reset.hair_style.is_some() && patch.hair_style.is_some() {
            return Err(WizardError::Validation(format!(
                "Hair style is not available for {}",
                self.category()
            )));
        }
        if reset.body_type.is_some() && patch.body_type.is_some() {
            return Err(WizardError::Validation(format!(
                "Body type is not available for {}",
                self.category()
            )));
        }
        self.store.update(patch);
        Ok(())
    }

    /// Step back one option change. No-op while a generation is in flight.
    ///
    /// Hair style and body type are realigned to the current catalogs, since
    /// older snapshots may predate a kids gender change.
    pub fn undo(&mut self) -> bool {
        if self.is_generating() || !self.store.undo() {
            return false;
        }
        self.align_styling();
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.is_generating() || !self.store.redo() {
            return false;
        }
        self.align_styling();
        true
    }

    /// Back to the category defaults with a fresh history.
    pub fn reset_config(&mut self) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.store.reset();
        self.align_styling();
        Ok(())
    }

    /// Keep hair style and body type inside the active catalogs. Rewrites the
    /// current snapshot rather than adding an undo step.
    fn align_styling(&mut self) {
        let current = *self.store.current();
        let patch = current.styling_reset(self.category(), self.selection.catalog_gender());
        if !patch.is_empty() {
            self.store.replace_current(current.merged(&patch));
        }
    }

    // -- Generation -----------------------------------------------------------

    /// Whether a key press should start generation.
    pub fn accelerator_triggers_generation(&self, combo: &KeyCombo) -> bool {
        wizard::accelerator_fires(combo, self.step, self.is_generating())
    }

    /// Start an attempt: validate, assemble the request and issue a fresh
    /// cancellation token.
    pub fn begin_generation(&mut self) -> Result<GenerationTicket, WizardError> {
        self.ensure_idle()?;
        if !wizard::can_generate_from(self.step) {
            return Err(WizardError::Validation(format!(
                "Generation starts from the {} step",
                WizardStep::Environment.label()
            )));
        }
        if !derivation::is_product_step_complete(&self.selection) {
            let err = WizardError::Validation("Product step is incomplete".to_string());
            return Err(self.surface(err));
        }
        let request = match generation::build_request(&self.selection, self.store.current()) {
            Ok(request) => request,
            Err(e) => return Err(self.surface(e.into())),
        };

        self.epoch += 1;
        let cancel = self.session.child_token();
        self.attempt.set(Some(cancel.clone()));
        self.status = GenerationStatus::Generating { epoch: self.epoch };
        self.clear_messages();

        tracing::info!(
            epoch = self.epoch,
            category = %request.category,
            images = request.images.len(),
            "Generation started"
        );

        Ok(GenerationTicket {
            epoch: self.epoch,
            request,
            cancel,
        })
    }

    /// Cancel the in-flight attempt. Returns `false` when idle.
    ///
    /// Leaves the wizard on the environment step, interactive, with no error
    /// or warning and no credit change.
    pub fn cancel_generation(&mut self) -> bool {
        let GenerationStatus::Generating { epoch } = self.status else {
            return false;
        };
        self.attempt.cancel();
        self.attempt.set(None);
        self.status = GenerationStatus::Idle;
        self.clear_messages();
        tracing::info!(epoch, "Generation cancelled");
        true
    }

    /// Apply the result of an attempt.
    pub fn complete_generation(
        &mut self,
        attempt: GenerationAttempt,
    ) -> Result<GenerationOutcome, WizardError> {
        if self.status != (GenerationStatus::Generating { epoch: attempt.epoch }) {
            tracing::debug!(epoch = attempt.epoch, "Discarding stale generation result");
            return Ok(GenerationOutcome::Discarded);
        }
        self.attempt.set(None);
        self.status = GenerationStatus::Idle;

        let result = if attempt.cancelled {
            Err(ServiceError::Cancelled)
        } else {
            attempt.result
        };
        match result {
            Ok(output) => {
                let balance = output
                    .credits_remaining
                    .or_else(|| self.credits.map(|c| c - output.credits_used));
                if let Some(balance) = balance {
                    self.credits = Some(balance);
                    self.host.on_credits_update(balance);
                }
                self.host.on_navigate(Page::Gallery);
                self.selection.reset();
                self.align_styling();
                self.step = WizardStep::Product;
                tracing::info!(
                    epoch = attempt.epoch,
                    credits_used = output.credits_used,
                    "Generation completed"
                );
                Ok(GenerationOutcome::Completed(output))
            }
            Err(ServiceError::Cancelled) => {
                tracing::info!(epoch = attempt.epoch, "Generation cancelled");
                Err(self.surface(WizardError::Cancelled))
            }
            Err(e) => {
                tracing::warn!(epoch = attempt.epoch, error = %e, "Generation failed");
                Err(self.surface(classify(&e)))
            }
        }
    }

    /// Run a whole attempt. Use [`cancel_handle`](Self::cancel_handle) to
    /// cancel it from another task.
    pub async fn generate(&mut self) -> Result<GenerationOutcome, WizardError> {
        let ticket = self.begin_generation()?;
        let backend = Arc::clone(&self.backend);
        let attempt = ticket.execute(backend.as_ref()).await;
        self.complete_generation(attempt)
    }

    /// Record a balance obtained elsewhere (e.g. the credits poller).
    pub fn apply_credit_balance(&mut self, balance: i64) {
        if self.credits != Some(balance) {
            self.credits = Some(balance);
            self.host.on_credits_update(balance);
        }
    }

    /// Cancel the session and with it any in-flight attempt.
    pub fn shutdown(&mut self) {
        self.session.cancel();
        self.cancel_generation();
    }

    // -- Presets --------------------------------------------------------------

    /// Re-fetch own and recommended presets for the current category.
    ///
    /// A failed own-preset fetch keeps the fallback listing; an expired
    /// session or denied access is still reported.
    pub async fn refresh_presets(&mut self) -> Result<(), WizardError> {
        let listing = self.library.refresh(self.category()).await;
        let failure = listing.own_error.as_ref().map(classify);
        self.accept_presets(listing);
        match failure {
            Some(err @ (WizardError::SessionExpired | WizardError::AccessDenied(_))) => {
                Err(self.surface(err))
            }
            _ => Ok(()),
        }
    }

    /// Install a listing. Listings for another category are rejected.
    pub fn accept_presets(&mut self, listing: PresetListing) -> bool {
        if listing.category != self.category() {
            tracing::debug!(
                listing = %listing.category,
                current = %self.category(),
                "Ignoring preset listing for another category"
            );
            return false;
        }
        self.presets = listing;
        true
    }

    pub async fn save_preset(&mut self, name: &str) -> Result<PresetRecord, WizardError> {
        let result = self
            .library
            .save(name, &self.selection, self.store.current())
            .await;
        match result {
            Ok(created) => {
                if created.category == self.category() {
                    self.presets.own.insert(0, created.clone());
                }
                Ok(created)
            }
            Err(e) => Err(self.surface(e.classify())),
        }
    }

    pub async fn rename_preset(&mut self, id: &str, name: &str) -> Result<PresetRecord, WizardError> {
        match self.library.rename(id, name).await {
            Ok(updated) => {
                if let Some(existing) = self
                    .presets
                    .own
                    .iter_mut()
                    .find(|p| p.id.as_deref() == Some(id))
                {
                    *existing = updated.clone();
                }
                Ok(updated)
            }
            Err(e) => Err(self.surface(e.classify())),
        }
    }

    pub async fn delete_preset(&mut self, id: &str) -> Result<(), WizardError> {
        match self.library.delete(id).await {
            Ok(()) => {
                self.presets.own.retain(|p| p.id.as_deref() != Some(id));
                Ok(())
            }
            Err(e) => Err(self.surface(e.classify())),
        }
    }

    /// Publish the current state as a recommended preset.
    pub async fn publish_preset(
        &mut self,
        options: &PublishOptions,
    ) -> Result<RecommendedPresetRecord, WizardError> {
        let result = self
            .library
            .publish(options, &self.selection, self.store.current())
            .await;
        match result {
            Ok(published) => {
                if published.category == self.category() && published.is_active {
                    self.presets.recommended.push(published.clone());
                    self.presets.recommended =
                        preset::order_recommended(std::mem::take(&mut self.presets.recommended));
                }
                Ok(published)
            }
            Err(e) => Err(self.surface(e.classify())),
        }
    }

    /// Option fields `preset` would change against the current record.
    pub fn preview_preset(&self, preset: &PresetRecord) -> Vec<OptionChange> {
        let patch = preset::deserialize(preset, &self.selection);
        preset::diff_options(self.store.current(), &patch.config)
    }

    /// Load a preset into the current category. One undo step reverts the
    /// option changes.
    pub fn apply_preset(&mut self, preset: &PresetRecord) -> Result<(), WizardError> {
        self.ensure_idle()?;
        let patch = preset::deserialize(preset, &self.selection);
        let mut selection = self.selection.clone();
        preset::apply_wizard_patch(&mut selection, &patch.wizard)?;
        self.selection = selection;

        let mut record = self.store.current().merged(&patch.config);
        // The preset may have switched kids gender without carrying a hair
        // style of the new catalog.
        record = record.merged(
            &record.styling_reset(self.category(), self.selection.catalog_gender()),
        );
        self.store.load_snapshot(record);

        tracing::debug!(preset = %preset.name, category = %self.category(), "Preset applied");
        Ok(())
    }

    /// Apply an own or recommended preset from the current listing by id.
    pub fn apply_preset_by_id(&mut self, id: &str) -> Result<(), WizardError> {
        let preset = self
            .presets
            .find_own(id)
            .or_else(|| {
                self.presets
                    .recommended
                    .iter()
                    .find(|r| r.id == id)
                    .map(|r| &r.preset_data)
            })
            .cloned()
            .ok_or_else(|| WizardError::Validation(format!("Preset {id} is not in the list")))?;
        self.apply_preset(&preset)
    }

    // -- Internals ------------------------------------------------------------

    fn ensure_idle(&self) -> Result<(), WizardError> {
        if self.is_generating() {
            return Err(WizardError::Validation(
                "A generation is in progress".to_string(),
            ));
        }
        Ok(())
    }

    /// Reflect an error in the controller state and notify the host.
    fn surface(&mut self, err: WizardError) -> WizardError {
        match &err {
            WizardError::Validation(msg) => {
                self.error = Some(msg.clone());
            }
            WizardError::AccessDenied(msg) => {
                self.warning = Some(msg.clone());
                self.host.on_navigate(Page::Pricing);
            }
            WizardError::SessionExpired => {
                self.host.on_session_expired();
                self.host.on_navigate(Page::Login);
            }
            WizardError::Transport(_) => {
                self.error = Some(GENERIC_ERROR.to_string());
            }
            WizardError::Cancelled => {
                self.clear_messages();
            }
        }
        err
    }
}

impl Drop for WizardController {
    fn drop(&mut self) {
        self.session.cancel();
    }
}
