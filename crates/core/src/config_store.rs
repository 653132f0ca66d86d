//! Versioned, undoable option configuration.
//!
//! [`ConfigurationStore`] keeps every [`ConfigurationRecord`] it has ever
//! held (up to [`MAX_HISTORY_LEN`](crate::history::MAX_HISTORY_LEN)) in a
//! [`HistoryLog`]. Updates are merged from a [`ConfigPatch`] carrying whole
//! catalog entries; the store never resolves ids itself.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, OptionEntry};
use crate::category::{Category, KidsGender};
use crate::history::HistoryLog;

/// Preview toggles shown next to the generated image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewOptions {
    pub show_outfit_details: bool,
    pub highlight_fabric_texture: bool,
}

/// The full option selection at one point in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationRecord {
    pub background: &'static OptionEntry,
    pub pose: &'static OptionEntry,
    pub expression: &'static OptionEntry,
    pub view: &'static OptionEntry,
    pub time: &'static OptionEntry,
    pub camera: &'static OptionEntry,
    pub quality: &'static OptionEntry,
    pub aspect_ratio: &'static OptionEntry,
    pub hair_style: &'static OptionEntry,
    pub fit_type: &'static OptionEntry,
    pub body_type: &'static OptionEntry,
    pub preview_options: PreviewOptions,
}

impl ConfigurationRecord {
    /// First entry of every catalog, with the styling catalogs chosen for
    /// `category` (and `gender`, for kids).
    pub fn defaults_for(category: Category, gender: KidsGender) -> Self {
        Self {
            background: &catalog::BACKGROUNDS[0],
            pose: &catalog::POSES[0],
            expression: &catalog::EXPRESSIONS[0],
            view: &catalog::VIEWS[0],
            time: &catalog::TIMES[0],
            camera: &catalog::CAMERAS[0],
            quality: &catalog::QUALITIES[0],
            aspect_ratio: &catalog::ASPECT_RATIOS[0],
            hair_style: &catalog::hair_styles_for(category, gender)[0],
            fit_type: &catalog::FIT_TYPES[0],
            body_type: &catalog::body_types_for(category)[0],
            preview_options: PreviewOptions::default(),
        }
    }

    /// Patch moving hair style and body type onto the first entry of the
    /// catalogs for `category` (and `gender`) when the current entry is not
    /// one of theirs. Empty when both already fit.
    pub fn styling_reset(&self, category: Category, gender: KidsGender) -> ConfigPatch {
        let hair = catalog::hair_styles_for(category, gender);
        let body = catalog::body_types_for(category);
        ConfigPatch {
            hair_style: hair.first().filter(|_| !contains(hair, self.hair_style)),
            body_type: body.first().filter(|_| !contains(body, self.body_type)),
            ..Default::default()
        }
    }

    /// Return a copy with every `Some` field of `patch` applied.
    pub fn merged(&self, patch: &ConfigPatch) -> Self {
        Self {
            background: patch.background.unwrap_or(self.background),
            pose: patch.pose.unwrap_or(self.pose),
            expression: patch.expression.unwrap_or(self.expression),
            view: patch.view.unwrap_or(self.view),
            time: patch.time.unwrap_or(self.time),
            camera: patch.camera.unwrap_or(self.camera),
            quality: patch.quality.unwrap_or(self.quality),
            aspect_ratio: patch.aspect_ratio.unwrap_or(self.aspect_ratio),
            hair_style: patch.hair_style.unwrap_or(self.hair_style),
            fit_type: patch.fit_type.unwrap_or(self.fit_type),
            body_type: patch.body_type.unwrap_or(self.body_type),
            preview_options: patch.preview_options.unwrap_or(self.preview_options),
        }
    }
}

fn contains(catalog: &[OptionEntry], entry: &OptionEntry) -> bool {
    catalog.iter().any(|e| e.id == entry.id)
}

/// A partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigPatch {
    pub background: Option<&'static OptionEntry>,
    pub pose: Option<&'static OptionEntry>,
    pub expression: Option<&'static OptionEntry>,
    pub view: Option<&'static OptionEntry>,
    pub time: Option<&'static OptionEntry>,
    pub camera: Option<&'static OptionEntry>,
    pub quality: Option<&'static OptionEntry>,
    pub aspect_ratio: Option<&'static OptionEntry>,
    pub hair_style: Option<&'static OptionEntry>,
    pub fit_type: Option<&'static OptionEntry>,
    pub body_type: Option<&'static OptionEntry>,
    pub preview_options: Option<PreviewOptions>,
}

impl ConfigPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Undoable holder of the current [`ConfigurationRecord`].
#[derive(Debug, Clone)]
pub struct ConfigurationStore {
    history: HistoryLog<ConfigurationRecord>,
    initial: ConfigurationRecord,
}

impl ConfigurationStore {
    pub fn new(initial: ConfigurationRecord) -> Self {
        Self {
            history: HistoryLog::new(initial),
            initial,
        }
    }

    pub fn current(&self) -> &ConfigurationRecord {
        self.history.current()
    }

    /// Merge `patch` into the current record and push the result.
    pub fn update(&mut self, patch: &ConfigPatch) {
        let next = self.current().merged(patch);
        self.history.push(next);
    }

    /// Replace the whole record. Participates in undo like any update.
    pub fn load_snapshot(&mut self, record: ConfigurationRecord) {
        self.history.push(record);
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    /// Rewrite the current record in place. Not an undo step.
    pub fn replace_current(&mut self, record: ConfigurationRecord) {
        self.history.replace_current(record);
    }

    /// Start a fresh history holding only `record`.
    pub fn rebase(&mut self, record: ConfigurationRecord) {
        self.history.reset(record);
    }

    /// Back to the initial record with an empty history.
    pub fn reset(&mut self) {
        self.history.reset(self.initial);
    }

    /// Change the record `reset` returns to. Existing history is kept.
    pub fn set_initial(&mut self, initial: ConfigurationRecord) {
        self.initial = initial;
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}
