//! Preset records and the codec between them and the live wizard state.
//!
//! [`serialize`] projects a [`WizardSelection`] plus a
//! [`ConfigurationRecord`] onto a flat [`PresetRecord`], keeping only the
//! fields that apply to the selection's category. [`deserialize`] resolves
//! every stored id against the static catalogs of the category being loaded
//! into; ids that no longer resolve are left out of the resulting patch, so
//! loading never produces a broken option reference.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, find_option, OptionEntry};
use crate::category::{AgeGroup, Category, KidsGender, UploadType};
use crate::config_store::{ConfigPatch, ConfigurationRecord, PreviewOptions};
use crate::error::CoreError;
use crate::schema;
use crate::selection::{Accessories, WizardSelection};
use crate::types::{PresetId, Timestamp};

/* --------------------------------------------------------------------------
   Validation limits
   -------------------------------------------------------------------------- */

/// Maximum length for a preset name.
pub const MAX_PRESET_NAME_LEN: usize = 200;

/// Maximum length for a recommended preset description.
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// Validate a preset name: non-empty after trimming and within length limit.
pub fn validate_preset_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Preset name must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_PRESET_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Preset name too long: {} chars (max {MAX_PRESET_NAME_LEN})",
            trimmed.chars().count()
        )));
    }
    Ok(())
}

/// Validate a recommended preset description.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Description too long: {} chars (max {MAX_DESCRIPTION_LEN})",
            description.chars().count()
        )));
    }
    Ok(())
}

/* --------------------------------------------------------------------------
   Records
   -------------------------------------------------------------------------- */

/// Flat, storable projection of the wizard state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PresetId>,
    pub name: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    pub use_custom_model: bool,
    pub upload_type: UploadType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessories: Option<Accessories>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin_tone_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attire_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hair_style_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit_type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_type_id: Option<String>,
    pub pose_id: String,
    pub expression_id: String,
    pub view_id: String,
    pub aspect_ratio_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_options: Option<PreviewOptions>,
    pub time_id: String,
    pub camera_id: String,
    pub quality_id: String,
    pub background_id: String,
}

/// Partial update of a stored preset. Renaming sends only `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// An admin-curated preset offered to every user of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedPresetRecord {
    pub id: PresetId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: Category,
    #[serde(default)]
    pub subcategory: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    pub preset_data: PresetRecord,
}

/// Body for publishing a new recommended preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedPresetDraft {
    pub name: String,
    pub description: Option<String>,
    pub category: Category,
    pub subcategory: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
    pub preset_data: PresetRecord,
}

/// Active recommended presets ordered by `display_order`; ties keep the
/// order the store returned them in.
pub fn order_recommended(mut presets: Vec<RecommendedPresetRecord>) -> Vec<RecommendedPresetRecord> {
    presets.retain(|p| p.is_active);
    presets.sort_by_key(|p| p.display_order);
    presets
}

/* --------------------------------------------------------------------------
   Serialize
   -------------------------------------------------------------------------- */

/// Project the live state onto a storable record.
pub fn serialize(
    name: &str,
    selection: &WizardSelection,
    record: &ConfigurationRecord,
) -> PresetRecord {
    let category = selection.category();
    let styling = category.has_styling_options();

    PresetRecord {
        id: None,
        name: name.trim().to_string(),
        category,
        created_at: None,
        updated_at: None,
        use_custom_model: selection.use_custom_model(),
        upload_type: selection.upload_type(),
        sub_category: selection.sub_category().map(str::to_string),
        gender: selection.kids_gender().map(|g| g.as_str().to_string()),
        age_group: selection.age_group().map(|a| a.as_str().to_string()),
        accessories: selection.accessories(),
        skin_tone_id: selection.skin_tone().map(|e| e.id.to_string()),
        attire_id: selection.attire().map(|e| e.id.to_string()),
        hair_style_id: styling.then(|| record.hair_style.id.to_string()),
        fit_type_id: styling.then(|| record.fit_type.id.to_string()),
        body_type_id: styling.then(|| record.body_type.id.to_string()),
        pose_id: record.pose.id.to_string(),
        expression_id: record.expression.id.to_string(),
        view_id: record.view.id.to_string(),
        aspect_ratio_id: record.aspect_ratio.id.to_string(),
        preview_options: Some(record.preview_options),
        time_id: record.time.id.to_string(),
        camera_id: record.camera.id.to_string(),
        quality_id: record.quality.id.to_string(),
        background_id: record.background.id.to_string(),
    }
}

/* --------------------------------------------------------------------------
   Deserialize
   -------------------------------------------------------------------------- */

/// Wizard fields recovered from a preset. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardPatch {
    pub use_custom_model: Option<bool>,
    pub upload_type: Option<UploadType>,
    pub sub_category: Option<String>,
    pub gender: Option<KidsGender>,
    pub age_group: Option<AgeGroup>,
    pub accessories: Option<Accessories>,
    pub skin_tone: Option<&'static OptionEntry>,
    pub attire: Option<&'static OptionEntry>,
}

/// Everything a preset changes, split by owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetPatch {
    pub wizard: WizardPatch,
    pub config: ConfigPatch,
}

/// Resolve a preset against the catalogs of `target`'s category.
///
/// Never fails: ids that do not resolve are omitted, and category fields
/// that do not fit the target category are dropped.
pub fn deserialize(preset: &PresetRecord, target: &WizardSelection) -> PresetPatch {
    let category = target.category();

    let mut wizard = WizardPatch {
        use_custom_model: Some(preset.use_custom_model),
        upload_type: Some(preset.upload_type),
        ..Default::default()
    };

    if let Some(sub) = preset.sub_category.as_deref() {
        if schema::is_known_sub_category(category, sub) {
            wizard.sub_category = Some(sub.to_string());
        }
    }

    // Kids gender decides the hair catalog, so settle it before the lookups.
    let mut gender = target.catalog_gender();
    if category == Category::Kids {
        wizard.gender = preset.gender.as_deref().and_then(KidsGender::parse);
        wizard.age_group = preset.age_group.as_deref().and_then(AgeGroup::parse);
        if let Some(g) = wizard.gender {
            gender = g;
        }
    }

    if category == Category::Women {
        wizard.accessories = preset.accessories;
    }

    if category == Category::Jewellery {
        wizard.skin_tone = lookup(catalog::SKIN_TONES, preset.skin_tone_id.as_deref());
        wizard.attire = lookup(catalog::ATTIRES, preset.attire_id.as_deref());
    }

    let config = ConfigPatch {
        background: find_option(catalog::BACKGROUNDS, &preset.background_id),
        pose: find_option(catalog::POSES, &preset.pose_id),
        expression: find_option(catalog::EXPRESSIONS, &preset.expression_id),
        view: find_option(catalog::VIEWS, &preset.view_id),
        time: find_option(catalog::TIMES, &preset.time_id),
        camera: find_option(catalog::CAMERAS, &preset.camera_id),
        quality: find_option(catalog::QUALITIES, &preset.quality_id),
        aspect_ratio: find_option(catalog::ASPECT_RATIOS, &preset.aspect_ratio_id),
        hair_style: lookup(
            catalog::hair_styles_for(category, gender),
            preset.hair_style_id.as_deref(),
        ),
        fit_type: lookup(catalog::FIT_TYPES, preset.fit_type_id.as_deref()),
        body_type: lookup(
            catalog::body_types_for(category),
            preset.body_type_id.as_deref(),
        ),
        preview_options: preset.preview_options,
    };

    PresetPatch { wizard, config }
}

fn lookup(catalog: &'static [OptionEntry], id: Option<&str>) -> Option<&'static OptionEntry> {
    id.and_then(|id| find_option(catalog, id))
}

/// Apply a [`WizardPatch`] to a selection through its setters.
///
/// Upload type and sub-category go first because they re-lay the image
/// slots. A patch built by [`deserialize`] for the same category never
/// fails; a field the selection's category does not carry is a
/// validation error and leaves the earlier fields applied.
pub fn apply_wizard_patch(
    selection: &mut WizardSelection,
    patch: &WizardPatch,
) -> Result<(), CoreError> {
    if let Some(upload_type) = patch.upload_type {
        selection.set_upload_type(upload_type);
    }
    if let Some(sub) = patch.sub_category.as_deref() {
        selection.set_sub_category(sub)?;
    }
    if let Some(enabled) = patch.use_custom_model {
        selection.set_use_custom_model(enabled);
    }
    if let Some(gender) = patch.gender {
        selection.set_kids_gender(gender)?;
    }
    if let Some(age_group) = patch.age_group {
        selection.set_age_group(age_group)?;
    }
    if let Some(accessories) = patch.accessories {
        selection.set_accessories(accessories)?;
    }
    if let Some(skin_tone) = patch.skin_tone {
        selection.set_skin_tone(skin_tone)?;
    }
    if let Some(attire) = patch.attire {
        selection.set_attire(attire)?;
    }
    Ok(())
}

/* --------------------------------------------------------------------------
   Preview diff
   -------------------------------------------------------------------------- */

/// One option a preset would change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionChange {
    pub field: &'static str,
    pub current_id: &'static str,
    pub preset_id: &'static str,
}

/// List the option fields `patch` would change on `current`, in field order.
/// Preview toggles are not included.
pub fn diff_options(current: &ConfigurationRecord, patch: &ConfigPatch) -> Vec<OptionChange> {
    let pairs: [(&'static str, &'static OptionEntry, Option<&'static OptionEntry>); 11] = [
        ("background", current.background, patch.background),
        ("pose", current.pose, patch.pose),
        ("expression", current.expression, patch.expression),
        ("view", current.view, patch.view),
        ("time", current.time, patch.time),
        ("camera", current.camera, patch.camera),
        ("quality", current.quality, patch.quality),
        ("aspectRatio", current.aspect_ratio, patch.aspect_ratio),
        ("hairStyle", current.hair_style, patch.hair_style),
        ("fitType", current.fit_type, patch.fit_type),
        ("bodyType", current.body_type, patch.body_type),
    ];

    pairs
        .into_iter()
        .filter_map(|(field, cur, new)| {
            let new = new?;
            (cur.id != new.id).then_some(OptionChange {
                field,
                current_id: cur.id,
                preset_id: new.id,
            })
        })
        .collect()
}

/* --------------------------------------------------------------------------
   Tests
   -------------------------------------------------------------------------- */
