//! Generation request assembly.
//!
//! Flattens the wizard selection and the current configuration into the
//! primitive payload the generation backend accepts: prompt strings and ids,
//! never catalog entries.

use serde::{Deserialize, Serialize};

use crate::category::{Category, UploadType};
use crate::config_store::{ConfigurationRecord, PreviewOptions};
use crate::derivation;
use crate::error::CoreError;
use crate::selection::{Accessories, WizardSelection};
use crate::types::ImageRef;

/// Kids-only metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KidsMeta {
    pub gender: String,
    pub age_group: String,
}

/// Payload for one generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Ordered inputs: custom model image first (when used), then product images.
    pub images: Vec<ImageRef>,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    pub background_prompt: String,
    pub pose_prompt: String,
    pub expression_prompt: String,
    pub view_prompt: String,
    pub time_prompt: String,
    pub aspect_ratio_id: String,
    pub camera_prompt: String,
    pub quality_id: String,
    pub upload_type: UploadType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_model_image: Option<ImageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kids_meta: Option<KidsMeta>,
    pub preview_options: PreviewOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessories: Option<Accessories>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skin_tone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attire: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hair_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_type: Option<String>,
}

/// What the backend returns for a finished generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutput {
    /// Base64-encoded image bytes.
    pub image: String,
    pub mime_type: String,
    pub credits_used: i64,
    #[serde(default)]
    pub credits_remaining: Option<i64>,
}

/// Build the request for the current state.
///
/// Fails only when no product image is present. Hair style and body type
/// are sent for every category that shows a model (all but jewellery); fit
/// type only for men and women.
pub fn build_request(
    selection: &WizardSelection,
    record: &ConfigurationRecord,
) -> Result<GenerationRequest, CoreError> {
    if derivation::product_images(selection).is_empty() {
        return Err(CoreError::Validation(
            "At least one product image is required".to_string(),
        ));
    }

    let category = selection.category();
    let shows_model = !category.is_single_image();

    let kids_meta = match (selection.kids_gender(), selection.age_group()) {
        (Some(gender), Some(age_group)) => Some(KidsMeta {
            gender: gender.as_str().to_string(),
            age_group: age_group.as_str().to_string(),
        }),
        _ => None,
    };

    let custom_model_image = if selection.use_custom_model() {
        selection.custom_model_image().cloned()
    } else {
        None
    };

    Ok(GenerationRequest {
        images: derivation::collect_input_images(selection),
        category,
        sub_category: selection.sub_category().map(str::to_string),
        background_prompt: record.background.prompt.to_string(),
        pose_prompt: record.pose.prompt.to_string(),
        expression_prompt: record.expression.prompt.to_string(),
        view_prompt: record.view.prompt.to_string(),
        time_prompt: record.time.prompt.to_string(),
        aspect_ratio_id: record.aspect_ratio.id.to_string(),
        camera_prompt: record.camera.prompt.to_string(),
        quality_id: record.quality.id.to_string(),
        upload_type: selection.upload_type(),
        custom_model_image,
        kids_meta,
        preview_options: record.preview_options,
        accessories: selection.accessories(),
        skin_tone: selection.skin_tone().map(|e| e.prompt.to_string()),
        attire: selection.attire().map(|e| e.prompt.to_string()),
        hair_style: shows_model.then(|| record.hair_style.prompt.to_string()),
        fit_type: category
            .has_styling_options()
            .then(|| record.fit_type.prompt.to_string()),
        body_type: shows_model.then(|| record.body_type.prompt.to_string()),
        bottom_type: selection.bottom_type().map(|e| e.prompt.to_string()),
    })
}
