use std::path::PathBuf;

use anyhow::Context;

use atelier_core::category::{Category, UploadType};

/// What to render, loaded from `RENDER_*` environment variables.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub category: Category,
    pub sub_category: Option<String>,
    pub upload_type: UploadType,
    /// Product images in slot order; empty entries leave a slot unfilled.
    pub product_images: Vec<Option<PathBuf>>,
    pub model_image: Option<PathBuf>,
    pub bottom_type: Option<String>,
    /// Name of an own or recommended preset to apply before generating.
    pub preset: Option<String>,
    /// Output path without extension.
    pub output: PathBuf,
}

impl RenderConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var               | Default   |
    /// |-----------------------|-----------|
    /// | `RENDER_CATEGORY`     | `men`     |
    /// | `RENDER_SUB_CATEGORY` | category default |
    /// | `RENDER_UPLOAD_TYPE`  | `parts`   |
    /// | `RENDER_IMAGES`       | required, comma-separated paths in slot order |
    /// | `RENDER_MODEL_IMAGE`  | unset     |
    /// | `RENDER_BOTTOM_TYPE`  | unset     |
    /// | `RENDER_PRESET`       | unset     |
    /// | `RENDER_OUTPUT`       | `render`  |
    pub fn from_env() -> anyhow::Result<Self> {
        let category = Category::parse(&env_or("RENDER_CATEGORY", "men"))
            .context("RENDER_CATEGORY")?;

        let upload_type = match env_or("RENDER_UPLOAD_TYPE", "parts").as_str() {
            "parts" => UploadType::Parts,
            "full" => UploadType::Full,
            other => anyhow::bail!("RENDER_UPLOAD_TYPE must be 'parts' or 'full', got '{other}'"),
        };

        let images = std::env::var("RENDER_IMAGES").context("RENDER_IMAGES must be set")?;
        let product_images = parse_image_list(&images);
        anyhow::ensure!(
            product_images.iter().any(Option::is_some),
            "RENDER_IMAGES must name at least one image"
        );

        Ok(Self {
            category,
            sub_category: env_opt("RENDER_SUB_CATEGORY"),
            upload_type,
            product_images,
            model_image: env_opt("RENDER_MODEL_IMAGE").map(PathBuf::from),
            bottom_type: env_opt("RENDER_BOTTOM_TYPE"),
            preset: env_opt("RENDER_PRESET"),
            output: PathBuf::from(env_or("RENDER_OUTPUT", "render")),
        })
    }
}

/// Split a comma-separated slot list. `top.png,,dupatta.png` leaves the
/// middle slot empty.
pub fn parse_image_list(value: &str) -> Vec<Option<PathBuf>> {
    value
        .split(',')
        .map(str::trim)
        .map(|p| (!p.is_empty()).then(|| PathBuf::from(p)))
        .collect()
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
