//! Headless wizard run: configure from a [`RenderConfig`], optionally apply a
//! preset, walk the three steps and write the generated image to disk.

pub mod config;
pub mod images;

use std::path::PathBuf;

use anyhow::Context;

use atelier_wizard::{GenerationOutcome, Page, WizardController, WizardHost, WizardServices};

pub use config::RenderConfig;

/// Host that reports callbacks through `tracing`.
#[derive(Debug, Default)]
pub struct LogHost;

impl WizardHost for LogHost {
    fn on_credits_update(&self, balance: i64) {
        tracing::info!(balance, "Credit balance updated");
    }

    fn on_navigate(&self, page: Page) {
        tracing::debug!(?page, "Navigation requested");
    }

    fn on_session_expired(&self) {
        tracing::error!("Session expired; refresh STUDIO_API_TOKEN");
    }
}

/// Result of one render.
#[derive(Debug)]
pub struct RenderReport {
    pub path: PathBuf,
    pub credits_used: i64,
    pub credits_remaining: Option<i64>,
}

/// Run the wizard once with `config`.
pub async fn render(config: &RenderConfig, services: WizardServices) -> anyhow::Result<RenderReport> {
    let mut wizard = WizardController::new(config.category, services);

    if let Some(name) = &config.preset {
        wizard.refresh_presets().await?;
        let id = find_preset_id(&wizard, name)
            .with_context(|| format!("no preset named '{name}' for {}", config.category))?;
        wizard.apply_preset_by_id(&id)?;
        tracing::info!(preset = %name, "Preset applied");
    }

    // Explicit settings win over the preset.
    if let Some(sub) = &config.sub_category {
        wizard.set_sub_category(sub)?;
    }
    wizard.set_upload_type(config.upload_type)?;

    if let Some(path) = &config.model_image {
        wizard.set_use_custom_model(true)?;
        wizard.set_custom_model_image(Some(images::load_data_url(path).await?))?;
    }

    for (index, path) in config.product_images.iter().enumerate() {
        if let Some(path) = path {
            let image = images::load_data_url(path).await?;
            wizard
                .set_product_image(index, Some(image))
                .with_context(|| format!("placing {}", path.display()))?;
        }
    }

    if let Some(bottom) = &config.bottom_type {
        wizard.set_bottom_type(Some(bottom.as_str()))?;
    }

    anyhow::ensure!(
        wizard.can_proceed(),
        "product step incomplete: fill every required slot{}",
        if wizard.shows_bottom_selector() {
            " or set RENDER_BOTTOM_TYPE"
        } else {
            ""
        }
    );
    wizard.next()?;
    wizard.next()?;

    let output = match wizard.generate().await? {
        GenerationOutcome::Completed(output) => output,
        GenerationOutcome::Discarded => anyhow::bail!("generation result was discarded"),
    };

    let path = images::write_output(&output, &config.output).await?;
    Ok(RenderReport {
        path,
        credits_used: output.credits_used,
        credits_remaining: output.credits_remaining,
    })
}

/// Own presets shadow recommended ones with the same name.
fn find_preset_id(wizard: &WizardController, name: &str) -> Option<String> {
    let listing = wizard.presets();
    listing
        .own
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .and_then(|p| p.id.clone())
        .or_else(|| {
            listing
                .recommended
                .iter()
                .find(|r| r.name.eq_ignore_ascii_case(name))
                .map(|r| r.id.clone())
        })
}
