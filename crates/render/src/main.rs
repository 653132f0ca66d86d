use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atelier_client::{ClientConfig, HttpStudioClient};
use atelier_render::{render, LogHost, RenderConfig};
use atelier_wizard::cache::{CacheBackend, JsonFileBackend, MemoryBackend, PresetCache};
use atelier_wizard::config::WizardConfig;
use atelier_wizard::poller::CreditsPoller;
use atelier_wizard::WizardServices;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "atelier_render=debug,atelier_wizard=debug,atelier_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client_config = ClientConfig::from_env()?;
    let wizard_config = WizardConfig::from_env();
    let render_config = RenderConfig::from_env()?;

    tracing::info!(
        api = %client_config.base_url,
        category = %render_config.category,
        "Render starting"
    );

    let client = Arc::new(HttpStudioClient::new(&client_config).context("building HTTP client")?);

    let backend: Arc<dyn CacheBackend> = match &wizard_config.preset_cache_path {
        Some(path) => Arc::new(JsonFileBackend::new(path)),
        None => Arc::new(MemoryBackend::new()),
    };
    let cache = Arc::new(PresetCache::open(backend).await);

    let shutdown = CancellationToken::new();
    let poller = CreditsPoller::spawn(
        client.clone(),
        wizard_config.credits_poll_interval,
        shutdown.child_token(),
    );

    let services = WizardServices {
        presets: client.clone(),
        backend: client.clone(),
        host: Arc::new(LogHost),
        cache: Some(cache),
    };

    let result = tokio::select! {
        result = render(&render_config, services) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, cancelling");
            Err(anyhow::anyhow!("interrupted"))
        }
    };

    shutdown.cancel();
    if let Some(balance) = poller.latest() {
        tracing::debug!(balance, "Last polled balance");
    }
    poller.shutdown().await;

    let report = result?;
    tracing::info!(
        path = %report.path.display(),
        credits_used = report.credits_used,
        credits_remaining = ?report.credits_remaining,
        "Render complete"
    );
    println!("{}", report.path.display());
    Ok(())
}
