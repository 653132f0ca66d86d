//! Callbacks from the wizard into its embedding application.

use serde::{Deserialize, Serialize};

/// Pages outside the wizard the controller can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Gallery,
    Pricing,
    Login,
}

/// Implemented by whatever hosts the wizard (UI shell, CLI, tests).
///
/// Callbacks are synchronous and must not block.
pub trait WizardHost: Send + Sync {
    fn on_credits_update(&self, balance: i64);

    fn on_navigate(&self, page: Page);

    fn on_session_expired(&self);
}

/// Host that ignores every callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl WizardHost for NoopHost {
    fn on_credits_update(&self, _balance: i64) {}

    fn on_navigate(&self, _page: Page) {}

    fn on_session_expired(&self) {}
}
