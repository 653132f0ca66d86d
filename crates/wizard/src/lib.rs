//! Async wizard runtime: the controller driving the configuration engine,
//! preset library and cache, and the background credits poller.

pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod library;
pub mod poller;

pub use controller::{
    CancelHandle, GenerationAttempt, GenerationOutcome, GenerationStatus, GenerationTicket,
    WizardController, WizardServices,
};
pub use error::{classify, WizardError};
pub use host::{NoopHost, Page, WizardHost};
