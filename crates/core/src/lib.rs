pub mod catalog;
pub mod category;
pub mod config_store;
pub mod derivation;
pub mod error;
pub mod generation;
pub mod history;
pub mod preset;
pub mod schema;
pub mod selection;
pub mod services;
pub mod types;
pub mod wizard;
