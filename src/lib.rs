pub mod accounts;
pub mod activity;
pub mod ai;
pub mod app;
pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod i18n;
pub mod metrics;
pub mod models;
pub mod orchestrator;
pub mod state;
pub mod storage;

pub use app::router;
pub use config::Config;
pub use orchestrator::CycleOutcome;
pub use state::{AppState, Timings};
pub use storage::LocalStorage;
