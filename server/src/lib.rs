pub mod app;
pub mod config;

pub use app::{AppState, Stores, router};
pub use config::AppConfig;
