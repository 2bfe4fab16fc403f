pub mod alarms;
pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod generator;
pub mod models;
pub mod registry;
pub mod reports;
pub mod store;

pub use config::Config;
pub use error::{AppError, Result};
pub use generator::TelemetryGenerator;
pub use registry::AssetRegistry;
pub use store::TelemetryStore;
