pub mod api;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod state;

// Re-export commonly used items
pub use api::{ApiClient, ApiError, FleetApi};
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use state::{DashboardState, Metric};
