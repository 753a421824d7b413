//! HTTP API handlers for rfsc-an

pub mod analysis;
pub mod health;
pub mod upload;
pub mod views;

pub use analysis::analysis_routes;
pub use health::health_routes;
pub use upload::upload_routes;
pub use views::view_routes;
