//! HTTP API handlers for mpp-ps

pub mod buildinfo;
pub mod health;
pub mod predict;
pub mod ui;

pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use predict::predict;
pub use ui::{serve_app_js, serve_index};
