//! # MPP Common Library
//!
//! Shared code for the MPP (Microplastic Prediction, Penang) services:
//! - Error taxonomy (startup-tier vs request-tier failures)
//! - Artifact folder resolution and configuration loading
//! - The fixed-schema feature record for one water sample
//! - Fitted artifact types (standard scaler, gradient-boosting regressor)
//! - The load-once inference pipeline

pub mod config;
pub mod error;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod scaler;

pub use error::{Error, Result};
pub use features::{FeatureRecord, FEATURE_COUNT, FEATURE_NAMES};
pub use model::GradientBoostingModel;
pub use pipeline::InferencePipeline;
pub use scaler::StandardScaler;
