//! Common error types for MPP

use thiserror::Error;

/// Common result type for MPP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared across the MPP services.
///
/// Two tiers: `ArtifactLoad` is startup-tier and fatal (the serving surface
/// must not come up without both fitted artifacts), while `Transform` and
/// `Prediction` pertain to a single request and leave the loaded pipeline
/// untouched.
#[derive(Error, Debug)]
pub enum Error {
    /// Artifact missing, unreadable, corrupt, or incompatible with the
    /// expected feature schema
    #[error("Artifact load error: {0}")]
    ArtifactLoad(String),

    /// Input rejected by the fitted scaler (wrong arity or non-finite value)
    #[error("Transform error: {0}")]
    Transform(String),

    /// Normalized record rejected by the fitted model
    #[error("Prediction error: {0}")]
    Prediction(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
