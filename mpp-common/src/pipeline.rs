//! Scaler + model pair behind a single prediction call
//!
//! The pipeline owns both fitted artifacts and is the only way to turn a
//! [`FeatureRecord`] into a concentration estimate, so scaling can never be
//! skipped or applied twice. Construction is fallible and front-loads every
//! consistency check; a pipeline value in hand is always ready to serve.

use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::features::{FeatureRecord, FEATURE_COUNT, FEATURE_NAMES};
use crate::model::GradientBoostingModel;
use crate::scaler::StandardScaler;

/// Loaded scaler + model pair.
///
/// There is no "not yet initialized" state to observe: the constructors are
/// the only way to obtain a value, and both verify the artifacts agree with
/// each other and with [`FEATURE_NAMES`] before returning. Callers that
/// need shared access wrap the pipeline in an `Arc`; predictions take
/// `&self`.
#[derive(Debug, Clone)]
pub struct InferencePipeline {
    scaler: StandardScaler,
    model: GradientBoostingModel,
}

impl InferencePipeline {
    /// Pair already-loaded artifacts into a pipeline.
    ///
    /// Fails with `ArtifactLoad` when the scaler and model disagree on
    /// arity, when either disagrees with the fixed five-feature schema, or
    /// when the scaler's fitted column names differ from [`FEATURE_NAMES`]
    /// in content or order.
    pub fn from_artifacts(scaler: StandardScaler, model: GradientBoostingModel) -> Result<Self> {
        if scaler.n_features() != FEATURE_COUNT {
            return Err(Error::ArtifactLoad(format!(
                "scaler was fitted with {} features, expected {}",
                scaler.n_features(),
                FEATURE_COUNT
            )));
        }
        if model.n_features() != FEATURE_COUNT {
            return Err(Error::ArtifactLoad(format!(
                "model was trained with {} features, expected {}",
                model.n_features(),
                FEATURE_COUNT
            )));
        }
        for (i, (actual, expected)) in scaler
            .feature_names()
            .iter()
            .zip(FEATURE_NAMES.iter())
            .enumerate()
        {
            if actual != expected {
                return Err(Error::ArtifactLoad(format!(
                    "scaler column {} is {:?}, expected {:?}",
                    i, actual, expected
                )));
            }
        }
        Ok(Self { scaler, model })
    }

    /// Load both artifacts from disk and pair them.
    ///
    /// This is the startup entry point: any failure here means the process
    /// cannot serve predictions and should exit instead of listening.
    pub fn initialize(scaler_path: &Path, model_path: &Path) -> Result<Self> {
        let scaler = StandardScaler::load(scaler_path)?;
        let model = GradientBoostingModel::load(model_path)?;
        let pipeline = Self::from_artifacts(scaler, model)?;
        info!(
            "Inference pipeline ready: {} features, {} boosting stages",
            FEATURE_COUNT,
            pipeline.model.n_trees()
        );
        Ok(pipeline)
    }

    /// Produce a point estimate of microplastic concentration in
    /// particles/L for one set of readings.
    ///
    /// Scaling happens first and its failures surface as `Transform`;
    /// scoring failures surface as `Prediction`. Either leaves the
    /// pipeline untouched and fully usable for the next call.
    pub fn predict(&self, record: &FeatureRecord) -> Result<f64> {
        let scaled = self.scaler.transform(&record.to_vector())?;
        self.model.predict(&scaled)
    }

    /// Number of boosting stages in the loaded model
    pub fn n_trees(&self) -> usize {
        self.model.n_trees()
    }
}
