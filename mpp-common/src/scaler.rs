//! Fitted standard-score scaler loaded from a JSON artifact
//!
//! The scaler is exported by the training pipeline (sklearn
//! `StandardScaler`: `mean_` and `scale_` per column) and is inference-only
//! here: loaded once, never refitted, never written back. The artifact
//! carries the column names it was fitted with so a reordered or renamed
//! export is caught at load time instead of silently desyncing from the
//! model.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Artifact format version this build can deserialize
pub const SCALER_FORMAT_VERSION: u32 = 1;

/// Per-feature shift/scale statistics fitted on the training distribution.
///
/// Immutable after load; `transform` takes `&self` and holds no per-call
/// state, so one loaded scaler may serve arbitrarily many concurrent
/// requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    format_version: u32,
    feature_names: Vec<String>,
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Build a scaler from already-fitted statistics.
    ///
    /// Fails with `ArtifactLoad` if the arrays are inconsistent, any
    /// statistic is non-finite, or any scale entry is zero.
    pub fn from_parts(
        feature_names: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    ) -> Result<Self> {
        let scaler = Self {
            format_version: SCALER_FORMAT_VERSION,
            feature_names,
            mean,
            scale,
        };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Deserialize a scaler artifact from its JSON export.
    pub fn from_json(json: &str) -> Result<Self> {
        let scaler: Self = serde_json::from_str(json)
            .map_err(|e| Error::ArtifactLoad(format!("scaler artifact is not valid JSON: {}", e)))?;
        scaler.validate()?;
        Ok(scaler)
    }

    /// Load a scaler artifact from disk.
    ///
    /// A missing or unreadable file is an `ArtifactLoad` failure: without
    /// the fitted statistics no prediction can be served.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::ArtifactLoad(format!("cannot read scaler artifact {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<()> {
        if self.format_version != SCALER_FORMAT_VERSION {
            return Err(Error::ArtifactLoad(format!(
                "unsupported scaler format version {} (expected {})",
                self.format_version, SCALER_FORMAT_VERSION
            )));
        }
        let n = self.feature_names.len();
        if n == 0 {
            return Err(Error::ArtifactLoad("scaler has no features".to_string()));
        }
        if self.mean.len() != n || self.scale.len() != n {
            return Err(Error::ArtifactLoad(format!(
                "scaler arrays are inconsistent: {} names, {} means, {} scales",
                n,
                self.mean.len(),
                self.scale.len()
            )));
        }
        for (i, (&m, &s)) in self.mean.iter().zip(&self.scale).enumerate() {
            if !m.is_finite() || !s.is_finite() {
                return Err(Error::ArtifactLoad(format!(
                    "scaler statistics for {:?} are not finite",
                    self.feature_names[i]
                )));
            }
            if s == 0.0 {
                return Err(Error::ArtifactLoad(format!(
                    "scaler scale for {:?} is zero",
                    self.feature_names[i]
                )));
            }
        }
        Ok(())
    }

    /// Normalize one raw sample: `(x[i] - mean[i]) / scale[i]`.
    ///
    /// Rejects with `Transform` when the arity differs from the fitted
    /// arity (never truncates or pads) or when any input is non-finite.
    /// Any finite value is accepted as-is — no clamping, no range checks.
    pub fn transform(&self, raw: &[f64]) -> Result<Vec<f64>> {
        if raw.len() != self.mean.len() {
            return Err(Error::Transform(format!(
                "expected {} features, got {}",
                self.mean.len(),
                raw.len()
            )));
        }
        for (i, &x) in raw.iter().enumerate() {
            if !x.is_finite() {
                return Err(Error::Transform(format!(
                    "value for {:?} is not a finite number",
                    self.feature_names[i]
                )));
            }
        }
        Ok(raw
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&x, (&m, &s))| (x - m) / s)
            .collect())
    }

    /// Number of features the scaler was fitted with
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Column names the scaler was fitted with, in fitted order
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}
