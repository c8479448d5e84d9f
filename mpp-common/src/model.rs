//! Pre-trained gradient boosting regressor loaded from a JSON artifact
//!
//! The artifact is a flat export of an sklearn `GradientBoostingRegressor`:
//! each tree is five parallel arrays in preorder (a node's children always
//! sit at higher indices), a negative `feature` entry marks a leaf, and the
//! ensemble score is `init_prediction + learning_rate * sum(tree scores)`.
//! Regression output is the raw score; there is no link function.
//!
//! All structural checks run at load time so `predict` can walk the arrays
//! without per-node bounds failures mid-request.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Artifact format version this build can deserialize
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// One regression tree as parallel node arrays.
///
/// `feature[i] < 0` marks node `i` as a leaf scoring `value[i]`; otherwise
/// the walk continues at `left[i]` when `x[feature[i]] <= threshold[i]`
/// and at `right[i]` when it is greater.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    feature: Vec<i32>,
    threshold: Vec<f64>,
    left: Vec<i32>,
    right: Vec<i32>,
    value: Vec<f64>,
}

impl RegressionTree {
    /// Build a tree directly from its node arrays.
    ///
    /// Structural validation happens when the tree joins an ensemble; a
    /// bare tree is inert until then.
    pub fn from_arrays(
        feature: Vec<i32>,
        threshold: Vec<f64>,
        left: Vec<i32>,
        right: Vec<i32>,
        value: Vec<f64>,
    ) -> Self {
        Self {
            feature,
            threshold,
            left,
            right,
            value,
        }
    }

    fn check(&self, tree_index: usize, n_features: usize) -> Result<()> {
        let len = self.feature.len();
        if len == 0 {
            return Err(Error::ArtifactLoad(format!(
                "model tree {} has no nodes",
                tree_index
            )));
        }
        if self.threshold.len() != len
            || self.left.len() != len
            || self.right.len() != len
            || self.value.len() != len
        {
            return Err(Error::ArtifactLoad(format!(
                "model tree {} node arrays have mismatched lengths",
                tree_index
            )));
        }
        for i in 0..len {
            if !self.value[i].is_finite() {
                return Err(Error::ArtifactLoad(format!(
                    "model tree {} node {} has a non-finite value",
                    tree_index, i
                )));
            }
            if self.feature[i] < 0 {
                continue;
            }
            if self.feature[i] as usize >= n_features {
                return Err(Error::ArtifactLoad(format!(
                    "model tree {} node {} splits on feature {} but the model has {} features",
                    tree_index, i, self.feature[i], n_features
                )));
            }
            if !self.threshold[i].is_finite() {
                return Err(Error::ArtifactLoad(format!(
                    "model tree {} node {} has a non-finite threshold",
                    tree_index, i
                )));
            }
            // Preorder export: children always sit after their parent, which
            // bounds every walk at `len` steps.
            for &child in [self.left[i], self.right[i]].iter() {
                if (child as i64) <= i as i64 || (child as i64) >= len as i64 {
                    return Err(Error::ArtifactLoad(format!(
                        "model tree {} node {} references child {} outside ({}, {})",
                        tree_index, i, child, i, len
                    )));
                }
            }
        }
        Ok(())
    }

    fn score(&self, features: &[f64]) -> f64 {
        let mut node = 0usize;
        loop {
            let feature = self.feature[node];
            if feature < 0 {
                return self.value[node];
            }
            node = if features[feature as usize] <= self.threshold[node] {
                self.left[node] as usize
            } else {
                self.right[node] as usize
            };
        }
    }
}

/// Fitted gradient boosting ensemble.
///
/// Immutable after load; `predict` takes `&self` and is safe to call from
/// many requests concurrently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingModel {
    format_version: u32,
    n_features: usize,
    init_prediction: f64,
    learning_rate: f64,
    trees: Vec<RegressionTree>,
}

impl GradientBoostingModel {
    /// Build an ensemble from its fitted parts.
    ///
    /// Fails with `ArtifactLoad` when any structural invariant does not
    /// hold: zero features, non-finite constants, an empty tree list, or a
    /// malformed tree.
    pub fn from_parts(
        n_features: usize,
        init_prediction: f64,
        learning_rate: f64,
        trees: Vec<RegressionTree>,
    ) -> Result<Self> {
        let model = Self {
            format_version: MODEL_FORMAT_VERSION,
            n_features,
            init_prediction,
            learning_rate,
            trees,
        };
        model.validate()?;
        Ok(model)
    }

    /// Deserialize a model artifact from its JSON export.
    pub fn from_json(json: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(json)
            .map_err(|e| Error::ArtifactLoad(format!("model artifact is not valid JSON: {}", e)))?;
        model.validate()?;
        Ok(model)
    }

    /// Load a model artifact from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::ArtifactLoad(format!("cannot read model artifact {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<()> {
        if self.format_version != MODEL_FORMAT_VERSION {
            return Err(Error::ArtifactLoad(format!(
                "unsupported model format version {} (expected {})",
                self.format_version, MODEL_FORMAT_VERSION
            )));
        }
        if self.n_features == 0 {
            return Err(Error::ArtifactLoad(
                "model declares zero features".to_string(),
            ));
        }
        if !self.init_prediction.is_finite() || !self.learning_rate.is_finite() {
            return Err(Error::ArtifactLoad(
                "model constants are not finite".to_string(),
            ));
        }
        if self.trees.is_empty() {
            return Err(Error::ArtifactLoad("model has no trees".to_string()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.check(i, self.n_features)?;
        }
        Ok(())
    }

    /// Score one already-scaled sample.
    ///
    /// Rejects with `Prediction` when the arity differs from the trained
    /// arity or when the accumulated score degenerates to a non-finite
    /// number.
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.n_features {
            return Err(Error::Prediction(format!(
                "expected {} features, got {}",
                self.n_features,
                features.len()
            )));
        }
        let mut score = self.init_prediction;
        for tree in &self.trees {
            score += self.learning_rate * tree.score(features);
        }
        if !score.is_finite() {
            return Err(Error::Prediction(
                "model produced a non-finite score".to_string(),
            ));
        }
        Ok(score)
    }

    /// Number of features the model was trained with
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of boosting stages in the ensemble
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}
