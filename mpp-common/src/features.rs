//! The fixed-schema feature record for one prediction request
//!
//! Field identity is positional *and* named: the column order below is the
//! order the scaler and model were fitted with, so the record, the scaler,
//! and the model are co-versioned. A swapped or reordered field produces a
//! numerically valid but semantically wrong prediction with no runtime
//! error, which is why the record is an explicit named struct rather than a
//! bare numeric array.

use serde::{Deserialize, Serialize};

/// Number of physicochemical input features
pub const FEATURE_COUNT: usize = 5;

/// Canonical training column names, in fitted order.
///
/// These are the exact column labels the artifacts were fitted against;
/// `StandardScaler` artifacts carry the same list and the pipeline verifies
/// the two match at load time.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Temperature (°C)",
    "pH",
    "DO(mg/L)",
    "CDC(µs/cm)",
    "Turbidity(NTUs)",
];

/// One river-water sample: the five readings used for a single prediction.
///
/// Created fresh per request and discarded after use; carries no state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Water temperature in °C
    pub temperature: f64,
    /// pH (dimensionless, 0-14 nominal)
    pub ph: f64,
    /// Dissolved oxygen in mg/L
    pub dissolved_oxygen: f64,
    /// Electrical conductivity in µS/cm
    pub conductivity: f64,
    /// Turbidity in NTU
    pub turbidity: f64,
}

impl FeatureRecord {
    /// Create a record from the five readings, in canonical order.
    pub fn new(
        temperature: f64,
        ph: f64,
        dissolved_oxygen: f64,
        conductivity: f64,
        turbidity: f64,
    ) -> Self {
        Self {
            temperature,
            ph,
            dissolved_oxygen,
            conductivity,
            turbidity,
        }
    }

    /// Column-ordered vector matching `FEATURE_NAMES`.
    ///
    /// This is the only place the named fields are flattened to positions;
    /// everything downstream (scaler, model) consumes the positional form.
    pub fn to_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.temperature,
            self.ph,
            self.dissolved_oxygen,
            self.conductivity,
            self.turbidity,
        ]
    }
}
