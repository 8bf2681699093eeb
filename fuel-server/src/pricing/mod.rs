//! Persisted per-region fuel price models.
//!
//! Each pricing region has a linear price trend fitted offline. The
//! trends are stored together in one JSON file and loaded once at startup:
//!
//! ```json
//! {
//!   "models": {
//!     "1a": { "intercept": 2.95, "slope_per_day": 0.0008, "epoch": "2021-01-01" },
//!     "5":  { "intercept": 3.75, "slope_per_day": 0.0009, "epoch": "2021-01-01" }
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::{DomainError, RegionId};
use crate::pipeline::{PriceError, PriceEstimator};

/// Errors loading price models.
#[derive(Debug, thiserror::Error)]
pub enum PriceModelError {
    /// Model file could not be read
    #[error("failed to read price models from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Model file is not valid JSON of the expected shape
    #[error("invalid price model JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A model is keyed by something other than a pricing region code
    #[error("invalid price model region: {0}")]
    Region(#[from] DomainError),

    /// A pricing region has no model
    #[error("no price model for region {0}")]
    MissingRegion(RegionId),

    /// A model was given for the unresolved sentinel
    #[error("price models cannot cover the unresolved region")]
    UnresolvedModel,
}

/// Linear price trend: `intercept + slope_per_day * days since epoch`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LinearTrend {
    /// Price on the epoch date.
    pub intercept: f64,

    /// Price change per day.
    pub slope_per_day: f64,

    /// Day zero of the trend.
    pub epoch: NaiveDate,
}

impl LinearTrend {
    /// Predicted price on `date`, floored at zero.
    pub fn predict(&self, date: NaiveDate) -> f64 {
        let days = (date - self.epoch).num_days() as f64;
        (self.intercept + self.slope_per_day * days).max(0.0)
    }
}

#[derive(Debug, Deserialize)]
struct ModelFile {
    /// Keyed by region code; codes are case-insensitive.
    models: HashMap<String, LinearTrend>,
}

/// Price models for every pricing region.
#[derive(Debug, Clone)]
pub struct PriceModels {
    models: HashMap<RegionId, LinearTrend>,
}

impl PriceModels {
    /// Build from a complete set of models.
    ///
    /// Every region in [`RegionId::PRICED`] must have a model.
    pub fn new(models: HashMap<RegionId, LinearTrend>) -> Result<Self, PriceModelError> {
        if models.contains_key(&RegionId::Unresolved) {
            return Err(PriceModelError::UnresolvedModel);
        }
        if let Some(missing) = RegionId::PRICED
            .into_iter()
            .find(|r| !models.contains_key(r))
        {
            return Err(PriceModelError::MissingRegion(missing));
        }

        Ok(Self { models })
    }

    /// Parse a model file's contents.
    pub fn from_json(json: &str) -> Result<Self, PriceModelError> {
        let file: ModelFile = serde_json::from_str(json)?;
        let models = file
            .models
            .into_iter()
            .map(|(code, trend)| RegionId::parse(&code).map(|region| (region, trend)))
            .collect::<Result<HashMap<_, _>, DomainError>>()?;
        Self::new(models)
    }

    /// Load a model file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PriceModelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| PriceModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl PriceEstimator for PriceModels {
    fn price(&self, region: RegionId, date: NaiveDate) -> Result<f64, PriceError> {
        self.models
            .get(&region)
            .map(|trend| trend.predict(date))
            .ok_or(PriceError::NoModel(region))
    }
}
