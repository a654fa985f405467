//! Risk tier derivation.
//!
//! A dataset gets a `Risk Level` column computed from `Predicted Churn Risk`
//! only when it has none or the one it has is entirely null. The check is per
//! column: a partially filled tier column is left as is, and its null cells
//! never match any tier afterwards.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::schema::{HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD, PREDICTED_CHURN_RISK, RISK_LEVEL};
use polars::prelude::*;
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskTier {
    High,
    Medium,
    Low,
}

impl RiskTier {
    /// `> 0.75` is High, `> 0.5` is Medium, anything else (NaN included) is Low.
    pub fn from_probability(probability: f64) -> Self {
        if probability > HIGH_RISK_THRESHOLD {
            RiskTier::High
        } else if probability > MEDIUM_RISK_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::High => "High",
            RiskTier::Medium => "Medium",
            RiskTier::Low => "Low",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True when the frame has no usable `Risk Level` column.
pub fn needs_risk_level(frame: &DataFrame) -> bool {
    match frame.column(RISK_LEVEL) {
        Ok(series) => series.null_count() == series.len(),
        Err(_) => true,
    }
}

/// Derive `Risk Level` if needed. Returns whether the column was written.
pub fn classify(dataset: &mut Dataset) -> Result<bool> {
    if !needs_risk_level(dataset.frame()) {
        debug!("'{}' already populated, skipping derivation", RISK_LEVEL);
        return Ok(false);
    }

    let probabilities = dataset
        .require_column(PREDICTED_CHURN_RISK)?
        .cast(&DataType::Float64)?;

    // Null probabilities classify as NaN does: Low.
    let tiers: StringChunked = probabilities
        .f64()?
        .into_iter()
        .map(|p| Some(RiskTier::from_probability(p.unwrap_or(f64::NAN)).as_str()))
        .collect();

    dataset
        .frame_mut()
        .with_column(tiers.with_name(RISK_LEVEL).into_series())?;

    info!(
        "Derived '{}' for {} rows from '{}'",
        RISK_LEVEL,
        dataset.height(),
        PREDICTED_CHURN_RISK
    );
    Ok(true)
}
