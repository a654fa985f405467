//! Canned computations over a dataset snapshot.
//!
//! Each function looks its columns up through [`Dataset::require_column`]
//! and so fails with `MissingColumn` rather than a raw polars error. Callers
//! that want to degrade gracefully check [`Dataset::has_column`] first.
//!
//! Tier and churn-flag columns are compared as text, so a column inferred
//! with another type simply matches nothing.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::risk::RiskTier;
use crate::schema::{ACTUAL_CHURN, CHURNED, PREDICTED_CHURN_RISK, RISK_LEVEL};
use crate::view::Bar;
use polars::prelude::*;

const COUNT_ALIAS: &str = "__count";
const TOTAL_ALIAS: &str = "__total";
const CHURNED_ALIAS: &str = "__churned";
const RATE_ALIAS: &str = "__rate";

fn tier_is(tier: RiskTier) -> Expr {
    col(RISK_LEVEL).cast(DataType::String).eq(lit(tier.as_str()))
}

fn churn_flag_is(flag: &str) -> Expr {
    col(ACTUAL_CHURN).cast(DataType::String).eq(lit(flag))
}

/// Rows of one tier in original order, at most `limit`.
pub fn rows_in_tier(dataset: &Dataset, tier: RiskTier, limit: usize) -> Result<DataFrame> {
    dataset.require_column(RISK_LEVEL)?;
    let rows = dataset
        .frame()
        .clone()
        .lazy()
        .filter(tier_is(tier))
        .collect()?;
    Ok(rows.head(Some(limit)))
}

pub fn count_in_tier(dataset: &Dataset, tier: RiskTier) -> Result<usize> {
    dataset.require_column(RISK_LEVEL)?;
    count_where(dataset, tier_is(tier))
}

/// Rows whose churn flag equals `flag` ("Yes" or "No").
pub fn count_with_churn(dataset: &Dataset, flag: &str) -> Result<usize> {
    dataset.require_column(ACTUAL_CHURN)?;
    count_where(dataset, churn_flag_is(flag))
}

/// Mean churn probability; `None` when there are no non-null values.
pub fn mean_probability(dataset: &Dataset) -> Result<Option<f64>> {
    let probabilities = dataset
        .require_column(PREDICTED_CHURN_RISK)?
        .cast(&DataType::Float64)?;
    Ok(probabilities.mean())
}

/// Count of churned rows per distinct value of `column`, keys ascending,
/// null keys dropped.
pub fn churned_counts_by(dataset: &Dataset, column: &str) -> Result<Vec<Bar>> {
    dataset.require_column(ACTUAL_CHURN)?;
    dataset.require_column(column)?;

    let grouped = dataset
        .frame()
        .clone()
        .lazy()
        .filter(
            churn_flag_is(CHURNED).and(col(column).is_not_null()),
        )
        .group_by([col(column)])
        .agg([len().alias(COUNT_ALIAS)])
        .sort_by_exprs([col(column)], SortMultipleOptions::default())
        .collect()?;

    bars_from(&grouped, column, COUNT_ALIAS)
}

/// Churned / total per distinct value of `column`. Groups without any churned
/// row report 0.
pub fn churn_rate_by(dataset: &Dataset, column: &str) -> Result<Vec<Bar>> {
    dataset.require_column(ACTUAL_CHURN)?;
    dataset.require_column(column)?;

    let grouped = dataset
        .frame()
        .clone()
        .lazy()
        .filter(col(column).is_not_null())
        .group_by([col(column)])
        .agg([
            len().cast(DataType::Float64).alias(TOTAL_ALIAS),
            churn_flag_is(CHURNED)
                .cast(DataType::Float64)
                .sum()
                .alias(CHURNED_ALIAS),
        ])
        .with_column(
            (col(CHURNED_ALIAS) / col(TOTAL_ALIAS))
                .fill_null(lit(0.0))
                .alias(RATE_ALIAS),
        )
        .sort_by_exprs([col(column)], SortMultipleOptions::default())
        .collect()?;

    bars_from(&grouped, column, RATE_ALIAS)
}

/// The `limit` rows with the highest probability. Ties keep their original
/// order; null probabilities sort last.
pub fn top_by_probability(dataset: &Dataset, limit: usize) -> Result<DataFrame> {
    dataset.require_column(PREDICTED_CHURN_RISK)?;
    let sorted = dataset
        .frame()
        .clone()
        .lazy()
        .sort_by_exprs(
            [col(PREDICTED_CHURN_RISK)],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_nulls_last(true)
                .with_maintain_order(true),
        )
        .collect()?;
    Ok(sorted.head(Some(limit)))
}

fn count_where(dataset: &Dataset, predicate: Expr) -> Result<usize> {
    let matched = dataset.frame().clone().lazy().filter(predicate).collect()?;
    Ok(matched.height())
}

fn bars_from(frame: &DataFrame, key: &str, value: &str) -> Result<Vec<Bar>> {
    let labels = frame.column(key)?.cast(&DataType::String)?;
    let values = frame.column(value)?.cast(&DataType::Float64)?;

    let bars = labels
        .str()?
        .into_iter()
        .zip(values.f64()?.into_iter())
        .map(|(label, value)| Bar {
            label: label.unwrap_or_default().to_string(),
            value: value.unwrap_or(0.0),
        })
        .collect();
    Ok(bars)
}
