//! Series cleaning: pure transformations from a `RawSeries` to a model-ready `TimeSeries`.
//!
//! Two missing-value policies exist and are kept distinct:
//! - forward/backward fill for strictly temporal series (propagate the last known value,
//!   then back-fill any leading gap),
//! - mean fill for point-estimate columns such as listing prices.
//!
//! Nothing here mutates caller-owned data.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::error::{CoreError, Result};
use crate::models::{RawSeries, TimeSeries};
use crate::utils::maths_utils::mean_present;

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum FillPolicy {
    ForwardBackward,
    Mean,
}

/// Inclusive year window; either end may be open.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct YearRange {
    pub from: Option<i32>,
    pub to: Option<i32>,
}

impl YearRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        let year = date.year();
        self.from.is_none_or(|from| year >= from) && self.to.is_none_or(|to| year <= to)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CleanPolicy {
    pub fill: FillPolicy,
    /// Applied before filling, so out-of-range values never leak into the fill
    pub date_range: Option<YearRange>,
    /// Drop non-positive and non-finite values after filling
    pub positive_only: bool,
    pub min_observations: usize,
}

fn is_present(value: &Option<f64>) -> bool {
    value.is_some_and(|v| v.is_finite())
}

/// Propagate the last known value forward, then fill any leading gap backwards
/// from the first known value. A series with no known value is returned unchanged.
pub fn forward_backward_fill(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut filled = Vec::with_capacity(values.len());
    let mut last_known: Option<f64> = None;
    for value in values {
        if is_present(value) {
            last_known = *value;
        }
        filled.push(last_known);
    }

    if let Some(first_known) = values.iter().copied().find(is_present) {
        for slot in filled.iter_mut().take_while(|v| v.is_none()) {
            *slot = first_known;
        }
    }
    filled
}

/// Replace every missing value by the mean of the present ones.
pub fn mean_fill(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let Some(column_mean) = mean_present(values) else {
        return values.iter().map(|v| v.filter(|x| x.is_finite())).collect();
    };
    values
        .iter()
        .map(|v| if is_present(v) { *v } else { Some(column_mean) })
        .collect()
}

pub fn fill_missing(values: &[Option<f64>], policy: FillPolicy) -> Vec<Option<f64>> {
    match policy {
        FillPolicy::ForwardBackward => forward_backward_fill(values),
        FillPolicy::Mean => mean_fill(values),
    }
}

/// Clean one entity's series: date filter, fill, drop what is still unusable, then check
/// there is enough left to model.
pub fn clean(series: &RawSeries, policy: &CleanPolicy) -> Result<TimeSeries> {
    let (months, values): (Vec<NaiveDate>, Vec<Option<f64>>) = series
        .months
        .iter()
        .zip(series.values.iter())
        .filter(|(month, _)| policy.date_range.is_none_or(|range| range.contains(**month)))
        .map(|(month, value)| (*month, *value))
        .unzip();

    let filled = fill_missing(&values, policy.fill);

    let (kept_months, kept_values): (Vec<NaiveDate>, Vec<f64>) = months
        .into_iter()
        .zip(filled)
        .filter_map(|(month, value)| value.map(|v| (month, v)))
        .filter(|(_, v)| v.is_finite() && (!policy.positive_only || *v > 0.0))
        .unzip();

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_clean_summary {
        log::info!(
            "Cleaned {}: {} raw points ({} present) -> {} usable",
            series.entity,
            series.len(),
            series.present_count(),
            kept_values.len()
        );
    }

    if kept_values.len() < policy.min_observations {
        return Err(CoreError::InsufficientData {
            required: policy.min_observations,
            actual: kept_values.len(),
        });
    }

    TimeSeries::new(series.entity.clone(), kept_months, kept_values)
}
