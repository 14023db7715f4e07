//! Cross-entity views of a dataset: a one-month regional snapshot and a mean trend line.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::YearRange;
use crate::error::{CoreError, Result};
use crate::models::Dataset;
use crate::utils::maths_utils::mean_present;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RegionalAverage {
    pub entity: String,
    pub value: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub month: NaiveDate,
    pub mean: f64,
    /// Entities contributing a value to this month
    pub entities: usize,
}

/// Mean value of every entity for `year`-`month`, sorted by entity.
/// Entities with no value, or a non-positive one, are left out.
pub fn regional_snapshot(dataset: &Dataset, year: i32, month: u32) -> Result<Vec<RegionalAverage>> {
    let snapshot: Vec<RegionalAverage> = dataset
        .series
        .values()
        .filter_map(|series| {
            let value = series.value_at(year, month)?;
            (value.is_finite() && value > 0.0).then(|| RegionalAverage {
                entity: series.entity.clone(),
                value,
            })
        })
        .collect();

    if snapshot.is_empty() {
        return Err(CoreError::Selection(format!(
            "no {} values recorded for {}-{:02}",
            dataset.domain, year, month
        )));
    }
    Ok(snapshot)
}

/// Per-month mean across entities of the values present inside `window`.
pub fn national_trend(dataset: &Dataset, window: YearRange) -> Vec<TrendPoint> {
    let mut by_month: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();
    for series in dataset.series.values() {
        for (month, value) in series.months.iter().zip(series.values.iter()) {
            if window.contains(*month) && value.is_some_and(|v| v.is_finite()) {
                by_month.entry(*month).or_default().push(*value);
            }
        }
    }

    by_month
        .into_iter()
        .filter_map(|(month, values)| {
            Some(TrendPoint {
                month,
                mean: mean_present(&values)?,
                entities: values.len(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;
    use crate::models::RawSeries;
    use crate::utils::time_utils::month_start;

    fn ym(year: i32, month: u32) -> NaiveDate {
        month_start(year, month).unwrap()
    }

    fn dataset() -> Dataset {
        Dataset::new(
            Domain::Oil,
            vec![
                RawSeries::from_observations(
                    "Alberta",
                    vec![(ym(1989, 12), Some(50.0)), (ym(2020, 1), Some(100.0))],
                ),
                RawSeries::from_observations(
                    "Quebec",
                    vec![(ym(2020, 1), Some(140.0)), (ym(2020, 2), None)],
                ),
                RawSeries::from_observations("Nunavut", vec![(ym(2020, 1), Some(0.0))]),
            ],
        )
    }

    #[test]
    fn test_snapshot_drops_missing_and_non_positive() {
        let snapshot = regional_snapshot(&dataset(), 2020, 1).unwrap();
        let entities: Vec<&str> = snapshot.iter().map(|r| r.entity.as_str()).collect();
        assert_eq!(entities, vec!["Alberta", "Quebec"]);
        assert_eq!(snapshot[1].value, 140.0);
    }

    #[test]
    fn test_empty_snapshot_is_selection_error() {
        assert!(matches!(
            regional_snapshot(&dataset(), 2020, 2),
            Err(CoreError::Selection(_))
        ));
    }

    #[test]
    fn test_national_trend_window() {
        let window = YearRange {
            from: Some(1990),
            to: Some(2024),
        };
        let trend = national_trend(&dataset(), window);
        // 1989 is outside the window and Feb 2020 has no present value
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].month, ym(2020, 1));
        assert_eq!(trend[0].entities, 3);
        assert!((trend[0].mean - 80.0).abs() < 1e-9);
    }
}
