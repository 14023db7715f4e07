use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::holt_winters::SmoothingParams;
use crate::domain::Domain;
use crate::error::{CoreError, Result};
use crate::utils::maths_utils::mean_present;
use crate::utils::time_utils::{first_of_month, month_start};

// ============================================================================
// RawSeries: one entity's monthly observations as loaded, gaps included
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RawSeries {
    pub entity: String,
    // Parallel vectors, months strictly increasing
    pub months: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

impl RawSeries {
    /// Build from unordered observations. Dates are normalized to their month, the result
    /// is sorted, and observations sharing a month are averaged (missing if none present).
    pub fn from_observations(
        entity: impl Into<String>,
        observations: Vec<(NaiveDate, Option<f64>)>,
    ) -> Self {
        let mut by_month: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();
        for (date, value) in observations {
            by_month
                .entry(first_of_month(date))
                .or_default()
                .push(value);
        }

        let (months, values) = by_month
            .into_iter()
            .map(|(month, values)| (month, mean_present(&values)))
            .unzip();

        Self {
            entity: entity.into(),
            months,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn present_count(&self) -> usize {
        self.values.iter().flatten().count()
    }

    /// Value recorded for `year`-`month`, if there is one
    pub fn value_at(&self, year: i32, month: u32) -> Option<f64> {
        let target = month_start(year, month)?;
        let idx = self.months.binary_search(&target).ok()?;
        self.values[idx]
    }
}

impl From<&TimeSeries> for RawSeries {
    fn from(series: &TimeSeries) -> Self {
        Self {
            entity: series.entity.clone(),
            months: series.months.clone(),
            values: series.values.iter().map(|&v| Some(v)).collect(),
        }
    }
}

// ============================================================================
// TimeSeries: cleaned, gap-free values ready for modeling
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub entity: String,
    pub months: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl TimeSeries {
    /// Checked constructor: equal lengths and strictly increasing months.
    pub fn new(entity: impl Into<String>, months: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        let entity = entity.into();
        if months.len() != values.len() {
            return Err(CoreError::InvalidSeries(format!(
                "{}: {} months but {} values",
                entity,
                months.len(),
                values.len()
            )));
        }
        if let Some(pos) = months.windows(2).position(|w| w[0] >= w[1]) {
            return Err(CoreError::InvalidSeries(format!(
                "{}: months not strictly increasing at position {} ({} then {})",
                entity,
                pos,
                months[pos],
                months[pos + 1]
            )));
        }
        Ok(Self {
            entity,
            months,
            values,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last_month(&self) -> Option<NaiveDate> {
        self.months.last().copied()
    }

    pub fn last_value(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

// ============================================================================
// Dataset: every entity of one domain, loaded fresh for each request
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Dataset {
    pub domain: Domain,
    // BTreeMap keeps entities sorted and unique
    pub series: BTreeMap<String, RawSeries>,
}

impl Dataset {
    pub fn new(domain: Domain, series: impl IntoIterator<Item = RawSeries>) -> Self {
        Self {
            domain,
            series: series
                .into_iter()
                .map(|s| (s.entity.clone(), s))
                .collect(),
        }
    }

    pub fn entities(&self) -> Vec<&str> {
        self.series.keys().map(|k| k.as_str()).collect()
    }

    pub fn get(&self, entity: &str) -> Option<&RawSeries> {
        self.series.get(entity)
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Find the series for a user-supplied entity name.
    /// An exact match wins; otherwise the query must be contained in exactly one entity name.
    pub fn resolve_entity(&self, query: &str) -> Result<&RawSeries> {
        let query = query.trim();
        if let Some(series) = self.series.get(query) {
            return Ok(series);
        }

        let candidates: Vec<&RawSeries> = self
            .series
            .values()
            .filter(|s| !query.is_empty() && s.entity.contains(query))
            .collect();

        match candidates.as_slice() {
            [single] => Ok(*single),
            [] => Err(CoreError::Selection(format!(
                "'{}' not found in {} data. Available: {}",
                query,
                self.domain,
                self.entities().join(", ")
            ))),
            many => Err(CoreError::Selection(format!(
                "'{}' is ambiguous in {} data. Matching: {}",
                query,
                self.domain,
                many.iter()
                    .map(|s| s.entity.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

// ============================================================================
// ForecastResult: predictions labelled with the generated future month axis
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ForecastResult {
    pub months: Vec<NaiveDate>,
    pub values: Vec<f64>,
    pub params: SmoothingParams,
    /// In-sample sum of squared one-step-ahead errors of the chosen fit
    pub sse: f64,
}

impl ForecastResult {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last(&self) -> Option<(NaiveDate, f64)> {
        Some((*self.months.last()?, *self.values.last()?))
    }

    pub fn value_at(&self, month: NaiveDate) -> Option<f64> {
        let idx = self.months.binary_search(&first_of_month(month)).ok()?;
        Some(self.values[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> NaiveDate {
        month_start(year, month).unwrap()
    }

    fn raw(entity: &str, months: &[(i32, u32)]) -> RawSeries {
        RawSeries::from_observations(
            entity,
            months.iter().map(|&(y, m)| (ym(y, m), Some(1.0))).collect(),
        )
    }

    #[test]
    fn test_from_observations_sorts_and_merges() {
        let series = RawSeries::from_observations(
            "Alberta",
            vec![
                (ym(2020, 3), Some(3.0)),
                (NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(), Some(1.0)),
                (ym(2020, 1), Some(2.0)),
                (ym(2020, 2), None),
            ],
        );
        assert_eq!(series.months, vec![ym(2020, 1), ym(2020, 2), ym(2020, 3)]);
        assert_eq!(series.values, vec![Some(1.5), None, Some(3.0)]);
        assert_eq!(series.present_count(), 2);
        assert_eq!(series.value_at(2020, 3), Some(3.0));
        assert_eq!(series.value_at(2020, 2), None);
        assert_eq!(series.value_at(2021, 1), None);
    }

    #[test]
    fn test_time_series_rejects_unordered_months() {
        let err = TimeSeries::new("X", vec![ym(2020, 2), ym(2020, 1)], vec![1.0, 2.0]);
        assert!(matches!(err, Err(CoreError::InvalidSeries(_))));

        let err = TimeSeries::new("X", vec![ym(2020, 1), ym(2020, 1)], vec![1.0, 2.0]);
        assert!(matches!(err, Err(CoreError::InvalidSeries(_))), "duplicates rejected");

        let err = TimeSeries::new("X", vec![ym(2020, 1)], vec![1.0, 2.0]);
        assert!(matches!(err, Err(CoreError::InvalidSeries(_))));
    }

    #[test]
    fn test_resolve_entity() {
        let dataset = Dataset::new(
            Domain::Housing,
            vec![
                raw("Greater Toronto", &[(2020, 1)]),
                raw("Greater Vancouver", &[(2020, 1)]),
                raw("Calgary", &[(2020, 1)]),
            ],
        );

        assert_eq!(dataset.resolve_entity("Calgary").unwrap().entity, "Calgary");
        assert_eq!(
            dataset.resolve_entity(" Toronto ").unwrap().entity,
            "Greater Toronto"
        );
        assert!(matches!(
            dataset.resolve_entity("Greater"),
            Err(CoreError::Selection(msg)) if msg.contains("ambiguous")
        ));
        assert!(matches!(
            dataset.resolve_entity("Halifax"),
            Err(CoreError::Selection(msg)) if msg.contains("Calgary")
        ));
        assert_eq!(dataset.entities(), vec!["Calgary", "Greater Toronto", "Greater Vancouver"]);
    }
}
