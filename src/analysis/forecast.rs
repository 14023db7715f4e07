use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::holt_winters::{FittedModel, ModelConfig};
use crate::config::FORECAST;
use crate::error::{CoreError, Result};
use crate::models::{ForecastResult, TimeSeries};
use crate::utils::TimeUtils;
use crate::utils::time_utils::{first_of_month, months_after, months_between};

/// How far to project.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Horizon {
    /// A fixed number of months after the last observation
    Periods(usize),
    /// Every month from the one after the last observation up to and including `end`.
    /// `start` must not be after `end`; it does not move the output axis.
    Through { start: NaiveDate, end: NaiveDate },
}

impl Horizon {
    /// Number of steps to predict after `last`, at most `FORECAST.max_horizon`.
    pub fn periods_after(&self, last: NaiveDate) -> Result<usize> {
        let steps = self.raw_periods_after(last)?;
        if steps > FORECAST.max_horizon {
            return Err(CoreError::InvalidHorizon(format!(
                "{} months requested, at most {} supported",
                steps, FORECAST.max_horizon
            )));
        }
        Ok(steps)
    }

    fn raw_periods_after(&self, last: NaiveDate) -> Result<usize> {
        match *self {
            Horizon::Periods(0) => Err(CoreError::InvalidHorizon(
                "horizon must cover at least one month".to_string(),
            )),
            Horizon::Periods(n) => Ok(n),
            Horizon::Through { start, end } => {
                let (start, end) = (first_of_month(start), first_of_month(end));
                if start > end {
                    return Err(CoreError::InvalidHorizon(format!(
                        "start {} is after end {}",
                        TimeUtils::month_to_string(start),
                        TimeUtils::month_to_string(end)
                    )));
                }
                let steps = months_between(first_of_month(last), end);
                if steps <= 0 {
                    return Err(CoreError::InvalidHorizon(format!(
                        "end {} is not after the last observation {}",
                        TimeUtils::month_to_string(end),
                        TimeUtils::month_to_string(last)
                    )));
                }
                Ok(steps as usize)
            }
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub model: ModelConfig,
    pub horizon: Horizon,
}

/// Fit once on the whole cleaned history and project over the horizon.
///
/// Predictions are indexed by offset from the end of the history and labelled with the
/// contiguous months that follow the last observation. Gaps inside the history are not
/// reflected in those labels.
pub fn fit_and_forecast(series: &TimeSeries, config: &ForecastConfig) -> Result<ForecastResult> {
    let Some(last) = series.last_month() else {
        return Err(CoreError::InsufficientData {
            required: config.model.min_observations(),
            actual: 0,
        });
    };
    let steps = config.horizon.periods_after(last)?;
    // Checked before fitting so both vectors always pair up
    let months = months_after(last, steps).ok_or_else(|| {
        CoreError::InvalidHorizon(format!(
            "{} months after {} runs past the supported calendar",
            steps,
            TimeUtils::month_to_string(last)
        ))
    })?;

    let model = FittedModel::fit(&series.values, &config.model)?;
    let values = model.forecast(steps);

    log::debug!(
        "Forecast {}: {} points fitted, {} steps ahead (alpha {:.2}, sse {:.4})",
        series.entity,
        series.len(),
        steps,
        model.params.alpha,
        model.sse
    );

    Ok(ForecastResult {
        months,
        values,
        params: model.params,
        sse: model.sse,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::holt_winters::SeasonalMode;
    use crate::config::{HOUSING_INDEX_MODEL, SEASONAL_PRICE_MODEL};
    use crate::utils::time_utils::month_start;

    fn monthly(entity: &str, start_year: i32, values: Vec<f64>) -> TimeSeries {
        let months = (0..values.len())
            .map(|i| month_start(start_year + (i / 12) as i32, (i % 12) as u32 + 1).unwrap())
            .collect();
        TimeSeries::new(entity, months, values).unwrap()
    }

    #[test]
    fn test_through_counts_from_last_observation() {
        let last = month_start(2022, 6).unwrap();
        let horizon = Horizon::Through {
            start: month_start(2022, 10).unwrap(),
            end: month_start(2022, 12).unwrap(),
        };
        assert_eq!(horizon.periods_after(last).unwrap(), 6);
    }

    #[test]
    fn test_invalid_horizons() {
        let last = month_start(2022, 6).unwrap();
        let at_last = Horizon::Through {
            start: month_start(2022, 1).unwrap(),
            end: last,
        };
        let reversed = Horizon::Through {
            start: month_start(2023, 3).unwrap(),
            end: month_start(2023, 1).unwrap(),
        };
        for horizon in [at_last, reversed, Horizon::Periods(0)] {
            assert!(matches!(
                horizon.periods_after(last),
                Err(CoreError::InvalidHorizon(_))
            ));
        }
    }

    #[test]
    fn test_oversized_horizon_is_rejected() {
        let series = monthly("Toronto", 2020, (0..30).map(|i| 90.0 + i as f64).collect());
        for steps in [FORECAST.max_horizon + 1, 3_200_000, usize::MAX] {
            let config = ForecastConfig {
                model: HOUSING_INDEX_MODEL,
                horizon: Horizon::Periods(steps),
            };
            assert!(matches!(
                fit_and_forecast(&series, &config),
                Err(CoreError::InvalidHorizon(_))
            ));
        }

        let far_end = Horizon::Through {
            start: month_start(2023, 1).unwrap(),
            end: month_start(9999, 12).unwrap(),
        };
        assert!(matches!(
            far_end.periods_after(month_start(2022, 6).unwrap()),
            Err(CoreError::InvalidHorizon(_))
        ));

        let config = ForecastConfig {
            model: HOUSING_INDEX_MODEL,
            horizon: Horizon::Periods(FORECAST.max_horizon),
        };
        let result = fit_and_forecast(&series, &config).unwrap();
        assert_eq!(result.months.len(), FORECAST.max_horizon);
        assert_eq!(result.values.len(), FORECAST.max_horizon);
    }

    #[test]
    fn test_forecast_months_follow_history() {
        let series = monthly("Ontario", 2020, vec![5.0; 30]);
        let config = ForecastConfig {
            model: HOUSING_INDEX_MODEL,
            horizon: Horizon::Periods(4),
        };
        let result = fit_and_forecast(&series, &config).unwrap();
        assert_eq!(result.len(), 4);
        assert_eq!(result.months[0], month_start(2022, 7).unwrap());
        assert_eq!(result.months[3], month_start(2022, 10).unwrap());
        for value in &result.values {
            assert!((value - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_seasonal_model_requires_two_cycles() {
        let series = monthly("Alberta", 2021, vec![120.0; 20]);
        let config = ForecastConfig {
            model: SEASONAL_PRICE_MODEL,
            horizon: Horizon::Periods(3),
        };
        assert!(matches!(
            fit_and_forecast(&series, &config),
            Err(CoreError::InsufficientData {
                required: 24,
                actual: 20
            })
        ));
    }

    #[test]
    fn test_horizon_checked_before_fit() {
        let series = monthly("Alberta", 2021, vec![120.0; 30]);
        let config = ForecastConfig {
            model: ModelConfig {
                trend: false,
                seasonal: SeasonalMode::Multiplicative,
                seasonal_period: 12,
            },
            horizon: Horizon::Through {
                start: month_start(2020, 1).unwrap(),
                end: month_start(2023, 6).unwrap(),
            },
        };
        assert!(matches!(
            fit_and_forecast(&series, &config),
            Err(CoreError::InvalidHorizon(_))
        ));
    }
}
