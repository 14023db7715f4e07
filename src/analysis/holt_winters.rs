//! Exponential smoothing (Holt / Holt-Winters) with deterministic parameter selection.
//!
//! The model has a level, an optional additive trend and an optional additive or
//! multiplicative seasonal component. Smoothing constants are picked by minimising the
//! in-sample sum of squared one-step-ahead errors: a coarse grid over (0, 1), then a
//! finer grid around the coarse winner. No randomness is involved, so identical input
//! always gives the identical fit.

use itertools::iproduct;
use serde::{Deserialize, Serialize};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::config::FORECAST;
use crate::error::{CoreError, Result};
use crate::utils::maths_utils::{get_min_index, linear_grid, mean};

// Seasonal factors this close to zero make the multiplicative update meaningless
const MIN_FACTOR: f64 = 1e-10;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum SeasonalMode {
    None,
    Additive,
    Multiplicative,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Additive (linear) trend term
    pub trend: bool,
    pub seasonal: SeasonalMode,
    /// Observations per cycle; ignored when `seasonal` is `None`
    pub seasonal_period: usize,
}

impl ModelConfig {
    pub fn is_seasonal(&self) -> bool {
        self.seasonal != SeasonalMode::None
    }

    /// Smallest history the model can be initialised from
    pub fn min_observations(&self) -> usize {
        if self.is_seasonal() {
            self.seasonal_period * FORECAST.min_seasonal_cycles
        } else if self.trend {
            FORECAST.min_points_trend
        } else {
            FORECAST.min_points_level
        }
    }
}

/// Smoothing constants of a fitted model. `beta`/`gamma` are absent when the model has
/// no trend/seasonal component.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SmoothingParams {
    pub alpha: f64,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
struct Components {
    level: f64,
    trend: f64,
    // Indexed by absolute observation index modulo the period
    seasonal: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    pub config: ModelConfig,
    pub params: SmoothingParams,
    pub sse: f64,
    n_obs: usize,
    components: Components,
}

impl FittedModel {
    /// Fit against the full history. Fails rather than produce a degenerate model.
    pub fn fit(values: &[f64], config: &ModelConfig) -> Result<Self> {
        validate(values, config)?;

        let grid = &FORECAST.grid;
        let axis = |active: bool| {
            if active {
                linear_grid(grid.coarse_lower, grid.coarse_upper, grid.coarse_step)
            } else {
                vec![0.0]
            }
        };
        let coarse = search(
            values,
            config,
            &axis(true),
            &axis(config.trend),
            &axis(config.is_seasonal()),
        )?;

        let refine = |active: bool, centre: f64| {
            if active {
                linear_grid(
                    (centre - grid.coarse_step).max(grid.lower_bound),
                    (centre + grid.coarse_step).min(grid.upper_bound),
                    grid.fine_step,
                )
            } else {
                vec![0.0]
            }
        };
        let fine = search(
            values,
            config,
            &refine(true, coarse.0),
            &refine(config.trend, coarse.1),
            &refine(config.is_seasonal(), coarse.2),
        )?;

        // The fine grid need not contain the coarse winner
        let (alpha, beta, gamma, sse) = if fine.3 <= coarse.3 { fine } else { coarse };

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_grid_search {
            log::info!(
                "Grid search: coarse (a={:.2}, b={:.2}, g={:.2}, sse={:.4}) -> final (a={:.2}, b={:.2}, g={:.2}, sse={:.4})",
                coarse.0,
                coarse.1,
                coarse.2,
                coarse.3,
                alpha,
                beta,
                gamma,
                sse
            );
        }

        let (_, components) = smooth(values, config, alpha, beta, gamma);
        Ok(Self {
            config: *config,
            params: SmoothingParams {
                alpha,
                beta: config.trend.then_some(beta),
                gamma: config.is_seasonal().then_some(gamma),
            },
            sse,
            n_obs: values.len(),
            components,
        })
    }

    /// Predict `steps` periods past the end of the fitted history.
    /// Step h lands on absolute index n + h - 1, which fixes its seasonal slot.
    pub fn forecast(&self, steps: usize) -> Vec<f64> {
        let Components {
            level,
            trend,
            ref seasonal,
        } = self.components;
        let period = self.config.seasonal_period;

        (1..=steps)
            .map(|h| {
                let base = level + h as f64 * trend;
                match self.config.seasonal {
                    SeasonalMode::None => base,
                    SeasonalMode::Additive => base + seasonal[(self.n_obs + h - 1) % period],
                    SeasonalMode::Multiplicative => base * seasonal[(self.n_obs + h - 1) % period],
                }
            })
            .collect()
    }
}

fn validate(values: &[f64], config: &ModelConfig) -> Result<()> {
    if config.is_seasonal() && config.seasonal_period < 2 {
        return Err(CoreError::InvalidSeries(format!(
            "seasonal period must be at least 2, got {}",
            config.seasonal_period
        )));
    }

    let required = config.min_observations();
    if values.len() < required {
        return Err(CoreError::InsufficientData {
            required,
            actual: values.len(),
        });
    }

    if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
        return Err(CoreError::InvalidSeries(format!(
            "non-finite value at position {}",
            pos
        )));
    }

    if config.seasonal == SeasonalMode::Multiplicative
        && let Some(pos) = values.iter().position(|&v| v <= 0.0)
    {
        return Err(CoreError::InvalidSeries(format!(
            "multiplicative seasonality needs strictly positive values (position {} is {})",
            pos, values[pos]
        )));
    }
    Ok(())
}

/// Evaluate every (alpha, beta, gamma) combination; return the best with its SSE.
fn search(
    values: &[f64],
    config: &ModelConfig,
    alphas: &[f64],
    betas: &[f64],
    gammas: &[f64],
) -> Result<(f64, f64, f64, f64)> {
    let candidates: Vec<(f64, f64, f64)> = iproduct!(
        alphas.iter().copied(),
        betas.iter().copied(),
        gammas.iter().copied()
    )
    .collect();

    let scores: Vec<f64> = candidates
        .iter()
        .map(|&(a, b, g)| smooth(values, config, a, b, g).0)
        .collect();

    let best = get_min_index(&scores)
        .filter(|&i| scores[i].is_finite())
        .ok_or_else(|| {
            CoreError::InvalidSeries("no smoothing parameters give a finite fit".to_string())
        })?;
    let (a, b, g) = candidates[best];
    Ok((a, b, g, scores[best]))
}

fn initial_components(values: &[f64], config: &ModelConfig) -> (Components, usize) {
    if !config.is_seasonal() {
        let trend = if config.trend {
            values[1] - values[0]
        } else {
            0.0
        };
        let components = Components {
            level: values[0],
            trend,
            seasonal: Vec::new(),
        };
        return (components, 1);
    }

    let m = config.seasonal_period;
    let first_cycle = mean(&values[..m]).unwrap_or(0.0);
    let second_cycle = mean(&values[m..2 * m]).unwrap_or(first_cycle);
    let trend = if config.trend {
        (second_cycle - first_cycle) / m as f64
    } else {
        0.0
    };
    let seasonal = values[..m]
        .iter()
        .map(|&y| match config.seasonal {
            SeasonalMode::Multiplicative => y / first_cycle,
            _ => y - first_cycle,
        })
        .collect();

    let components = Components {
        level: first_cycle,
        trend,
        seasonal,
    };
    (components, m)
}

/// Run the recursions once, returning the SSE of one-step-ahead forecasts and the final
/// state. An SSE of infinity marks parameters that break the recursion.
fn smooth(
    values: &[f64],
    config: &ModelConfig,
    alpha: f64,
    beta: f64,
    gamma: f64,
) -> (f64, Components) {
    let (mut state, start) = initial_components(values, config);
    let period = config.seasonal_period.max(1);
    let mut sse = 0.0;

    for (i, &y) in values.iter().enumerate().skip(start) {
        let slot = i % period;
        let base = state.level + state.trend;

        let (forecast, deseasonalized) = match config.seasonal {
            SeasonalMode::None => (base, y),
            SeasonalMode::Additive => {
                let s = state.seasonal[slot];
                (base + s, y - s)
            }
            SeasonalMode::Multiplicative => {
                let s = state.seasonal[slot];
                if s.abs() < MIN_FACTOR {
                    return (f64::INFINITY, state);
                }
                (base * s, y / s)
            }
        };

        let error = y - forecast;
        sse += error * error;

        let prev_level = state.level;
        state.level = alpha * deseasonalized + (1.0 - alpha) * base;
        if config.trend {
            state.trend = beta * (state.level - prev_level) + (1.0 - beta) * state.trend;
        }

        match config.seasonal {
            SeasonalMode::None => {}
            SeasonalMode::Additive => {
                state.seasonal[slot] =
                    gamma * (y - state.level) + (1.0 - gamma) * state.seasonal[slot];
            }
            SeasonalMode::Multiplicative => {
                if state.level.abs() < MIN_FACTOR {
                    return (f64::INFINITY, state);
                }
                state.seasonal[slot] =
                    gamma * (y / state.level) + (1.0 - gamma) * state.seasonal[slot];
            }
        }
    }

    if !sse.is_finite() {
        return (f64::INFINITY, state);
    }
    (sse, state)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TREND_ONLY: ModelConfig = ModelConfig {
        trend: true,
        seasonal: SeasonalMode::None,
        seasonal_period: 12,
    };

    const MULTIPLICATIVE: ModelConfig = ModelConfig {
        trend: false,
        seasonal: SeasonalMode::Multiplicative,
        seasonal_period: 12,
    };

    fn seasonal_series(cycles: usize) -> Vec<f64> {
        // Yearly pattern around a slowly rising level, always positive
        (0..cycles * 12)
            .map(|i| {
                let level = 100.0 + i as f64 * 0.5;
                let factor = 1.0 + 0.2 * ((i % 12) as f64 * std::f64::consts::PI / 6.0).sin();
                level * factor
            })
            .collect()
    }

    #[test]
    fn test_flat_series_gives_flat_forecast() {
        let values = vec![42.0; 24];
        let model = FittedModel::fit(&values, &TREND_ONLY).unwrap();
        for value in model.forecast(18) {
            assert!((value - 42.0).abs() < 1e-9, "got {}", value);
        }
    }

    #[test]
    fn test_linear_trend_is_continued() {
        let values: Vec<f64> = (0..30).map(|i| 10.0 + 2.0 * i as f64).collect();
        let model = FittedModel::fit(&values, &TREND_ONLY).unwrap();
        let forecast = model.forecast(3);
        for (h, value) in forecast.iter().enumerate() {
            let expected = 10.0 + 2.0 * (30 + h) as f64;
            assert!((value - expected).abs() < 1e-6, "h={} got {}", h + 1, value);
        }
        assert!(model.params.beta.is_some());
        assert!(model.params.gamma.is_none());
    }

    #[test]
    fn test_multiplicative_needs_two_cycles() {
        let values = seasonal_series(2);
        let err = FittedModel::fit(&values[..23], &MULTIPLICATIVE).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientData {
                required: 24,
                actual: 23
            }
        ));
        assert!(FittedModel::fit(&values, &MULTIPLICATIVE).is_ok());
    }

    #[test]
    fn test_multiplicative_rejects_non_positive() {
        let mut values = seasonal_series(3);
        values[5] = 0.0;
        assert!(matches!(
            FittedModel::fit(&values, &MULTIPLICATIVE),
            Err(CoreError::InvalidSeries(_))
        ));
    }

    #[test]
    fn test_seasonal_pattern_is_reproduced() {
        let values = seasonal_series(4);
        let model = FittedModel::fit(&values, &MULTIPLICATIVE).unwrap();
        let forecast = model.forecast(12);
        assert_eq!(forecast.len(), 12);

        // Next cycle starts at absolute index 48 (slot 0). Peak of sin at slot 3, trough at 9.
        let peak = forecast[3];
        let trough = forecast[9];
        assert!(peak > trough * 1.2, "peak {} trough {}", peak, trough);
        assert!(forecast.iter().all(|v| v.is_finite() && *v > 0.0));
        assert!(model.params.gamma.is_some());
        assert!(model.params.beta.is_none());
    }

    #[test]
    fn test_fit_is_deterministic() {
        let values = seasonal_series(3);
        let first = FittedModel::fit(&values, &MULTIPLICATIVE).unwrap();
        let second = FittedModel::fit(&values, &MULTIPLICATIVE).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.forecast(6), second.forecast(6));
    }

    #[test]
    fn test_additive_seasonal_with_trend() {
        let config = ModelConfig {
            trend: true,
            seasonal: SeasonalMode::Additive,
            seasonal_period: 12,
        };
        let values: Vec<f64> = (0..36)
            .map(|i| 50.0 + i as f64 + 5.0 * ((i % 12) as f64 - 5.5))
            .collect();
        let model = FittedModel::fit(&values, &config).unwrap();
        let forecast = model.forecast(12);
        // Same slot one cycle later should be higher by roughly the yearly trend
        assert!(forecast[11] > forecast[0]);
        assert!(model.sse.is_finite());
    }

    #[test]
    fn test_level_only_needs_two_points() {
        let config = ModelConfig {
            trend: false,
            seasonal: SeasonalMode::None,
            seasonal_period: 12,
        };
        assert!(matches!(
            FittedModel::fit(&[1.0], &config),
            Err(CoreError::InsufficientData { required: 2, .. })
        ));
        let model = FittedModel::fit(&[1.0, 1.0, 1.0], &config).unwrap();
        assert_eq!(model.forecast(2), vec![1.0, 1.0]);
    }
}
