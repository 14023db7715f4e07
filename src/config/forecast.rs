//! Forecast engine configuration

use crate::analysis::holt_winters::{ModelConfig, SeasonalMode};

/// Parameter search for the smoothing constants (alpha, beta, gamma)
pub struct GridSearchSettings {
    // Coarse pass covers [coarse_lower, coarse_upper] at coarse_step
    pub coarse_lower: f64,
    pub coarse_upper: f64,
    pub coarse_step: f64,
    // Fine pass searches +/- one coarse step around the coarse winner
    pub fine_step: f64,
    // Hard bounds for any smoothing constant
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// The Master Forecast Configuration
pub struct ForecastSettings {
    // Observations per seasonal cycle for monthly data with yearly seasonality
    pub seasonal_period: usize,
    // A seasonal fit needs this many full cycles before initial seasonals can be computed
    pub min_seasonal_cycles: usize,
    // Holt's linear trend initializes the slope from the first two points
    pub min_points_trend: usize,
    pub min_points_level: usize,
    // Longest projection accepted, in months
    pub max_horizon: usize,

    pub grid: GridSearchSettings,
}

pub const FORECAST: ForecastSettings = ForecastSettings {
    seasonal_period: 12,
    min_seasonal_cycles: 2,
    min_points_trend: 3,
    min_points_level: 2,
    max_horizon: 600,

    grid: GridSearchSettings {
        coarse_lower: 0.05,
        coarse_upper: 0.95,
        coarse_step: 0.05,
        fine_step: 0.01,
        lower_bound: 0.01,
        upper_bound: 0.99,
    },
};

/// Housing price index: additive trend, no seasonality
pub const HOUSING_INDEX_MODEL: ModelConfig = ModelConfig {
    trend: true,
    seasonal: SeasonalMode::None,
    seasonal_period: FORECAST.seasonal_period,
};

/// Oil, wage and food price series: multiplicative yearly seasonality, no trend term
pub const SEASONAL_PRICE_MODEL: ModelConfig = ModelConfig {
    trend: false,
    seasonal: SeasonalMode::Multiplicative,
    seasonal_period: FORECAST.seasonal_period,
};
