//! Cleaning policies applied before each kind of fit

use crate::config::forecast::FORECAST;
use crate::data::cleaner::{CleanPolicy, FillPolicy, YearRange};

pub struct CleaningSettings {
    /// Housing index: ffill/bfill, history from 1995 onwards
    pub housing_index: CleanPolicy,
    /// Oil/wage/food before a multiplicative seasonal fit
    pub seasonal_series: CleanPolicy,
    /// Window used by the long-run trend views
    pub trend_window: YearRange,
    /// Point-estimate columns (listing prices) get the column mean instead
    pub point_estimate_fill: FillPolicy,
}

pub const CLEANING: CleaningSettings = CleaningSettings {
    housing_index: CleanPolicy {
        fill: FillPolicy::ForwardBackward,
        date_range: Some(YearRange {
            from: Some(1995),
            to: None,
        }),
        positive_only: false,
        min_observations: FORECAST.min_points_trend,
    },

    seasonal_series: CleanPolicy {
        fill: FillPolicy::ForwardBackward,
        date_range: None,
        // Multiplicative decomposition is undefined at zero or below
        positive_only: true,
        min_observations: FORECAST.seasonal_period * FORECAST.min_seasonal_cycles,
    },

    trend_window: YearRange {
        from: Some(1990),
        to: Some(2024),
    },

    point_estimate_fill: FillPolicy::Mean,
};
