// Forecasting and cross-entity analysis
pub mod forecast;
pub mod holt_winters;
pub mod price_translator;
pub mod regional;

// Re-export commonly used types
pub use forecast::{ForecastConfig, Horizon, fit_and_forecast};
pub use holt_winters::{FittedModel, ModelConfig, SeasonalMode, SmoothingParams};
pub use price_translator::{PriceBasis, PricePoint, base_price, translate_price};
pub use regional::{RegionalAverage, TrendPoint, national_trend, regional_snapshot};
