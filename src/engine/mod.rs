pub mod core;
pub mod requests;

// Re-export key components
pub use core::{
    forecast_entity, forecast_in_dataset, national_trend_request, predict_housing_price,
    price_from_sources, regional_snapshot_request,
};
pub use requests::{
    EntityForecast, ForecastRequest, HousingPriceRequest, ReferenceValue, SnapshotRequest,
    TrendRequest,
};
