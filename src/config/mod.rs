//! Configuration module for the forecasting core.

pub mod cleaning;
pub mod forecast;

mod debug; // Private: callers use crate::config::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

pub mod sources;

// Re-export commonly used items
pub use cleaning::CLEANING;
pub use forecast::{FORECAST, HOUSING_INDEX_MODEL, SEASONAL_PRICE_MODEL};
pub use sources::{
    FOOD_SCHEMA, HOUSING_INDEX_SCHEMA, LISTING_COLUMNS, OIL_SCHEMA, SOURCES, WAGE_SCHEMA,
};
