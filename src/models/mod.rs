// Data models for the forecasting core
// These modules contain pure data types independent of any presentation layer

pub mod listing;
pub mod timeseries;

// Re-export key types for convenience
pub use listing::{HousingListing, ListingCriteria, ListingTable};
pub use timeseries::{Dataset, ForecastResult, RawSeries, TimeSeries};
