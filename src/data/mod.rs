// Data loading and cleaning
pub mod cleaner;
pub mod coercion;
pub mod listings;
pub mod loader;

// Re-export commonly used items
pub use cleaner::{CleanPolicy, FillPolicy, YearRange, clean, fill_missing};
pub use listings::{load_listings, load_listings_from_bytes};
pub use loader::{load_dataset, load_dataset_from_bytes};
