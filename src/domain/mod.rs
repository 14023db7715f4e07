// Domain types and value objects
pub mod economic_domain;
pub mod schema;

// Re-export commonly used types
pub use economic_domain::Domain;
pub use schema::{ListingColumns, SourceSchema, TableLayout};
