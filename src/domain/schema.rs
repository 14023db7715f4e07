//! Explicit table schemas: the adapter step from raw CSV columns to typed observations
//! works against these, and a source that doesn't carry the named columns is rejected.

use crate::utils::TimeUtils;

/// How observations are laid out in the source table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLayout {
    /// One row per (date, entity) with a single value column
    Long {
        date_column: &'static str,
        entity_column: &'static str,
        value_column: &'static str,
    },
    /// One row per date, one value column per entity
    Wide {
        date_column: &'static str,
        // Non-entity columns to drop besides the date column and unnamed index columns
        ignored_columns: &'static [&'static str],
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSchema {
    pub layout: TableLayout,
    /// Accepted date formats. Empty means "any of the flexible formats".
    pub date_formats: &'static [&'static str],
    /// Entity names whose rows are left out of the dataset (e.g. national aggregates)
    pub excluded_entities: &'static [&'static str],
}

impl SourceSchema {
    pub fn date_formats(&self) -> &'static [&'static str] {
        if self.date_formats.is_empty() {
            TimeUtils::FLEXIBLE_DATE_FORMATS
        } else {
            self.date_formats
        }
    }

    pub fn date_column(&self) -> &'static str {
        match self.layout {
            TableLayout::Long { date_column, .. } | TableLayout::Wide { date_column, .. } => {
                date_column
            }
        }
    }

    pub fn is_excluded(&self, entity: &str) -> bool {
        self.excluded_entities.contains(&entity)
    }

    /// Should a header of a wide table become an entity?
    pub fn is_entity_column(&self, header: &str) -> bool {
        match self.layout {
            TableLayout::Long { .. } => false,
            TableLayout::Wide {
                date_column,
                ignored_columns,
            } => {
                // Exported index columns come through unnamed or as "Unnamed: 0"
                !header.is_empty()
                    && !header.starts_with("Unnamed")
                    && header != date_column
                    && !ignored_columns.contains(&header)
                    && !self.is_excluded(header)
            }
        }
    }
}

/// Column names of the housing listings table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingColumns {
    pub city: &'static str,
    pub province: &'static str,
    pub beds: &'static str,
    pub baths: &'static str,
    pub price: &'static str,
}

impl ListingColumns {
    pub fn all(&self) -> [&'static str; 5] {
        [self.city, self.province, self.beds, self.baths, self.price]
    }
}
