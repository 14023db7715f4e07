//! CSV snapshot locations and per-domain table schemas

use crate::domain::schema::{ListingColumns, SourceSchema, TableLayout};

/// Default file names of the static snapshots, relative to `data_dir`
pub struct SourceFiles {
    pub data_dir: &'static str,
    pub food: &'static str,
    pub oil: &'static str,
    pub wage: &'static str,
    pub housing_index: &'static str,
    pub listings: &'static str,
}

pub const SOURCES: SourceFiles = SourceFiles {
    data_dir: "data",
    food: "Food.csv",
    oil: "Oil.csv",
    wage: "Wage.csv",
    housing_index: "hpi.csv",
    listings: "housing.csv",
};

pub const FOOD_SCHEMA: SourceSchema = SourceSchema {
    layout: TableLayout::Long {
        date_column: "Date",
        entity_column: "Geography",
        value_column: "Value",
    },
    date_formats: &[],
    // National aggregate rows would double count the provinces
    excluded_entities: &["Canada"],
};

pub const OIL_SCHEMA: SourceSchema = SourceSchema {
    layout: TableLayout::Long {
        date_column: "Date",
        entity_column: "Province",
        value_column: "Value",
    },
    date_formats: &[],
    excluded_entities: &[],
};

pub const WAGE_SCHEMA: SourceSchema = SourceSchema {
    layout: TableLayout::Long {
        date_column: "Date",
        entity_column: "Geography",
        value_column: "Value",
    },
    date_formats: &["%m/%d/%Y"],
    excluded_entities: &["Canada"],
};

/// hpi.csv is wide: one row per month, one column per region
pub const HOUSING_INDEX_SCHEMA: SourceSchema = SourceSchema {
    layout: TableLayout::Wide {
        date_column: "Month-year",
        ignored_columns: &["Type", "Canada", "year", "month"],
    },
    date_formats: &["%b-%y"],
    excluded_entities: &[],
};

pub const LISTING_COLUMNS: ListingColumns = ListingColumns {
    city: "City",
    province: "Province",
    beds: "Number_Beds",
    baths: "Number_Baths",
    price: "Price",
};
