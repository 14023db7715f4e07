use std::path::Path;

use crate::config::{CLEANING, LISTING_COLUMNS};
use crate::data::cleaner::fill_missing;
use crate::data::coercion::{coerce_count, coerce_numeric};
use crate::data::loader::{RawTable, read_source, read_table};
use crate::error::{CoreError, Result};
use crate::models::{HousingListing, ListingTable};

/// Load the housing listings table (city, province, beds, baths, price).
pub fn load_listings(path: &Path) -> Result<ListingTable> {
    let bytes = read_source(path)?;
    let table = build_listings(&bytes, &path.display().to_string())?;
    log::info!(
        "Loaded {} housing listings from {}",
        table.len(),
        path.display()
    );
    Ok(table)
}

pub fn load_listings_from_bytes(bytes: &[u8]) -> Result<ListingTable> {
    build_listings(bytes, "listings snapshot")
}

fn build_listings(bytes: &[u8], source_name: &str) -> Result<ListingTable> {
    let table = read_table(bytes, source_name)?;
    let [city_idx, province_idx, beds_idx, baths_idx, price_idx] = {
        let mut idx = [0usize; 5];
        for (slot, name) in idx.iter_mut().zip(LISTING_COLUMNS.all()) {
            *slot = table.column(name, source_name)?;
        }
        idx
    };

    let cell = RawTable::cell;

    // Price is a point estimate: missing prices get the column-wide mean,
    // computed over every row before any row is rejected
    let raw_prices: Vec<Option<f64>> = table
        .rows
        .iter()
        .map(|row| coerce_numeric(cell(row, price_idx)))
        .collect();
    let prices = fill_missing(&raw_prices, CLEANING.point_estimate_fill);

    let mut listings = Vec::with_capacity(table.rows.len());
    let mut rejected = 0usize;
    for (row, price) in table.rows.iter().zip(prices) {
        let parsed = (
            coerce_count(cell(row, beds_idx)),
            coerce_count(cell(row, baths_idx)),
            price,
        );
        let (Some(beds), Some(baths), Some(price)) = parsed else {
            rejected += 1;
            continue;
        };
        listings.push(HousingListing {
            city: cell(row, city_idx).to_string(),
            province: cell(row, province_idx).to_string(),
            beds,
            baths,
            price,
        });
    }

    if rejected > 0 {
        log::warn!(
            "⚠️  {}: rejected {} listings with unreadable beds, baths or price",
            source_name,
            rejected
        );
    }
    if listings.is_empty() {
        return Err(CoreError::load(source_name, "no usable listings"));
    }
    Ok(ListingTable::new(listings))
}
