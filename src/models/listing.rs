use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::utils::maths_utils::mean;

/// One row of the housing listings table, after price mean-fill
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HousingListing {
    pub city: String,
    pub province: String,
    pub beds: u32,
    pub baths: u32,
    pub price: f64,
}

/// User selection on the price prediction page
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ListingCriteria {
    pub city: String,
    pub province: String,
    pub beds: u32,
    pub baths: u32,
}

impl ListingCriteria {
    fn matches(&self, listing: &HousingListing) -> bool {
        listing.city == self.city
            && listing.province == self.province
            && listing.beds == self.beds
            && listing.baths == self.baths
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ListingTable {
    pub listings: Vec<HousingListing>,
}

impl ListingTable {
    pub fn new(listings: Vec<HousingListing>) -> Self {
        Self { listings }
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn select(&self, criteria: &ListingCriteria) -> Result<Vec<&HousingListing>> {
        let selected: Vec<&HousingListing> = self
            .listings
            .iter()
            .filter(|l| criteria.matches(l))
            .collect();
        if selected.is_empty() {
            return Err(CoreError::Selection(format!(
                "no listings in {}, {} with {} beds and {} baths",
                criteria.city, criteria.province, criteria.beds, criteria.baths
            )));
        }
        Ok(selected)
    }

    /// Current average price for the selection
    pub fn average_price(&self, criteria: &ListingCriteria) -> Result<f64> {
        let prices: Vec<f64> = self.select(criteria)?.iter().map(|l| l.price).collect();
        mean(&prices).ok_or_else(|| CoreError::Selection("empty listing selection".to_string()))
    }

    pub fn cities(&self) -> Vec<String> {
        // BTreeSet maintains sorted order and ensures uniqueness
        self.listings
            .iter()
            .map(|l| l.city.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn provinces(&self) -> Vec<String> {
        self.listings
            .iter()
            .map(|l| l.province.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
