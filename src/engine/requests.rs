use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::{Horizon, PriceBasis};
use crate::config::SOURCES;
use crate::data::YearRange;
use crate::domain::Domain;
use crate::models::{ForecastResult, ListingCriteria, TimeSeries};

/// Forecast one entity (province, city, region) of a domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    pub data_dir: PathBuf,
    pub domain: Domain,
    pub entity: String,
    pub horizon: Horizon,
    /// Month whose recorded value is reported next to the forecast
    pub reference: Option<NaiveDate>,
}

/// Forecast the price of a home matching the listing criteria
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HousingPriceRequest {
    pub data_dir: PathBuf,
    pub criteria: ListingCriteria,
    pub horizon: Horizon,
    pub basis: PriceBasis,
}

/// Per-entity values for one month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRequest {
    pub data_dir: PathBuf,
    pub domain: Domain,
    pub year: i32,
    pub month: u32,
}

/// Cross-entity mean per month. No window means the configured trend window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendRequest {
    pub data_dir: PathBuf,
    pub domain: Domain,
    pub window: Option<YearRange>,
}

/// Value as loaded for a chosen month, before any filling
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReferenceValue {
    pub month: NaiveDate,
    pub value: Option<f64>,
}

/// Cleaned history plus its projection
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EntityForecast {
    pub domain: Domain,
    pub entity: String,
    pub history: TimeSeries,
    pub forecast: ForecastResult,
    pub reference: Option<ReferenceValue>,
}

pub fn domain_source(data_dir: &Path, domain: Domain) -> PathBuf {
    data_dir.join(domain.default_file_name())
}

pub fn listings_source(data_dir: &Path) -> PathBuf {
    data_dir.join(SOURCES.listings)
}
