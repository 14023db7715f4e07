use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Base value of the housing price index.
pub const INDEX_BASE: f64 = 100.0;

/// Which index value the current listing price is assumed to be quoted at.
#[derive(
    Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum PriceBasis {
    /// Price is taken at the index base (100)
    #[default]
    Nominal,
    /// Price is taken at the region's last observed index
    LatestIndex,
}

impl PriceBasis {
    pub fn current_index(&self, latest_index: f64) -> f64 {
        match self {
            PriceBasis::Nominal => INDEX_BASE,
            PriceBasis::LatestIndex => latest_index,
        }
    }
}

/// Housing price estimate for one listing selection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub city: String,
    pub province: String,
    /// Housing index column the city resolved to
    pub region: String,
    pub beds: u32,
    pub baths: u32,
    pub basis: PriceBasis,
    pub current_price: f64,
    pub current_index: f64,
    pub forecast_month: NaiveDate,
    pub forecasted_index: f64,
    pub forecast_price: f64,
}

/// Price expressed at the index base.
pub fn base_price(current_price: f64, current_index: f64) -> Result<f64> {
    if current_index == 0.0 || !current_index.is_finite() {
        return Err(CoreError::Division(current_index));
    }
    Ok(current_price * INDEX_BASE / current_index)
}

/// Scale a price observed at `current_index` to `forecasted_index`.
pub fn translate_price(current_price: f64, current_index: f64, forecasted_index: f64) -> Result<f64> {
    Ok(base_price(current_price, current_index)? * forecasted_index / INDEX_BASE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_at_base() {
        for price in [0.0, 1.0, 512_345.67, 1_999_999.0] {
            let out = translate_price(price, 100.0, 100.0).unwrap();
            assert!((out - price).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_index_is_division_error() {
        assert!(matches!(
            translate_price(500_000.0, 0.0, 120.0),
            Err(CoreError::Division(_))
        ));
        assert!(matches!(
            translate_price(500_000.0, f64::NAN, 120.0),
            Err(CoreError::Division(_))
        ));
    }

    #[test]
    fn test_scaling() {
        // Quoted at 100, index moves to 110 -> +10%
        let out = translate_price(600_000.0, 100.0, 110.0).unwrap();
        assert!((out - 660_000.0).abs() < 1e-6);

        // Quoted at 120, index moves to 90 -> -25%
        let out = translate_price(600_000.0, 120.0, 90.0).unwrap();
        assert!((out - 450_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_price_basis() {
        assert_eq!(PriceBasis::default(), PriceBasis::Nominal);
        assert_eq!(PriceBasis::Nominal.current_index(137.5), 100.0);
        assert_eq!(PriceBasis::LatestIndex.current_index(137.5), 137.5);
    }
}
