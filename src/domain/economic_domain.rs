use serde::{Deserialize, Serialize};

use crate::analysis::holt_winters::ModelConfig;
use crate::config::{
    CLEANING, FOOD_SCHEMA, HOUSING_INDEX_MODEL, HOUSING_INDEX_SCHEMA, OIL_SCHEMA,
    SEASONAL_PRICE_MODEL, SOURCES, WAGE_SCHEMA,
};
use crate::data::cleaner::CleanPolicy;
use crate::domain::schema::SourceSchema;

/// The four economic areas with a forecastable snapshot.
/// Each one fixes its source schema, its cleaning policy and its model.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    strum_macros::EnumIter,
    strum_macros::Display,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Domain {
    Food,
    Oil,
    Wage,
    /// The housing price index (hpi.csv), keyed by region-month
    Housing,
}

impl Domain {
    pub fn schema(&self) -> SourceSchema {
        match self {
            Domain::Food => FOOD_SCHEMA,
            Domain::Oil => OIL_SCHEMA,
            Domain::Wage => WAGE_SCHEMA,
            Domain::Housing => HOUSING_INDEX_SCHEMA,
        }
    }

    pub fn model_config(&self) -> ModelConfig {
        match self {
            Domain::Housing => HOUSING_INDEX_MODEL,
            Domain::Food | Domain::Oil | Domain::Wage => SEASONAL_PRICE_MODEL,
        }
    }

    pub fn clean_policy(&self) -> CleanPolicy {
        match self {
            Domain::Housing => CLEANING.housing_index,
            Domain::Food | Domain::Oil | Domain::Wage => CLEANING.seasonal_series,
        }
    }

    pub fn default_file_name(&self) -> &'static str {
        match self {
            Domain::Food => SOURCES.food,
            Domain::Oil => SOURCES.oil,
            Domain::Wage => SOURCES.wage,
            Domain::Housing => SOURCES.housing_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::holt_winters::SeasonalMode;
    use strum::IntoEnumIterator;

    #[test]
    fn test_domain_presets() {
        assert_eq!(Domain::Housing.model_config().seasonal, SeasonalMode::None);
        assert!(Domain::Housing.model_config().trend);

        for domain in [Domain::Oil, Domain::Wage] {
            let model = domain.model_config();
            assert_eq!(model.seasonal, SeasonalMode::Multiplicative);
            assert_eq!(model.seasonal_period, 12);
            assert!(domain.clean_policy().positive_only);
            assert_eq!(domain.clean_policy().min_observations, 24);
        }
    }

    #[test]
    fn test_every_domain_has_a_source() {
        let names: Vec<&str> = Domain::iter().map(|d| d.default_file_name()).collect();
        assert_eq!(names, vec!["Food.csv", "Oil.csv", "Wage.csv", "hpi.csv"]);
        assert_eq!(Domain::Wage.to_string(), "wage");
    }
}
