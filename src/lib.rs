#![allow(clippy::const_is_empty)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod models;
pub mod utils;

// Request pipelines on top of the core
pub mod engine;

// Re-export commonly used types
pub use analysis::{Horizon, PriceBasis, fit_and_forecast, translate_price};
pub use data::{clean, load_dataset, load_dataset_from_bytes};
pub use domain::Domain;
pub use error::{CoreError, Result};
pub use models::{Dataset, ForecastResult, RawSeries, TimeSeries};

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
// CLI argument parsing
use clap::{Args, Parser, Subcommand};
use strum::IntoEnumIterator;

use crate::config::SOURCES;
use crate::data::YearRange;
use crate::engine::{
    ForecastRequest, HousingPriceRequest, SnapshotRequest, TrendRequest, forecast_entity,
    national_trend_request, predict_housing_price, regional_snapshot_request,
};
use crate::engine::requests::domain_source;
use crate::models::ListingCriteria;
use crate::utils::TimeUtils;
use crate::utils::time_utils::parse_month;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Forecasts for food, oil, wage and housing indicators", long_about = None)]
pub struct Cli {
    /// Directory holding the CSV snapshots
    #[arg(long, global = true, default_value = SOURCES.data_dir)]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Forecast one entity (province, city or region) of a domain
    Forecast {
        #[arg(value_enum)]
        domain: Domain,
        entity: String,
        #[command(flatten)]
        horizon: HorizonArgs,
        /// Also report the recorded value for this month (e.g. 2024-03)
        #[arg(long, value_parser = parse_cli_month)]
        reference: Option<NaiveDate>,
    },
    /// Forecast a home price from the listings and the housing index
    Price {
        #[arg(long)]
        city: String,
        #[arg(long)]
        province: String,
        #[arg(long)]
        beds: u32,
        #[arg(long)]
        baths: u32,
        /// Index level the listing price is quoted at
        #[arg(long, value_enum, default_value_t = PriceBasis::Nominal)]
        basis: PriceBasis,
        #[command(flatten)]
        horizon: HorizonArgs,
    },
    /// Value of every entity for one month
    Snapshot {
        #[arg(value_enum)]
        domain: Domain,
        #[arg(long)]
        year: i32,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
    },
    /// Mean across entities per month
    Trend {
        #[arg(value_enum)]
        domain: Domain,
        #[arg(long = "from")]
        from_year: Option<i32>,
        #[arg(long = "to")]
        to_year: Option<i32>,
    },
    /// List the entities of one domain, or of every domain
    Entities {
        #[arg(value_enum)]
        domain: Option<Domain>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct HorizonArgs {
    /// Months to forecast after the last observation
    #[arg(long, default_value_t = 12)]
    pub months: usize,

    /// Forecast every month up to and including this one (e.g. 2024-12)
    #[arg(long, value_parser = parse_cli_month, conflicts_with = "months")]
    pub through: Option<NaiveDate>,

    /// First month of interest; defaults to the `--through` month
    #[arg(long, value_parser = parse_cli_month, requires = "through")]
    pub from: Option<NaiveDate>,
}

impl HorizonArgs {
    pub fn horizon(&self) -> Horizon {
        match self.through {
            Some(end) => Horizon::Through {
                start: self.from.unwrap_or(end),
                end,
            },
            None => Horizon::Periods(self.months),
        }
    }
}

fn parse_cli_month(token: &str) -> std::result::Result<NaiveDate, String> {
    parse_month(token, &[TimeUtils::STANDARD_MONTH_FORMAT])
        .or_else(|| parse_month(token, TimeUtils::FLEXIBLE_DATE_FORMATS))
        .ok_or_else(|| format!("expected a month like 2024-12, got {:?}", token))
}

/// Execute one CLI command and return its result as JSON
pub fn run_command(cli: &Cli) -> anyhow::Result<serde_json::Value> {
    let data_dir = cli.data_dir.clone();
    let value = match &cli.command {
        Command::Forecast {
            domain,
            entity,
            horizon,
            reference,
        } => {
            let request = ForecastRequest {
                data_dir,
                domain: *domain,
                entity: entity.clone(),
                horizon: horizon.horizon(),
                reference: *reference,
            };
            let result = forecast_entity(&request)
                .with_context(|| format!("forecasting {} for {:?}", domain, entity))?;
            serde_json::to_value(result)?
        }
        Command::Price {
            city,
            province,
            beds,
            baths,
            basis,
            horizon,
        } => {
            let request = HousingPriceRequest {
                data_dir,
                criteria: ListingCriteria {
                    city: city.clone(),
                    province: province.clone(),
                    beds: *beds,
                    baths: *baths,
                },
                horizon: horizon.horizon(),
                basis: *basis,
            };
            let result = predict_housing_price(&request)
                .with_context(|| format!("pricing a {} bed / {} bath home in {}", beds, baths, city))?;
            serde_json::to_value(result)?
        }
        Command::Snapshot {
            domain,
            year,
            month,
        } => {
            let request = SnapshotRequest {
                data_dir,
                domain: *domain,
                year: *year,
                month: *month,
            };
            let result = regional_snapshot_request(&request)
                .with_context(|| format!("{} snapshot for {}-{:02}", domain, year, month))?;
            serde_json::to_value(result)?
        }
        Command::Trend {
            domain,
            from_year,
            to_year,
        } => {
            let window = (from_year.is_some() || to_year.is_some()).then_some(YearRange {
                from: *from_year,
                to: *to_year,
            });
            let request = TrendRequest {
                data_dir,
                domain: *domain,
                window,
            };
            let result = national_trend_request(&request)
                .with_context(|| format!("{} trend", domain))?;
            serde_json::to_value(result)?
        }
        Command::Entities { domain } => {
            let domains: Vec<Domain> = match domain {
                Some(domain) => vec![*domain],
                None => Domain::iter().collect(),
            };
            let mut listing = serde_json::Map::new();
            for domain in domains {
                let path = domain_source(&data_dir, domain);
                let dataset = load_dataset(domain, &path)
                    .with_context(|| format!("loading {}", path.display()))?;
                listing.insert(domain.to_string(), serde_json::to_value(dataset.entities())?);
            }
            serde_json::Value::Object(listing)
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time_utils::month_start;

    #[test]
    fn test_cli_horizons() {
        let cli = Cli::parse_from([
            "econ-forecast",
            "forecast",
            "oil",
            "Ontario",
            "--months",
            "6",
            "--reference",
            "2020-03",
        ]);
        let Command::Forecast {
            horizon, reference, ..
        } = &cli.command
        else {
            panic!("expected forecast command");
        };
        assert_eq!(horizon.horizon(), Horizon::Periods(6));
        assert_eq!(*reference, month_start(2020, 3));
        assert_eq!(cli.data_dir, PathBuf::from("data"));

        let cli = Cli::parse_from([
            "econ-forecast",
            "--data-dir",
            "/tmp/snapshots",
            "price",
            "--city",
            "Toronto",
            "--province",
            "Ontario",
            "--beds",
            "3",
            "--baths",
            "2",
            "--through",
            "2024-12",
        ]);
        let Command::Price { horizon, basis, .. } = &cli.command else {
            panic!("expected price command");
        };
        assert_eq!(*basis, PriceBasis::Nominal);
        let end = month_start(2024, 12).unwrap();
        assert_eq!(horizon.horizon(), Horizon::Through { start: end, end });
    }

    #[test]
    fn test_cli_rejects_bad_input() {
        assert!(Cli::try_parse_from(["econ-forecast", "snapshot", "oil", "--year", "2020", "--month", "13"]).is_err());
        assert!(Cli::try_parse_from(["econ-forecast", "forecast", "gold", "Ontario"]).is_err());
        assert!(
            Cli::try_parse_from([
                "econ-forecast",
                "forecast",
                "wage",
                "Ontario",
                "--through",
                "December"
            ])
            .is_err()
        );
    }
}
