//! Request pipelines: load -> resolve -> clean -> fit -> forecast -> translate.
//!
//! Every public request loads its own snapshot from disk. Nothing is cached or shared
//! between calls, so each one is a complete, independent computation.

use std::time::Instant;

use chrono::{Datelike, NaiveDate};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::analysis::{
    ForecastConfig, Horizon, PriceBasis, PricePoint, RegionalAverage, TrendPoint,
    fit_and_forecast, national_trend, regional_snapshot, translate_price,
};
use crate::config::CLEANING;
use crate::data::{clean, load_dataset, load_listings};
use crate::domain::Domain;
use crate::error::{CoreError, Result};
use crate::models::{Dataset, ListingCriteria, ListingTable};

use super::requests::{
    EntityForecast, ForecastRequest, HousingPriceRequest, ReferenceValue, SnapshotRequest,
    TrendRequest, domain_source, listings_source,
};
use crate::utils::time_utils::first_of_month;

pub fn forecast_entity(request: &ForecastRequest) -> Result<EntityForecast> {
    let started = Instant::now();
    let dataset = load_dataset(request.domain, &domain_source(&request.data_dir, request.domain))?;
    let result = forecast_in_dataset(
        &dataset,
        &request.entity,
        request.horizon,
        request.reference,
    );
    report_timing("forecast", started);
    result
}

/// Forecast an entity of an already loaded dataset with the dataset's domain presets.
/// `reference` picks a month whose raw value is returned alongside (the "current" value).
pub fn forecast_in_dataset(
    dataset: &Dataset,
    entity: &str,
    horizon: Horizon,
    reference: Option<NaiveDate>,
) -> Result<EntityForecast> {
    let raw = dataset.resolve_entity(entity)?;
    let history = clean(raw, &dataset.domain.clean_policy())?;
    let config = ForecastConfig {
        model: dataset.domain.model_config(),
        horizon,
    };
    let forecast = fit_and_forecast(&history, &config)?;
    let reference = reference.map(|month| {
        let month = first_of_month(month);
        ReferenceValue {
            month,
            value: raw.value_at(month.year(), month.month()),
        }
    });

    Ok(EntityForecast {
        domain: dataset.domain,
        entity: raw.entity.clone(),
        history,
        forecast,
        reference,
    })
}

pub fn predict_housing_price(request: &HousingPriceRequest) -> Result<PricePoint> {
    let started = Instant::now();
    let listings = load_listings(&listings_source(&request.data_dir))?;
    let index = load_dataset(
        Domain::Housing,
        &domain_source(&request.data_dir, Domain::Housing),
    )?;
    let result = price_from_sources(
        &index,
        &listings,
        &request.criteria,
        request.horizon,
        request.basis,
    );
    report_timing("housing price", started);
    result
}

/// Listing average for the criteria, rescaled by the city's index forecast at the end of
/// the horizon.
pub fn price_from_sources(
    index: &Dataset,
    listings: &ListingTable,
    criteria: &ListingCriteria,
    horizon: Horizon,
    basis: PriceBasis,
) -> Result<PricePoint> {
    let current_price = listings.average_price(criteria)?;
    let projection = forecast_in_dataset(index, &criteria.city, horizon, None)?;

    let (forecast_month, forecasted_index) = projection
        .forecast
        .last()
        .ok_or_else(|| CoreError::InvalidHorizon("forecast is empty".to_string()))?;
    let latest_index = projection
        .history
        .last_value()
        .ok_or(CoreError::InsufficientData {
            required: 1,
            actual: 0,
        })?;
    let current_index = basis.current_index(latest_index);
    let forecast_price = translate_price(current_price, current_index, forecasted_index)?;

    log::info!(
        "🏠 {} ({}): {:.0} -> {:.0} by {}",
        criteria.city,
        projection.entity,
        current_price,
        forecast_price,
        forecast_month
    );

    Ok(PricePoint {
        city: criteria.city.clone(),
        province: criteria.province.clone(),
        region: projection.entity,
        beds: criteria.beds,
        baths: criteria.baths,
        basis,
        current_price,
        current_index,
        forecast_month,
        forecasted_index,
        forecast_price,
    })
}

pub fn regional_snapshot_request(request: &SnapshotRequest) -> Result<Vec<RegionalAverage>> {
    let started = Instant::now();
    let dataset = load_dataset(request.domain, &domain_source(&request.data_dir, request.domain))?;
    let result = regional_snapshot(&dataset, request.year, request.month);
    report_timing("regional snapshot", started);
    result
}

pub fn national_trend_request(request: &TrendRequest) -> Result<Vec<TrendPoint>> {
    let started = Instant::now();
    let dataset = load_dataset(request.domain, &domain_source(&request.data_dir, request.domain))?;
    let window = request.window.unwrap_or(CLEANING.trend_window);
    let trend = national_trend(&dataset, window);
    if trend.is_empty() {
        log::warn!(
            "⚠️  No {} values inside {:?}..{:?}",
            request.domain,
            window.from,
            window.to
        );
    }
    report_timing("national trend", started);
    Ok(trend)
}

fn report_timing(label: &str, started: Instant) {
    let elapsed_ms = started.elapsed().as_millis();
    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_request_timing {
        log::info!("⏱️  {} request took {} ms", label, elapsed_ms);
        return;
    }
    log::debug!("{} request took {} ms", label, elapsed_ms);
}
