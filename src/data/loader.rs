//! CSV snapshot loading.
//!
//! Each source is decoded with a list of candidate encodings (UTF-8 first, then Latin-1),
//! parsed as CSV, and adapted column-by-column to the domain's explicit schema.
//! The only side effect is reading the file.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::data::coercion::coerce_numeric;
use crate::domain::{Domain, SourceSchema, TableLayout};
use crate::error::{CoreError, Result};
use crate::models::{Dataset, RawSeries};
use crate::utils::time_utils::parse_month;

/// Character encodings tried, in order, when decoding a snapshot
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TextEncoding {
    Utf8,
    /// ISO-8859-1: every byte maps to the code point of the same value
    Latin1,
}

impl TextEncoding {
    pub const FALLBACK_ORDER: [TextEncoding; 2] = [TextEncoding::Utf8, TextEncoding::Latin1];

    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Latin1 => "Latin-1 (ISO-8859-1)",
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

/// A decoded CSV table: trimmed headers plus string cells
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub encoding: TextEncoding,
}

impl RawTable {
    /// Position of a required column; a table without it has an unexpected shape.
    pub fn column(&self, name: &str, source_name: &str) -> Result<usize> {
        self.headers.iter().position(|h| h == name).ok_or_else(|| {
            CoreError::load(
                source_name,
                format!(
                    "missing required column '{}' (found: {})",
                    name,
                    self.headers.join(", ")
                ),
            )
        })
    }

    /// Cell text, empty when the row is short
    pub fn cell(row: &[String], idx: usize) -> &str {
        row.get(idx).map(String::as_str).unwrap_or("")
    }
}

fn parse_csv(text: &str) -> std::result::Result<(Vec<String>, Vec<Vec<String>>), csv::Error> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok((headers, rows))
}

/// Decode and parse `bytes`, trying each encoding in turn until one yields a table.
pub fn read_table(bytes: &[u8], source_name: &str) -> Result<RawTable> {
    let mut failures: Vec<String> = Vec::new();

    for encoding in TextEncoding::FALLBACK_ORDER {
        let Some(text) = encoding.decode(bytes) else {
            failures.push(format!("{}: not valid", encoding.label()));
            continue;
        };
        match parse_csv(&text) {
            Ok((headers, _)) if headers.iter().all(|h| h.is_empty()) => {
                failures.push(format!("{}: no header row", encoding.label()));
            }
            Ok((headers, rows)) => {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_load_details {
                    log::info!(
                        "Decoded {} as {} ({} columns, {} rows)",
                        source_name,
                        encoding.label(),
                        headers.len(),
                        rows.len()
                    );
                }
                return Ok(RawTable {
                    headers,
                    rows,
                    encoding,
                });
            }
            Err(e) => failures.push(format!("{}: {}", encoding.label(), e)),
        }
    }

    Err(CoreError::load(
        source_name,
        format!("no encoding produced a readable table ({})", failures.join("; ")),
    ))
}

pub fn read_source(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| CoreError::load(path.display().to_string(), e.to_string()))
}

/// Load a domain's snapshot from disk.
pub fn load_dataset(domain: Domain, path: &Path) -> Result<Dataset> {
    let bytes = read_source(path)?;
    let dataset = build_dataset(domain, &bytes, &path.display().to_string())?;
    log::info!(
        "Loaded {} data from {}: {} entities",
        domain,
        path.display(),
        dataset.series.len()
    );
    Ok(dataset)
}

/// Same as `load_dataset`, for a snapshot already held in memory.
pub fn load_dataset_from_bytes(domain: Domain, bytes: &[u8]) -> Result<Dataset> {
    build_dataset(domain, bytes, &format!("{} snapshot", domain))
}

fn build_dataset(domain: Domain, bytes: &[u8], source_name: &str) -> Result<Dataset> {
    let table = read_table(bytes, source_name)?;
    let schema = domain.schema();

    let observations = match schema.layout {
        TableLayout::Long {
            date_column,
            entity_column,
            value_column,
        } => adapt_long(
            &table,
            &schema,
            [date_column, entity_column, value_column],
            source_name,
        )?,
        TableLayout::Wide { .. } => adapt_wide(&table, &schema, source_name)?,
    };

    if observations.is_empty() {
        return Err(CoreError::load(
            source_name,
            "no rows with a readable date and entity",
        ));
    }

    let series = observations
        .into_iter()
        .map(|(entity, obs)| RawSeries::from_observations(entity, obs));
    Ok(Dataset::new(domain, series))
}

type EntityObservations = BTreeMap<String, Vec<(NaiveDate, Option<f64>)>>;

fn adapt_long(
    table: &RawTable,
    schema: &SourceSchema,
    [date_column, entity_column, value_column]: [&str; 3],
    source_name: &str,
) -> Result<EntityObservations> {
    let date_idx = table.column(date_column, source_name)?;
    let entity_idx = table.column(entity_column, source_name)?;
    let value_idx = table.column(value_column, source_name)?;

    let mut observations = EntityObservations::new();
    let mut unreadable_dates = 0usize;

    for row in &table.rows {
        let entity = RawTable::cell(row, entity_idx);
        if entity.is_empty() || schema.is_excluded(entity) {
            continue;
        }
        let Some(month) = parse_month(RawTable::cell(row, date_idx), schema.date_formats()) else {
            unreadable_dates += 1;
            continue;
        };
        observations
            .entry(entity.to_string())
            .or_default()
            .push((month, coerce_numeric(RawTable::cell(row, value_idx))));
    }

    log_skipped_rows(source_name, unreadable_dates);
    Ok(observations)
}

fn adapt_wide(
    table: &RawTable,
    schema: &SourceSchema,
    source_name: &str,
) -> Result<EntityObservations> {
    let date_idx = table.column(schema.date_column(), source_name)?;
    let entity_columns: Vec<(usize, &str)> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| schema.is_entity_column(h))
        .map(|(i, h)| (i, h.as_str()))
        .collect();

    if entity_columns.is_empty() {
        return Err(CoreError::load(source_name, "no region columns found"));
    }

    let mut observations = EntityObservations::new();
    let mut unreadable_dates = 0usize;

    for row in &table.rows {
        let Some(month) = parse_month(RawTable::cell(row, date_idx), schema.date_formats()) else {
            unreadable_dates += 1;
            continue;
        };
        for (idx, entity) in &entity_columns {
            observations
                .entry(entity.to_string())
                .or_default()
                .push((month, coerce_numeric(RawTable::cell(row, *idx))));
        }
    }

    log_skipped_rows(source_name, unreadable_dates);
    Ok(observations)
}

fn log_skipped_rows(source_name: &str, unreadable_dates: usize) {
    if unreadable_dates > 0 {
        log::warn!(
            "⚠️  {}: skipped {} rows with an unreadable date",
            source_name,
            unreadable_dates
        );
    }
}
