//! CSV loader for sector return tables.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use recon_api::parse_date;
use recon_spi::Series;
use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};

/// How a return table is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Header of the date column; every other column is a sector.
    pub date_column: String,
    /// Factor applied to every value, 100.0 turns fractions into percent.
    pub scale: f64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            date_column: "date".to_string(),
            scale: 100.0,
        }
    }
}

impl LoadOptions {
    pub fn with_date_column(mut self, date_column: impl Into<String>) -> Self {
        self.date_column = date_column.into();
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

/// Load a date-indexed return table from a CSV file.
pub fn load_sector_returns(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Series> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let series = load_sector_returns_from_reader(BufReader::new(file), options)?;
    tracing::debug!(
        path = %path.display(),
        rows = series.len(),
        sectors = series.sector_count(),
        "loaded sector returns"
    );
    Ok(series)
}

/// Load a date-indexed return table from any CSV source.
///
/// Rows are numbered from 1, counting data rows only.
pub fn load_sector_returns_from_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Series> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let date_idx = headers
        .iter()
        .position(|h| h == options.date_column)
        .ok_or_else(|| DataError::MissingColumn(options.date_column.clone()))?;
    let sectors: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != date_idx)
        .map(|(i, h)| (i, h.to_string()))
        .collect();
    if sectors.is_empty() {
        return Err(DataError::NoData);
    }

    let mut dates = Vec::new();
    let mut rows = Vec::new();
    for (n, record) in reader.records().enumerate() {
        let record = record?;
        let row = n + 1;

        let raw_date = record.get(date_idx).unwrap_or_default();
        let date = parse_date(raw_date).map_err(|_| DataError::InvalidDate {
            row,
            value: raw_date.to_string(),
        })?;

        let values = sectors
            .iter()
            .map(|(i, name)| {
                let cell = record.get(*i).unwrap_or_default();
                cell.parse::<f64>().map_err(|_| DataError::ParseError {
                    row,
                    column: name.clone(),
                    value: cell.to_string(),
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        dates.push(date);
        rows.push(values);
    }
    if rows.is_empty() {
        return Err(DataError::NoData);
    }

    let names = sectors.into_iter().map(|(_, name)| name).collect();
    Ok(Series::new(names, dates, rows)?.scaled(options.scale))
}
