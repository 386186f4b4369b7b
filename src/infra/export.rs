use std::{
    fs, io,
    path::{Path, PathBuf},
};

use csv::Writer;
use thiserror::Error;
use tracing::info;

use crate::domain::{ConvertedListing, Listing};

pub const US_EXPORT_FILENAME: &str = "us_data.csv";
pub const EU_EXPORT_FILENAME: &str = "eu_data.csv";

const US_HEADER: [&str; 8] = [
    "Model",
    "Year",
    "Price_USD",
    "Mileage_miles",
    "Condition",
    "Region",
    "Price_EUR",
    "Mileage_km",
];

const EU_HEADER: [&str; 6] = [
    "Model",
    "Year",
    "Price_EUR",
    "Mileage_km",
    "Condition",
    "Country",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("CSV writer error: {0}")]
    Flush(String),
    #[error("CSV output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub fn us_csv(rows: &[ConvertedListing]) -> Result<String, ExportError> {
    let mut wtr = Writer::from_writer(vec![]);
    wtr.write_record(US_HEADER)?;
    for row in rows {
        let listing = &row.listing;
        wtr.write_record([
            listing.model.clone(),
            listing.year.to_string(),
            listing.price.to_string(),
            listing.mileage.to_string(),
            listing.condition.to_string(),
            listing.location.clone(),
            format!("{:.2}", row.price_eur),
            row.mileage_km.to_string(),
        ])?;
    }
    finish(wtr)
}

pub fn eu_csv(rows: &[Listing]) -> Result<String, ExportError> {
    let mut wtr = Writer::from_writer(vec![]);
    wtr.write_record(EU_HEADER)?;
    for row in rows {
        wtr.write_record([
            row.model.clone(),
            row.year.to_string(),
            row.price.to_string(),
            row.mileage.to_string(),
            row.condition.to_string(),
            row.location.clone(),
        ])?;
    }
    finish(wtr)
}

fn finish(wtr: Writer<Vec<u8>>) -> Result<String, ExportError> {
    let data = wtr
        .into_inner()
        .map_err(|err| ExportError::Flush(err.to_string()))?;
    Ok(String::from_utf8(data)?)
}

/// Writes `contents` to `dir/filename`, creating `dir` when needed.
pub fn write_export(dir: &Path, filename: &str, contents: &str) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    fs::write(&path, contents.as_bytes())?;
    info!("[export] wrote {} bytes to {}", contents.len(), path.display());
    Ok(path)
}
