//! Record parser for the tab-separated places export.
//!
//! Columns, in order: source id, name, address, phone, longitude, latitude.
//! The header row is skipped and the source id is ignored: records are
//! numbered 1, 2, 3, ... in file order.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{error, info, instrument};

use crate::errors::IngestError;
use places_shared::{Location, Record};

const COLUMNS: usize = 6;
const NAME: usize = 1;
const ADDRESS: usize = 2;
const PHONE: usize = 3;
const LONGITUDE: usize = 4;
const LATITUDE: usize = 5;

/// Read and parse the export at `path`.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<Record>, IngestError> {
    let file = File::open(path.as_ref()).map_err(|e| {
        error!(error = %e, "Cannot open file");
        IngestError::read(format!("{}: {}", path.as_ref().display(), e))
    })?;

    let records = parse_records(file)?;
    info!(count = records.len(), "Parsed places export");
    Ok(records)
}

/// Parse every data row of a tab-separated export.
///
/// Any malformed row or coordinate aborts the whole parse; no partial result
/// is ever returned.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<Record>, IngestError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        records.push(parse_row(index as u64 + 1, &row)?);
    }

    Ok(records)
}

fn parse_row(id: u64, row: &StringRecord) -> Result<Record, IngestError> {
    let line = row.position().map(|p| p.line()).unwrap_or(id + 1);

    if row.len() < COLUMNS {
        return Err(IngestError::MalformedRow {
            line,
            expected: COLUMNS,
            found: row.len(),
        });
    }

    let lon = parse_coordinate(line, "longitude", &row[LONGITUDE], Location::is_valid_lon)?;
    let lat = parse_coordinate(line, "latitude", &row[LATITUDE], Location::is_valid_lat)?;

    Ok(Record::new(
        id,
        &row[NAME],
        &row[ADDRESS],
        &row[PHONE],
        Location::new(lat, lon),
    ))
}

fn parse_coordinate(
    line: u64,
    field: &'static str,
    raw: &str,
    in_range: fn(f64) -> bool,
) -> Result<f64, IngestError> {
    let invalid = || {
        error!(line = line, field = field, value = %raw, "Incorrect coordinate");
        IngestError::InvalidCoordinate {
            line,
            field,
            value: raw.to_string(),
        }
    };

    let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if !in_range(value) {
        return Err(invalid());
    }
    Ok(value)
}
