//! Point-of-interest record stored in the search index.

use serde::{Deserialize, Serialize};

/// Geographic coordinate pair, serialized the way a `geo_point` field expects it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether both components are finite and inside the WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        Self::is_valid_lat(self.lat) && Self::is_valid_lon(self.lon)
    }

    pub fn is_valid_lat(lat: f64) -> bool {
        lat.is_finite() && (-90.0..=90.0).contains(&lat)
    }

    pub fn is_valid_lon(lon: f64) -> bool {
        lon.is_finite() && (-180.0..=180.0).contains(&lon)
    }
}

/// A single point of interest.
///
/// The `id` is assigned from the record's position in the source file
/// (1-based), never from the source's own ordinal column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub location: Location,
}

impl Record {
    pub fn new(
        id: u64,
        name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            address: address.into(),
            phone: phone.into(),
            location,
        }
    }
}
