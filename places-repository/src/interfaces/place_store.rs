//! Read-only capability over the places index.
//!
//! The service layer depends on this trait only, so it never sees backend
//! query types and can be tested against a mock store.

use async_trait::async_trait;

use crate::errors::SearchError;
use places_shared::Record;

/// Listing and nearest-neighbor reads over stored places.
#[async_trait]
pub trait PlaceStore: Send + Sync {
    /// Fetch `limit` records starting at `offset`, ordered by `id` ascending.
    ///
    /// # Returns
    ///
    /// * `Ok((records, total))` - The page and the exact number of matches
    /// * `Err(SearchError)` - If the parameters are invalid or the search fails
    async fn list_page(&self, limit: u64, offset: u64) -> Result<(Vec<Record>, u64), SearchError>;

    /// Fetch at most `k` records closest to `(lat, lon)`, nearest first.
    ///
    /// Records at exactly equal distance are ordered by `id` ascending.
    async fn nearest(&self, k: u64, lat: f64, lon: f64) -> Result<Vec<Record>, SearchError>;
}
