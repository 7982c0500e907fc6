//! Response bodies served by the facade.

use serde::Serialize;

use places_shared::{QueryPage, Record};

/// Paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacesResponse {
    pub name: &'static str,
    pub total: u64,
    pub places: Vec<Record>,
    pub prev_page: u64,
    pub next_page: u64,
    pub last_page: u64,
}

impl From<QueryPage> for PlacesResponse {
    fn from(page: QueryPage) -> Self {
        Self {
            name: "Places",
            total: page.total,
            places: page.records,
            prev_page: page.prev_page,
            next_page: page.next_page,
            last_page: page.last_page,
        }
    }
}

/// Nearest places, closest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendResponse {
    pub name: &'static str,
    pub places: Vec<Record>,
}

impl RecommendResponse {
    pub fn new(places: Vec<Record>) -> Self {
        Self {
            name: "Recommendation",
            places,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
