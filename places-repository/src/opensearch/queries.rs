//! OpenSearch query builders.
//!
//! This module builds the request bodies for the listing and
//! nearest-neighbor queries. Both match every document; they differ only in
//! sort and window.

use serde_json::{json, Value};

/// Build the listing query: every document, sorted by `id` ascending.
///
/// The total hit count is tracked exactly so page counts are reliable past
/// the backend's default 10,000 cap.
pub fn build_list_page_query(limit: u64, offset: u64) -> Value {
    json!({
        "query": {
            "match_all": {}
        },
        "sort": [
            { "id": { "order": "asc" } }
        ],
        "size": limit,
        "from": offset,
        "track_total_hits": true
    })
}

/// Build the nearest-neighbor query around `(lat, lon)`.
///
/// Documents are sorted by great-circle (`arc`) distance in kilometers,
/// taking the minimum distance per document and skipping documents whose
/// `location` is unmapped. Equal distances fall back to `id` ascending.
pub fn build_nearest_query(k: u64, lat: f64, lon: f64) -> Value {
    json!({
        "query": {
            "match_all": {}
        },
        "sort": [
            {
                "_geo_distance": {
                    "location": {
                        "lat": lat,
                        "lon": lon
                    },
                    "order": "asc",
                    "unit": "km",
                    "mode": "min",
                    "distance_type": "arc",
                    "ignore_unmapped": true
                }
            },
            { "id": { "order": "asc" } }
        ],
        "size": k
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_list_page_query() {
        let query = build_list_page_query(10, 20);

        assert!(query["query"]["match_all"].is_object());
        assert_eq!(query["sort"][0]["id"]["order"], "asc");
        assert_eq!(query["size"], 10);
        assert_eq!(query["from"], 20);
        assert_eq!(query["track_total_hits"], true);
    }

    #[test]
    fn test_build_nearest_query() {
        let query = build_nearest_query(3, 55.674, 37.666);

        assert!(query["query"]["match_all"].is_object());
        assert_eq!(query["size"], 3);
        assert!(query.get("from").is_none());

        let geo = &query["sort"][0]["_geo_distance"];
        assert_eq!(geo["location"]["lat"], 55.674);
        assert_eq!(geo["location"]["lon"], 37.666);
        assert_eq!(geo["order"], "asc");
        assert_eq!(geo["unit"], "km");
        assert_eq!(geo["mode"], "min");
        assert_eq!(geo["distance_type"], "arc");
        assert_eq!(geo["ignore_unmapped"], true);
    }

    #[test]
    fn test_nearest_query_tie_break_by_id() {
        let query = build_nearest_query(3, 0.0, 0.0);
        let sort = query["sort"].as_array().unwrap();

        assert_eq!(sort.len(), 2);
        assert_eq!(sort[1]["id"]["order"], "asc");
    }
}
