//! OpenSearch index configuration and mappings.
//!
//! This module defines the mappings and settings for the places index.

use serde_json::{json, Value};

/// The default name of the places index.
pub const INDEX_NAME: &str = "places";

/// Default for `index.max_result_window`. The backend default of 10,000 is
/// too shallow to page through the whole dataset.
pub const DEFAULT_MAX_RESULT_WINDOW: u64 = 20_000;

/// Get the create-index body for the places index.
///
/// The mappings declare:
/// - **id**: integer, the listing sort key
/// - **name / address / phone**: free text
/// - **location**: `geo_point`, the target of distance sorts
pub fn get_index_mappings() -> Value {
    json!({
        "mappings": {
            "properties": {
                "id": {
                    "type": "integer"
                },
                "name": {
                    "type": "text"
                },
                "address": {
                    "type": "text"
                },
                "phone": {
                    "type": "text"
                },
                "location": {
                    "type": "geo_point"
                }
            }
        }
    })
}

/// Get the settings body applied after the index is created.
pub fn get_index_settings(max_result_window: u64) -> Value {
    json!({
        "index": {
            "max_result_window": max_result_window
        }
    })
}
