//! Error types for the places repository.

mod search_error;

pub use search_error::SearchError;
