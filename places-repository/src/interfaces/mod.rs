//! Interface definitions for the search backend.
//!
//! `SearchEngineClient` abstracts the raw backend so the provisioner, the
//! bulk loader and the query engine can run against mocks; `PlaceStore` is
//! the narrow capability handed to the service layer.

mod place_store;
mod search_engine_client;

pub use place_store::PlaceStore;
pub use search_engine_client::SearchEngineClient;
