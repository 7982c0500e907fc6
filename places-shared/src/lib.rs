//! # Places Shared
//!
//! Domain types shared by the ingestion pipeline, the search repository and
//! the service facade.

pub mod page;
pub mod record;
pub mod summary;

pub use page::{last_page, PageError, PageRequest, QueryPage, PAGE_SIZE};
pub use record::{Location, Record};
pub use summary::LoadSummary;
