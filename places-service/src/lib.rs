//! # Places Service
//!
//! Transport-agnostic facade over the places query engine.
//!
//! - `places(page)` serves the paginated listing
//! - `recommend(token, lat, lon)` serves the three nearest places, behind the
//!   access gate
//! - `issue_token(username, password)` hands out short-lived access tokens
//!
//! Every failure maps to a `ServiceError` with a short reason string and a
//! status code; backend details never reach the payload.

pub mod errors;
pub mod gate;
pub mod handlers;
pub mod payloads;

pub use errors::{ErrorPayload, ServiceError};
pub use gate::{
    token_cookie, token_from_cookie_header, AccessGate, Claims, GateConfig, GateError, JwtGate,
};
pub use handlers::{Credentials, PlacesService, TokenGrant, RECOMMENDATION_COUNT};
pub use payloads::{PlacesResponse, RecommendResponse, TokenResponse};
