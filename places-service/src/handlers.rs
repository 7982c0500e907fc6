//! Request handlers for the places service.

use std::fmt;
use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::errors::ServiceError;
use crate::gate::{token_cookie, AccessGate, GateError};
use crate::payloads::{PlacesResponse, RecommendResponse, TokenResponse};
use places_repository::{PlaceStore, SearchError};
use places_shared::{Location, PageError, PageRequest, QueryPage};

/// Number of places returned by a recommendation.
pub const RECOMMENDATION_COUNT: u64 = 3;

/// The credential pair accepted by `issue_token`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new("user", "qwerty")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A freshly issued token: the response body plus its `Set-Cookie` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub response: TokenResponse,
    pub cookie: String,
}

/// Listing, recommendation and token endpoints over a place store.
pub struct PlacesService {
    store: Arc<dyn PlaceStore>,
    gate: Arc<dyn AccessGate>,
    credentials: Credentials,
}

impl PlacesService {
    pub fn new(
        store: Arc<dyn PlaceStore>,
        gate: Arc<dyn AccessGate>,
        credentials: Credentials,
    ) -> Self {
        Self {
            store,
            gate,
            credentials,
        }
    }

    /// One page of the listing, ten places per page.
    #[instrument(skip(self))]
    pub async fn places(&self, page: &str) -> Result<PlacesResponse, ServiceError> {
        let request = PageRequest::parse(page)?;

        let (records, total) = self
            .store
            .list_page(request.limit(), request.offset())
            .await
            .map_err(|e| match e {
                SearchError::InvalidQuery(msg) => {
                    warn!(error = %msg, "Page outside result window");
                    ServiceError::InvalidPage(PageError::BeyondWindow(request.page()))
                }
                other => {
                    error!(error = %other, "Cannot get places");
                    ServiceError::BackendUnavailable(other)
                }
            })?;

        let page = QueryPage::build(request, total, records)?;
        Ok(page.into())
    }

    /// The places nearest to `(lat, lon)`.
    ///
    /// The token is checked before anything else; a rejected token never
    /// reaches the store.
    #[instrument(skip(self, token))]
    pub async fn recommend(
        &self,
        token: Option<&str>,
        lat: &str,
        lon: &str,
    ) -> Result<RecommendResponse, ServiceError> {
        let token = token.ok_or(ServiceError::AccessDenied(GateError::Missing))?;
        let claims = self.gate.verify(token).map_err(|e| {
            warn!(error = %e, "Access denied");
            ServiceError::AccessDenied(e)
        })?;

        let location = parse_location(lat, lon)?;

        let places = self
            .store
            .nearest(RECOMMENDATION_COUNT, location.lat, location.lon)
            .await
            .map_err(|e| match e {
                SearchError::InvalidQuery(msg) => ServiceError::InvalidCoordinates(msg),
                other => {
                    error!(error = %other, "Cannot get closest places");
                    ServiceError::BackendUnavailable(other)
                }
            })?;

        info!(subject = %claims.sub, count = places.len(), "Served recommendation");
        Ok(RecommendResponse::new(places))
    }

    /// Issue an access token for a matching credential pair.
    #[instrument(skip(self, password))]
    pub fn issue_token(&self, username: &str, password: &str) -> Result<TokenGrant, ServiceError> {
        if !self.credentials.matches(username, password) {
            warn!("Invalid credentials");
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self.gate.issue(username).map_err(|e| {
            error!(error = %e, "Cannot create token");
            ServiceError::TokenIssueFailed(e)
        })?;

        Ok(TokenGrant {
            cookie: token_cookie(&token, self.gate.token_ttl()),
            response: TokenResponse { token },
        })
    }
}

fn parse_location(lat: &str, lon: &str) -> Result<Location, ServiceError> {
    let parse = |field: &str, raw: &str| {
        raw.trim()
            .parse::<f64>()
            .map_err(|_| ServiceError::InvalidCoordinates(format!("{} = '{}'", field, raw)))
    };

    let location = Location::new(parse("lat", lat)?, parse("lon", lon)?);
    if !location.is_valid() {
        return Err(ServiceError::InvalidCoordinates(format!(
            "({}, {}) out of range",
            location.lat, location.lon
        )));
    }
    Ok(location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{GateConfig, JwtGate};
    use async_trait::async_trait;
    use places_shared::Record;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock place store over an in-memory list.
    struct MockStore {
        records: Vec<Record>,
        list_calls: AtomicUsize,
        nearest_calls: AtomicUsize,
        fail: bool,
    }

    impl MockStore {
        fn with_records(count: u64) -> Self {
            let records = (1..=count)
                .map(|id| {
                    Record::new(
                        id,
                        format!("Place {}", id),
                        "addr",
                        "phone",
                        Location::new(55.0 + id as f64 * 0.01, 37.0),
                    )
                })
                .collect();
            Self {
                records,
                list_calls: AtomicUsize::new(0),
                nearest_calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::with_records(0)
            }
        }
    }

    #[async_trait]
    impl PlaceStore for MockStore {
        async fn list_page(
            &self,
            limit: u64,
            offset: u64,
        ) -> Result<(Vec<Record>, u64), SearchError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SearchError::connection("refused"));
            }
            if offset + limit > 20_000 {
                return Err(SearchError::invalid_query("window exceeded"));
            }
            let page = self
                .records
                .iter()
                .skip(offset as usize)
                .take(limit as usize)
                .cloned()
                .collect();
            Ok((page, self.records.len() as u64))
        }

        async fn nearest(&self, k: u64, lat: f64, _lon: f64) -> Result<Vec<Record>, SearchError> {
            self.nearest_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SearchError::connection("refused"));
            }
            let mut sorted = self.records.clone();
            sorted.sort_by(|a, b| {
                (a.location.lat - lat)
                    .abs()
                    .total_cmp(&(b.location.lat - lat).abs())
                    .then(a.id.cmp(&b.id))
            });
            sorted.truncate(k as usize);
            Ok(sorted)
        }
    }

    fn service(store: MockStore) -> (PlacesService, Arc<MockStore>, Arc<JwtGate>) {
        let store = Arc::new(store);
        let gate = Arc::new(JwtGate::new(GateConfig::new("test-secret")));
        let service = PlacesService::new(store.clone(), gate.clone(), Credentials::default());
        (service, store, gate)
    }

    #[tokio::test]
    async fn test_places_first_page() {
        let (service, _, _) = service(MockStore::with_records(25));
        let response = service.places("1").await.unwrap();

        assert_eq!(response.name, "Places");
        assert_eq!(response.total, 25);
        assert_eq!(response.places.len(), 10);
        assert_eq!(response.places[0].id, 1);
        assert_eq!(response.prev_page, 0);
        assert_eq!(response.next_page, 2);
        assert_eq!(response.last_page, 2);
    }

    #[tokio::test]
    async fn test_places_last_page() {
        let (service, _, _) = service(MockStore::with_records(25));
        let response = service.places("2").await.unwrap();

        assert_eq!(response.places[0].id, 11);
        assert_eq!(response.prev_page, 1);
        assert_eq!(response.next_page, 0);
    }

    #[tokio::test]
    async fn test_places_single_page_has_no_neighbours() {
        let (service, _, _) = service(MockStore::with_records(15));
        let response = service.places("1").await.unwrap();

        assert_eq!(response.last_page, 1);
        assert_eq!(response.prev_page, 0);
        assert_eq!(response.next_page, 0);
    }

    #[tokio::test]
    async fn test_places_invalid_pages() {
        let (service, store, _) = service(MockStore::with_records(25));

        for page in ["foo", "0", "-1", "3", "", "100000"] {
            let err = service.places(page).await.unwrap_err();
            assert_eq!(err.reason(), "invalid_page", "page {:?}", page);
            assert_eq!(err.status_code(), 400);
        }
        // Non-numeric and non-positive pages never reach the store.
        assert_eq!(store.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_places_huge_page_is_client_error() {
        let (service, store, _) = service(MockStore::with_records(25));

        let err = service.places("9223372036854775807").await.unwrap_err();

        assert_eq!(err.reason(), "invalid_page");
        assert_eq!(err.status_code(), 400);
        assert_eq!(store.list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_places_backend_failure() {
        let (service, _, _) = service(MockStore::failing());
        let err = service.places("1").await.unwrap_err();

        assert_eq!(err.reason(), "backend_unavailable");
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_recommend_with_valid_token() {
        let (service, _, gate) = service(MockStore::with_records(10));
        let token = gate.issue("user").unwrap();

        let response = service
            .recommend(Some(&token), "55.051", "37.0")
            .await
            .unwrap();

        assert_eq!(response.name, "Recommendation");
        let ids: Vec<u64> = response.places.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 6, 4]);
    }

    #[tokio::test]
    async fn test_recommend_rejects_before_store() {
        let (service, store, _) = service(MockStore::with_records(10));
        let foreign = JwtGate::new(GateConfig::new("other-secret"))
            .issue("user")
            .unwrap();

        for token in [None, Some(""), Some("garbage"), Some(foreign.as_str())] {
            let err = service.recommend(token, "55.0", "37.0").await.unwrap_err();
            assert_eq!(err.reason(), "access_denied");
            assert_eq!(err.status_code(), 401);
        }
        assert_eq!(store.nearest_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_recommend_invalid_coordinates() {
        let (service, store, gate) = service(MockStore::with_records(10));
        let token = gate.issue("user").unwrap();

        for (lat, lon) in [("north", "37.0"), ("55.0", ""), ("91.0", "37.0"), ("55.0", "181")] {
            let err = service.recommend(Some(&token), lat, lon).await.unwrap_err();
            assert_eq!(err.reason(), "invalid_coordinates");
        }
        assert_eq!(store.nearest_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_recommend_backend_failure() {
        let (service, _, gate) = service(MockStore::failing());
        let token = gate.issue("user").unwrap();

        let err = service
            .recommend(Some(&token), "55.0", "37.0")
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "backend_unavailable");
    }

    #[test]
    fn test_issue_token() {
        let (service, _, gate) = service(MockStore::with_records(0));
        let grant = service.issue_token("user", "qwerty").unwrap();

        assert_eq!(gate.verify(&grant.response.token).unwrap().sub, "user");
        assert_eq!(
            grant.cookie,
            format!(
                "token={}; Max-Age=60; Path=/; HttpOnly; Secure",
                grant.response.token
            )
        );
    }

    #[test]
    fn test_issue_token_wrong_credentials() {
        let (service, _, _) = service(MockStore::with_records(0));

        let err = service.issue_token("user", "wrong").unwrap_err();
        assert_eq!(err.reason(), "invalid_credentials");
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let debug = format!("{:?}", Credentials::default());
        assert!(!debug.contains("qwerty"));
    }
}
