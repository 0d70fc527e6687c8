//! Typed HTTP client for the sniffer backend.
//!
//! One method per endpoint. Each request is sent once: a non-success status
//! fails with the endpoint's fixed message, and a body that does not decode
//! into the declared shape fails as a malformed response. Nothing is cached
//! and concurrent identical requests are not coalesced.

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use validator::Validate;

use domain::models::{
    CreateIdentity, Device, DeviceActivity, DeviceIdentity, DeviceQuery, DeviceUpdate,
    DeviceWithStats, FingerprintWithDetails, FingerprintsResponse, HealthStatus, LinkFingerprint,
    LinkFingerprintResponse, OverviewStats, RecentQuery, Sighting, SightingsQuery,
    SightingsResponse, UpdateAlias,
};
use shared::pagination::PageQuery;

use crate::config::BackendConfig;
use crate::error::ClientError;
use crate::metrics::RequestTimer;

/// Name and failure message of one backend endpoint.
#[derive(Debug, Clone, Copy)]
struct Endpoint {
    name: &'static str,
    failure: &'static str,
}

impl Endpoint {
    const fn new(name: &'static str, failure: &'static str) -> Self {
        Self { name, failure }
    }
}

const GET_DEVICES: Endpoint = Endpoint::new("get_devices", "Failed to fetch devices");
const GET_DEVICE: Endpoint = Endpoint::new("get_device", "Failed to fetch device");
const UPDATE_DEVICE: Endpoint = Endpoint::new("update_device", "Failed to update device");
const GET_DEVICE_ACTIVITY: Endpoint =
    Endpoint::new("get_device_activity", "Failed to fetch device activity");
const GET_SIGHTINGS: Endpoint = Endpoint::new("get_sightings", "Failed to fetch sightings");
const GET_RECENT_SIGHTINGS: Endpoint =
    Endpoint::new("get_recent_sightings", "Failed to fetch recent sightings");
const GET_OVERVIEW_STATS: Endpoint =
    Endpoint::new("get_overview_stats", "Failed to fetch overview stats");
const GET_IDENTITIES: Endpoint = Endpoint::new("get_identities", "Failed to fetch identities");
const GET_IDENTITY: Endpoint = Endpoint::new("get_identity", "Failed to fetch identity");
const CREATE_IDENTITY: Endpoint = Endpoint::new("create_identity", "Failed to create identity");
const UPDATE_IDENTITY_ALIAS: Endpoint =
    Endpoint::new("update_identity_alias", "Failed to update alias");
const LINK_FINGERPRINT: Endpoint = Endpoint::new("link_fingerprint", "Failed to link fingerprint");
const GET_FINGERPRINTS: Endpoint =
    Endpoint::new("get_fingerprints", "Failed to fetch fingerprints");
const GET_FINGERPRINT: Endpoint = Endpoint::new("get_fingerprint", "Failed to fetch fingerprint");
const HEALTH: Endpoint = Endpoint::new("health", "Failed to fetch health status");

/// Client for the sniffer REST API.
#[derive(Debug, Clone)]
pub struct SnifferClient {
    http: Client,
    base_url: Url,
}

impl SnifferClient {
    /// Create a client for the configured backend origin.
    pub fn new(config: &BackendConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "base URL cannot carry paths: {}",
                base_url
            )));
        }

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ------------------------------------------------------------------------
    // Devices
    // ------------------------------------------------------------------------

    /// `GET /devices/`, optionally filtered by trust.
    pub async fn get_devices(&self, query: DeviceQuery) -> Result<Vec<Device>, ClientError> {
        let request = self.request(Method::GET, &["devices", ""]).query(&query);
        self.fetch_list(GET_DEVICES, request).await
    }

    /// `GET /devices/{mac}`
    pub async fn get_device(&self, mac: &str) -> Result<DeviceWithStats, ClientError> {
        let request = self.request(Method::GET, &["devices", mac]);
        self.fetch(GET_DEVICE, request).await
    }

    /// `PUT /devices/{mac}` with only the fields set in `update`.
    pub async fn update_device(
        &self,
        mac: &str,
        update: &DeviceUpdate,
    ) -> Result<Device, ClientError> {
        let request = self.request(Method::PUT, &["devices", mac]).json(update);
        self.fetch(UPDATE_DEVICE, request).await
    }

    /// `GET /devices/{mac}/activity`
    pub async fn get_device_activity(&self, mac: &str) -> Result<DeviceActivity, ClientError> {
        let request = self.request(Method::GET, &["devices", mac, "activity"]);
        self.fetch(GET_DEVICE_ACTIVITY, request).await
    }

    // ------------------------------------------------------------------------
    // Sightings
    // ------------------------------------------------------------------------

    /// `GET /sightings` with optional MAC filter, window and order.
    pub async fn get_sightings(
        &self,
        query: &SightingsQuery,
    ) -> Result<SightingsResponse, ClientError> {
        let request = self.request(Method::GET, &["sightings"]).query(query);
        self.fetch(GET_SIGHTINGS, request).await
    }

    /// `GET /sightings/recent?limit=`
    pub async fn get_recent_sightings(&self, limit: u32) -> Result<Vec<Sighting>, ClientError> {
        let request = self
            .request(Method::GET, &["sightings", "recent"])
            .query(&RecentQuery { limit });
        self.fetch_list(GET_RECENT_SIGHTINGS, request).await
    }

    // ------------------------------------------------------------------------
    // Stats
    // ------------------------------------------------------------------------

    /// `GET /stats/overview`
    pub async fn get_overview_stats(&self) -> Result<OverviewStats, ClientError> {
        let request = self.request(Method::GET, &["stats", "overview"]);
        self.fetch(GET_OVERVIEW_STATS, request).await
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let request = self.request(Method::GET, &["health"]);
        self.fetch(HEALTH, request).await
    }

    // ------------------------------------------------------------------------
    // Identities
    // ------------------------------------------------------------------------

    /// `GET /identities/`
    pub async fn get_identities(&self) -> Result<Vec<DeviceIdentity>, ClientError> {
        let request = self.request(Method::GET, &["identities", ""]);
        self.fetch_list(GET_IDENTITIES, request).await
    }

    /// `GET /identities/{id}`
    pub async fn get_identity(&self, identity_id: &str) -> Result<DeviceIdentity, ClientError> {
        let request = self.request(Method::GET, &["identities", identity_id]);
        self.fetch(GET_IDENTITY, request).await
    }

    /// `POST /identities/`
    pub async fn create_identity(
        &self,
        body: &CreateIdentity,
    ) -> Result<DeviceIdentity, ClientError> {
        let request = self.request(Method::POST, &["identities", ""]).json(body);
        self.fetch(CREATE_IDENTITY, request).await
    }

    /// `PUT /identities/{id}/alias`
    pub async fn update_identity_alias(
        &self,
        identity_id: &str,
        alias: &str,
    ) -> Result<DeviceIdentity, ClientError> {
        let body = UpdateAlias {
            alias: alias.to_string(),
        };
        let request = self
            .request(Method::PUT, &["identities", identity_id, "alias"])
            .json(&body);
        self.fetch(UPDATE_IDENTITY_ALIAS, request).await
    }

    /// `POST /identities/{id}/fingerprints`
    pub async fn link_fingerprint(
        &self,
        identity_id: &str,
        fingerprint_id: &str,
    ) -> Result<LinkFingerprintResponse, ClientError> {
        let body = LinkFingerprint {
            fingerprint_id: fingerprint_id.to_string(),
        };
        let request = self
            .request(Method::POST, &["identities", identity_id, "fingerprints"])
            .json(&body);
        self.fetch(LINK_FINGERPRINT, request).await
    }

    // ------------------------------------------------------------------------
    // Fingerprints
    // ------------------------------------------------------------------------

    /// `GET /fingerprints?limit=&offset=`
    pub async fn get_fingerprints(
        &self,
        page: PageQuery,
    ) -> Result<FingerprintsResponse, ClientError> {
        let request = self.request(Method::GET, &["fingerprints"]).query(&page);
        self.fetch(GET_FINGERPRINTS, request).await
    }

    /// `GET /fingerprints/{id}`
    pub async fn get_fingerprint(
        &self,
        fingerprint_id: &str,
    ) -> Result<FingerprintWithDetails, ClientError> {
        let request = self.request(Method::GET, &["fingerprints", fingerprint_id]);
        self.fetch(GET_FINGERPRINT, request).await
    }

    // ------------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------------

    /// Builds `base_url` + percent-encoded `segments`. A trailing `""`
    /// segment yields a trailing slash.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL can carry path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.http.request(method, self.url(segments))
    }

    async fn fetch<T>(&self, endpoint: Endpoint, request: RequestBuilder) -> Result<T, ClientError>
    where
        T: DeserializeOwned + Validate,
    {
        let timer = RequestTimer::new(endpoint.name);
        let result = self.fetch_inner(endpoint, request).await;
        timer.finish(outcome(&result));
        result
    }

    async fn fetch_inner<T>(
        &self,
        endpoint: Endpoint,
        request: RequestBuilder,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned + Validate,
    {
        let response = self.send(endpoint, request).await?;
        let body: T = decode(endpoint, response).await?;
        body.validate().map_err(|e| malformed(endpoint, e.to_string()))?;
        Ok(body)
    }

    async fn fetch_list<T>(
        &self,
        endpoint: Endpoint,
        request: RequestBuilder,
    ) -> Result<Vec<T>, ClientError>
    where
        T: DeserializeOwned + Validate,
    {
        let timer = RequestTimer::new(endpoint.name);
        let result = self.fetch_list_inner(endpoint, request).await;
        timer.finish(outcome(&result));
        result
    }

    async fn fetch_list_inner<T>(
        &self,
        endpoint: Endpoint,
        request: RequestBuilder,
    ) -> Result<Vec<T>, ClientError>
    where
        T: DeserializeOwned + Validate,
    {
        let response = self.send(endpoint, request).await?;
        let items: Vec<T> = decode(endpoint, response).await?;
        for (index, item) in items.iter().enumerate() {
            item.validate()
                .map_err(|e| malformed(endpoint, format!("item {}: {}", index, e)))?;
        }
        Ok(items)
    }

    async fn send(
        &self,
        endpoint: Endpoint,
        request: RequestBuilder,
    ) -> Result<Response, ClientError> {
        let request = request.build().map_err(|e| ClientError::Transport {
            message: endpoint.failure,
            source: e,
        })?;

        debug!(
            endpoint = endpoint.name,
            method = %request.method(),
            url = %request.url(),
            "Sending backend request"
        );

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| {
                warn!(endpoint = endpoint.name, error = %e, "Backend request failed");
                ClientError::Transport {
                    message: endpoint.failure,
                    source: e,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                endpoint = endpoint.name,
                status = status.as_u16(),
                "Backend returned error status"
            );
            return Err(ClientError::RequestFailed {
                message: endpoint.failure,
                status,
            });
        }

        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(
    endpoint: Endpoint,
    response: Response,
) -> Result<T, ClientError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ClientError::Transport {
            message: endpoint.failure,
            source: e,
        })?;

    serde_json::from_slice(&bytes).map_err(|e| malformed(endpoint, e.to_string()))
}

fn malformed(endpoint: Endpoint, reason: String) -> ClientError {
    warn!(endpoint = endpoint.name, reason = %reason, "Malformed backend response");
    ClientError::MalformedResponse {
        message: endpoint.failure,
        reason,
    }
}

fn outcome<T>(result: &Result<T, ClientError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use shared::pagination::SortOrder;

    /// Serializes `query` the way a request would and returns the query string.
    fn query_string<Q: Serialize + ?Sized>(client: &SnifferClient, query: &Q) -> Option<String> {
        client
            .request(Method::GET, &["probe"])
            .query(query)
            .build()
            .ok()
            .and_then(|r| r.url().query().map(str::to_string))
    }

    fn client(base_url: &str) -> SnifferClient {
        SnifferClient::new(&BackendConfig::new(base_url)).expect("Failed to build client")
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = SnifferClient::new(&BackendConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));

        let err = SnifferClient::new(&BackendConfig::new("mailto:ops@example.com")).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_url_building() {
        let c = client("http://192.168.0.4:8000");
        assert_eq!(
            c.url(&["devices", ""]).as_str(),
            "http://192.168.0.4:8000/devices/"
        );
        assert_eq!(
            c.url(&["devices", "aa:bb:cc:dd:ee:ff", "activity"]).as_str(),
            "http://192.168.0.4:8000/devices/aa:bb:cc:dd:ee:ff/activity"
        );
        assert_eq!(
            c.url(&["sightings"]).as_str(),
            "http://192.168.0.4:8000/sightings"
        );
    }

    #[test]
    fn test_url_keeps_base_path_prefix() {
        let c = client("https://sniffer.example.com/api/");
        assert_eq!(
            c.url(&["stats", "overview"]).as_str(),
            "https://sniffer.example.com/api/stats/overview"
        );
    }

    #[test]
    fn test_url_encodes_identifiers() {
        let c = client("http://localhost:8000");
        assert_eq!(
            c.url(&["identities", "kid's tablet/2", "alias"]).as_str(),
            "http://localhost:8000/identities/kid's%20tablet%2F2/alias"
        );
    }

    #[test]
    fn test_device_query_is_trusted_only_when_set() {
        let c = client("http://localhost:8000");
        assert_eq!(query_string(&c, &DeviceQuery::default()), None);
        assert_eq!(
            query_string(&c, &DeviceQuery { is_trusted: Some(true) }).as_deref(),
            Some("is_trusted=true")
        );
        assert_eq!(
            query_string(&c, &DeviceQuery { is_trusted: Some(false) }).as_deref(),
            Some("is_trusted=false")
        );
    }

    #[test]
    fn test_sightings_query_omits_absent_fields() {
        let c = client("http://localhost:8000");
        assert_eq!(query_string(&c, &SightingsQuery::default()), None);

        let query = SightingsQuery {
            limit: Some(25),
            ..Default::default()
        };
        assert_eq!(query_string(&c, &query).as_deref(), Some("limit=25"));

        let query = SightingsQuery {
            mac: Some("aa:bb:cc:dd:ee:ff".to_string()),
            limit: Some(10),
            offset: Some(20),
            order: Some(SortOrder::Asc),
        };
        assert_eq!(
            query_string(&c, &query).as_deref(),
            Some("mac=aa%3Abb%3Acc%3Add%3Aee%3Aff&limit=10&offset=20&order=ASC")
        );
    }

    #[test]
    fn test_page_query_omits_absent_fields() {
        let c = client("http://localhost:8000");
        assert_eq!(query_string(&c, &PageQuery::default()), None);
        assert_eq!(
            query_string(&c, &PageQuery { limit: None, offset: Some(50) }).as_deref(),
            Some("offset=50")
        );
    }

    #[test]
    fn test_outcome_labels() {
        let ok: Result<(), ClientError> = Ok(());
        assert_eq!(outcome(&ok), "ok");

        let failed: Result<(), ClientError> = Err(ClientError::RequestFailed {
            message: GET_DEVICES.failure,
            status: reqwest::StatusCode::NOT_FOUND,
        });
        assert_eq!(outcome(&failed), "request_failed");
    }
}
