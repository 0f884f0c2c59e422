//! Reader for the site's own HTTP API.
//!
//! Page rendering calls back into the same origin that served the page
//! (`<scheme>://<host>/api/...`). Responses are wrapped in an
//! [`ApiEnvelope`]; a non-success envelope is a handled failure that the
//! caller turns into an empty page.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{CACHE_CONTROL, EXPIRES, HeaderMap, HeaderValue, PRAGMA};
use serde::de::DeserializeOwned;
use sitepages_shared::{ApiConfig, ApiEnvelope, Faculty, Result, RuntimeMode, SiteError};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("sitepages/", env!("CARGO_PKG_VERSION"));

/// Message carried by the failure raised for a non-success faculty envelope.
pub const FACULTY_FAILURE: &str = "Failed to fetch faculty";

// ---------------------------------------------------------------------------
// RequestContext
// ---------------------------------------------------------------------------

/// What the reader needs to know about the inbound page request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Value of the inbound `Host` header, if any.
    pub host: Option<String>,
}

impl RequestContext {
    pub fn with_host(host: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// ApiReader
// ---------------------------------------------------------------------------

/// Same-origin API client.
#[derive(Debug, Clone)]
pub struct ApiReader {
    client: Client,
    mode: RuntimeMode,
    default_host: String,
    faculty_path: String,
}

impl ApiReader {
    /// Build a reader from the `[api]` config section and the runtime mode.
    pub fn new(config: &ApiConfig, mode: RuntimeMode) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(no_cache_headers())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SiteError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            mode,
            default_host: config.default_host.clone(),
            faculty_path: config.faculty_path.clone(),
        })
    }

    /// Same-origin base URL for `ctx`: the request's host, or the configured
    /// fallback, under the scheme selected by the runtime mode.
    pub fn base_url(&self, ctx: &RequestContext) -> Result<Url> {
        let host = ctx
            .host
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .unwrap_or(&self.default_host);

        let raw = format!("{}://{host}", self.mode.scheme());
        Url::parse(&raw).map_err(|e| SiteError::validation(format!("invalid host '{host}': {e}")))
    }

    /// Fetch the full faculty listing. All-or-nothing: any transport,
    /// decoding, or envelope failure is an error.
    #[instrument(skip_all, fields(host = ctx.host.as_deref().unwrap_or("-")))]
    pub async fn fetch_faculty(&self, ctx: &RequestContext) -> Result<Vec<Faculty>> {
        let url = self
            .base_url(ctx)?
            .join(&self.faculty_path)
            .map_err(|e| SiteError::validation(format!("invalid faculty path: {e}")))?;

        let faculty = self.get_envelope::<Faculty>(&url, FACULTY_FAILURE).await?;
        info!(count = faculty.len(), "faculty fetched");
        Ok(faculty)
    }

    /// GET `url` and unwrap its envelope.
    async fn get_envelope<T: DeserializeOwned>(&self, url: &Url, failure: &str) -> Result<Vec<T>> {
        debug!(%url, "requesting");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| SiteError::Network(format!("{url}: {e}")))?;

        // The envelope decides success; the status is only informative.
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| SiteError::Network(format!("{url}: failed to read body: {e}")))?;

        let envelope: ApiEnvelope<T> = serde_json::from_slice(&body).map_err(|e| {
            SiteError::parse(format!("{url}: HTTP {status}: body is not a valid envelope: {e}"))
        })?;

        if !envelope.success {
            warn!(
                %status,
                error = envelope.error.as_deref().unwrap_or("-"),
                "api reported failure"
            );
            return Err(SiteError::Api(failure.to_string()));
        }

        Ok(envelope.data)
    }
}

/// Headers that keep every hop from serving a cached listing.
fn no_cache_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(EXPIRES, HeaderValue::from_static("0"));
    headers
}
