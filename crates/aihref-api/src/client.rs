// Async HTTP client for the analytics backend.
//
// Wraps `reqwest::Client` with base-URL normalization and uniform response
// handling. Endpoint groups (analytics, admin, insights) live in their own
// modules as inherent methods to keep this one focused on transport.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Longest body excerpt kept in error messages.
const BODY_PREVIEW_LEN: usize = 200;

/// Async client for the analytics backend.
///
/// Holds no per-request state, so a single instance can serve any number of
/// concurrent requests. Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl AnalyticsClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a base URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base URL ends in `/` so relative joins keep its path.
    ///
    /// `http://host/prefix` and `http://host/prefix/` both become
    /// `http://host/prefix/`, letting `api/...` resolve underneath it.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        url.set_query(None);
        Ok(url)
    }

    /// The normalized backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"api/analytics/enhanced"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Build a URL whose final segment is `segment`, percent-encoded.
    pub(crate) fn url_with_segment(&self, path: &str, segment: &str) -> Result<Url, Error> {
        let mut url = self.url(path)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    /// POST without a request body.
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("POST {url}");

        let resp = self.http.post(url).send().await?;
        self.handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        trace!(%status, url = %resp.url(), "response received");

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::from_status(status, preview(&body).to_owned()));
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }
}

/// Trim a body to at most `BODY_PREVIEW_LEN` bytes on a char boundary.
fn preview(body: &str) -> &str {
    if body.len() <= BODY_PREVIEW_LEN {
        return body;
    }
    let mut end = BODY_PREVIEW_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

/// Reject blank site identifiers before they reach the wire.
pub(crate) fn validate_site_id(site_id: &str) -> Result<&str, Error> {
    let trimmed = site_id.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidSiteId {
            reason: "site id must not be empty".into(),
        });
    }
    Ok(trimmed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let client =
            AnalyticsClient::from_reqwest("http://localhost:8080/backend", reqwest::Client::new())
                .unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/backend/");
        assert_eq!(
            client.url("api/admin/health").unwrap().as_str(),
            "http://localhost:8080/backend/api/admin/health"
        );
    }

    #[test]
    fn segment_is_percent_encoded() {
        let client =
            AnalyticsClient::from_reqwest("http://localhost:8080", reqwest::Client::new()).unwrap();
        let url = client
            .url_with_segment("api/ai-analytics/quick-insights", "my site/1")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/ai-analytics/quick-insights/my%20site%2F1"
        );
    }

    #[test]
    fn blank_site_id_is_rejected() {
        assert!(validate_site_id("  ").is_err());
        assert_eq!(validate_site_id(" greplus ").unwrap(), "greplus");
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(150);
        let cut = preview(&body);
        assert!(cut.len() <= BODY_PREVIEW_LEN);
        assert!(body.starts_with(cut));
    }
}
