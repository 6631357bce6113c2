// ── Dashboard facade ──
//
// Single entry point for consumers: owns the config and the HTTP client,
// and turns every backend call into a `CoreError`-typed domain result.

use std::sync::Arc;

use aihref_api::models::{AggregationStatus, AnalyticsSummary, InsightsRequest, InsightsResponse};
use aihref_api::{AnalyticsClient, Range, ServiceHealth, TlsMode, TransportConfig};
use serde::Serialize;
use tracing::{debug, warn};

use crate::combiner::{combine_backend, combine_sites, proportional_daily};
use crate::config::{CombineMode, DashboardConfig, TlsVerification};
use crate::convert::snapshot_from_wire;
use crate::error::CoreError;
use crate::model::{CombinedAnalytics, DailyPoint, SiteDescriptor, SiteSnapshot, SiteTrend};

/// Health of both backend services.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub backend: ServiceHealth,
    /// `None` when the AI service did not answer.
    pub insights: Option<ServiceHealth>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.backend.is_healthy() && self.insights.as_ref().is_some_and(ServiceHealth::is_healthy)
    }
}

/// Analytics dashboard over one backend. Cloning is cheap.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: DashboardConfig,
    client: AnalyticsClient,
}

impl Dashboard {
    /// Validate `config` and build the HTTP client it describes.
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let transport = build_transport(&config);
        let client = AnalyticsClient::new(config.url.as_str(), &transport)?;
        Ok(Self::with_client(config, client))
    }

    /// Use a pre-built client (shared pools, tests).
    pub fn with_client(config: DashboardConfig, client: AnalyticsClient) -> Self {
        Self {
            inner: Arc::new(DashboardInner { config, client }),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Configured sites, in display order.
    pub fn sites(&self) -> &[SiteDescriptor] {
        &self.inner.config.sites
    }

    fn client(&self) -> &AnalyticsClient {
        &self.inner.client
    }

    fn known_site(&self, site_id: &str) -> Result<&SiteDescriptor, CoreError> {
        let site_id = site_id.trim();
        if site_id.is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "site id must not be empty".into(),
            });
        }
        self.inner
            .config
            .site(site_id)
            .ok_or_else(|| CoreError::SiteNotFound {
                site_id: site_id.to_owned(),
            })
    }

    fn api_err(&self, err: aihref_api::Error) -> CoreError {
        match CoreError::from(err) {
            CoreError::Timeout { .. } => CoreError::Timeout {
                timeout_secs: self.inner.config.timeout.as_secs(),
            },
            other => other,
        }
    }

    // ── Per-site reads ───────────────────────────────────────────────

    pub async fn site_snapshot(&self, site_id: &str, range: Range) -> Result<SiteSnapshot, CoreError> {
        let site = self.known_site(site_id)?;
        let wire = self
            .client()
            .enhanced_analytics(&site.site_id, range)
            .await
            .map_err(|e| self.api_err(e))?;
        Ok(snapshot_from_wire(&site.site_id, range, wire))
    }

    pub async fn site_summary(
        &self,
        site_id: &str,
        range: Range,
    ) -> Result<AnalyticsSummary, CoreError> {
        let site = self.known_site(site_id)?;
        self.client()
            .analytics_summary(&site.site_id, range)
            .await
            .map_err(|e| self.api_err(e))
    }

    /// Daily visitor series for one site, ascending by date.
    pub async fn visitor_trends(
        &self,
        site_id: &str,
        range: Range,
    ) -> Result<Vec<DailyPoint>, CoreError> {
        let site = self.known_site(site_id)?;
        let mut daily: Vec<DailyPoint> = self
            .client()
            .visitor_trends(&site.site_id, range)
            .await
            .map_err(|e| self.api_err(e))?
            .into_iter()
            .map(DailyPoint::from)
            .collect();
        daily.sort_by_key(|d| d.date);
        Ok(daily)
    }

    // ── Combined view ────────────────────────────────────────────────

    /// Combined view, using the configured combine mode.
    pub async fn combined(&self, range: Range) -> Result<CombinedAnalytics, CoreError> {
        self.combined_with_mode(range, self.inner.config.combine_mode)
            .await
    }

    pub async fn combined_with_mode(
        &self,
        range: Range,
        mode: CombineMode,
    ) -> Result<CombinedAnalytics, CoreError> {
        let top_n = self.inner.config.top_n;
        debug!(%range, %mode, top_n, "building combined view");
        match mode {
            CombineMode::Client => {
                combine_sites(self.client(), self.sites(), range, top_n).await
            }
            CombineMode::Backend => {
                let response = self
                    .client()
                    .combined_analytics(range)
                    .await
                    .map_err(|e| CoreError::CombinedFetchFailed {
                        reason: self.api_err(e).to_string(),
                    })?;
                Ok(combine_backend(range, response, top_n))
            }
        }
    }

    /// Combined view plus a per-site daily estimate for each site.
    pub async fn combined_trends(
        &self,
        range: Range,
    ) -> Result<(CombinedAnalytics, Vec<SiteTrend>), CoreError> {
        let combined = self.combined(range).await?;
        let trends = proportional_daily(&combined);
        Ok((combined, trends))
    }

    // ── Admin ────────────────────────────────────────────────────────

    /// Ask the backend to re-aggregate now.
    pub async fn trigger_aggregation(&self) -> Result<AggregationStatus, CoreError> {
        let status = self
            .client()
            .trigger_aggregation()
            .await
            .map_err(|e| self.api_err(e))?;
        if !status.is_success() {
            return Err(CoreError::Api {
                message: format!("aggregation {}: {}", status.status, status.message),
                status: None,
            });
        }
        Ok(status)
    }

    /// Probe the admin service, and the AI service alongside it.
    ///
    /// An unreachable AI service is reported, not raised.
    pub async fn health(&self) -> Result<HealthReport, CoreError> {
        let (backend, insights) =
            tokio::join!(self.client().admin_health(), self.client().insights_health());
        let backend = backend.map_err(|e| self.api_err(e))?;
        let insights = match insights {
            Ok(h) => Some(h),
            Err(e) => {
                warn!(error = %e, "insights health probe failed");
                None
            }
        };
        Ok(HealthReport { backend, insights })
    }

    // ── AI insights ──────────────────────────────────────────────────

    /// Free-form question about the site named in `request`.
    pub async fn insights(&self, request: &InsightsRequest) -> Result<InsightsResponse, CoreError> {
        let site_id = request.site_id.as_deref().unwrap_or_default();
        self.known_site(site_id)?;
        self.client()
            .insights(request)
            .await
            .map_err(|e| self.api_err(e))
    }

    /// Free-form question across every site. Any `site_id` is dropped.
    pub async fn combined_insights(
        &self,
        request: &InsightsRequest,
    ) -> Result<InsightsResponse, CoreError> {
        let request = InsightsRequest {
            site_id: None,
            ..request.clone()
        };
        self.client()
            .combined_insights(&request)
            .await
            .map_err(|e| self.api_err(e))
    }

    pub async fn quick_insights(
        &self,
        site_id: &str,
        range: Range,
    ) -> Result<InsightsResponse, CoreError> {
        let site = self.known_site(site_id)?;
        self.client()
            .quick_insights(&site.site_id, range)
            .await
            .map_err(|e| self.api_err(e))
    }

    pub async fn combined_quick_insights(
        &self,
        range: Range,
    ) -> Result<InsightsResponse, CoreError> {
        self.client()
            .combined_quick_insights(range)
            .await
            .map_err(|e| self.api_err(e))
    }
}

/// Build a [`TransportConfig`] from the dashboard configuration.
fn build_transport(config: &DashboardConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::model::Tally;

    async fn setup() -> (MockServer, Dashboard) {
        let server = MockServer::start().await;
        let mut config = DashboardConfig::new(server.uri().parse().unwrap());
        config.sites = vec![
            SiteDescriptor::new("greplus", "GRE Plus", "greplus.com"),
            SiteDescriptor::new("aihref", "AIHref", "aihref.com"),
        ];
        let dashboard = Dashboard::new(config).unwrap();
        (server, dashboard)
    }

    fn enhanced(site: &str, total: u64, us: u64) -> serde_json::Value {
        json!({
            "siteId": site,
            "totalVisitorsTillDate": total,
            "todayVisitors": 1,
            "topCountries": [{ "country": "US", "count": us }],
            "dailyVisitorTrends": [{ "date": "2024-01-01", "visitors": total, "pageviews": total }]
        })
    }

    #[tokio::test]
    async fn client_mode_combines_every_site() {
        let (server, dashboard) = setup().await;
        for (site, total, us) in [("greplus", 100, 60), ("aihref", 50, 10)] {
            Mock::given(method("GET"))
                .and(path("/api/analytics/enhanced"))
                .and(query_param("siteId", site))
                .and(query_param("range", "1y"))
                .respond_with(ResponseTemplate::new(200).set_body_json(enhanced(site, total, us)))
                .expect(1)
                .mount(&server)
                .await;
        }

        let combined = dashboard.combined(Range::LastYear).await.unwrap();
        assert_eq!(combined.totals.total, 150);
        assert_eq!(combined.totals.today, 2);
        assert_eq!(combined.top_countries, vec![Tally::new("US", 70)]);
        assert_eq!(combined.daily.len(), 1);
        assert_eq!(combined.daily[0].visitors, 150);
    }

    #[tokio::test]
    async fn client_mode_reports_partial_failure() {
        let (server, dashboard) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/analytics/enhanced"))
            .and(query_param("siteId", "greplus"))
            .respond_with(ResponseTemplate::new(200).set_body_json(enhanced("greplus", 10, 1)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/analytics/enhanced"))
            .and(query_param("siteId", "aihref"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let combined = dashboard.combined(Range::Last7Days).await.unwrap();
        assert_eq!(combined.failed_sites, vec!["aihref".to_owned()]);
        assert_eq!(combined.totals.total, 10);
    }

    #[tokio::test]
    async fn backend_mode_failure_is_generic_combined_error() {
        let (server, dashboard) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/analytics/combined"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = dashboard
            .combined_with_mode(Range::Last7Days, CombineMode::Backend)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::CombinedFetchFailed { .. }));
    }

    #[tokio::test]
    async fn unknown_site_is_rejected_without_a_request() {
        let (server, dashboard) = setup().await;
        let err = dashboard
            .site_snapshot("nope", Range::Last7Days)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::SiteNotFound { ref site_id } if site_id == "nope"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_aggregation_body_is_an_error() {
        let (server, dashboard) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/trigger-aggregation"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "status": "error", "message": "db down" })),
            )
            .mount(&server)
            .await;

        let err = dashboard.trigger_aggregation().await.unwrap_err();
        assert!(err.to_string().contains("db down"));
    }

    #[tokio::test]
    async fn health_tolerates_missing_insights_service() {
        let (server, dashboard) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/health"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "status": "healthy", "message": "Admin service is running" })),
            )
            .mount(&server)
            .await;

        let report = dashboard.health().await.unwrap();
        assert!(report.backend.is_healthy());
        assert!(report.insights.is_none());
        assert!(!report.is_healthy());
    }

    #[tokio::test]
    async fn combined_insights_drops_site() {
        let (server, dashboard) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/ai-analytics/combined-insights"))
            .and(wiremock::matchers::body_json(json!({
                "range": "7d",
                "query": "growth?",
                "includeTrends": true,
                "includePredictions": true
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "summary": "Growing" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let request = InsightsRequest {
            site_id: Some("greplus".into()),
            range: Range::Last7Days,
            query: "growth?".into(),
            include_trends: true,
            include_predictions: true,
        };
        let response = dashboard.combined_insights(&request).await.unwrap();
        assert_eq!(response.summary, "Growing");
    }
}
