// AI insight endpoints.
//
// Insight text is generated entirely on the backend; these calls only
// carry the question and range across and parse the answer.

use tracing::debug;

use crate::client::{AnalyticsClient, validate_site_id};
use crate::error::Error;
use crate::models::{InsightsRequest, InsightsResponse, Range, ServiceHealth};

impl AnalyticsClient {
    /// Ask a free-form question about one site.
    ///
    /// `POST /api/ai-analytics/insights`. The backend rejects requests
    /// without a site id, so one is required here too.
    pub async fn insights(&self, request: &InsightsRequest) -> Result<InsightsResponse, Error> {
        validate_site_id(request.site_id.as_deref().unwrap_or_default())?;
        debug!(site_id = ?request.site_id, range = %request.range, "requesting insights");
        let url = self.url("api/ai-analytics/insights")?;
        self.post(url, request).await
    }

    /// Ask a free-form question across every site.
    ///
    /// `POST /api/ai-analytics/combined-insights`
    pub async fn combined_insights(
        &self,
        request: &InsightsRequest,
    ) -> Result<InsightsResponse, Error> {
        debug!(range = %request.range, "requesting combined insights");
        let url = self.url("api/ai-analytics/combined-insights")?;
        self.post(url, request).await
    }

    /// Canned overview for one site.
    ///
    /// `GET /api/ai-analytics/quick-insights/{siteId}?range={range}`
    pub async fn quick_insights(
        &self,
        site_id: &str,
        range: Range,
    ) -> Result<InsightsResponse, Error> {
        let site_id = validate_site_id(site_id)?;
        let url = self.url_with_segment("api/ai-analytics/quick-insights", site_id)?;
        self.get(url, &[("range", range.as_str())]).await
    }

    /// Canned overview across every site.
    ///
    /// `GET /api/ai-analytics/combined-quick-insights?range={range}`
    pub async fn combined_quick_insights(&self, range: Range) -> Result<InsightsResponse, Error> {
        let url = self.url("api/ai-analytics/combined-quick-insights")?;
        self.get(url, &[("range", range.as_str())]).await
    }

    /// `GET /api/ai-analytics/health`
    pub async fn insights_health(&self) -> Result<ServiceHealth, Error> {
        let url = self.url("api/ai-analytics/health")?;
        self.get(url, &[]).await
    }
}
