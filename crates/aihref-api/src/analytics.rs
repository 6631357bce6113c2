// Per-site and combined analytics endpoints.
//
// All reads are `GET /api/analytics/{view}?siteId=..&range=..`. The combined
// endpoint is portfolio-wide and takes only a range.

use tracing::debug;

use crate::client::{AnalyticsClient, validate_site_id};
use crate::error::Error;
use crate::models::{
    AnalyticsSummary, CombinedAnalyticsResponse, DailyVisitorCount, EnhancedAnalytics, Range,
};

impl AnalyticsClient {
    /// Fetch one site's full analytics snapshot.
    ///
    /// `GET /api/analytics/enhanced?siteId={site}&range={range}`
    pub async fn enhanced_analytics(
        &self,
        site_id: &str,
        range: Range,
    ) -> Result<EnhancedAnalytics, Error> {
        let site_id = validate_site_id(site_id)?;
        debug!(site_id, %range, "fetching enhanced analytics");
        let url = self.url("api/analytics/enhanced")?;
        self.get(url, &[("siteId", site_id), ("range", range.as_str())])
            .await
    }

    /// Fetch the backend's own cross-site combination.
    ///
    /// `GET /api/analytics/combined?range={range}`
    pub async fn combined_analytics(
        &self,
        range: Range,
    ) -> Result<CombinedAnalyticsResponse, Error> {
        debug!(%range, "fetching backend-combined analytics");
        let url = self.url("api/analytics/combined")?;
        self.get(url, &[("range", range.as_str())]).await
    }

    /// Fetch the lightweight visitor/pageview summary for one site.
    ///
    /// `GET /api/analytics/summary?siteId={site}&range={range}`
    pub async fn analytics_summary(
        &self,
        site_id: &str,
        range: Range,
    ) -> Result<AnalyticsSummary, Error> {
        let site_id = validate_site_id(site_id)?;
        let url = self.url("api/analytics/summary")?;
        self.get(url, &[("siteId", site_id), ("range", range.as_str())])
            .await
    }

    /// Fetch the daily visitor series for one site.
    ///
    /// `GET /api/analytics/visitor-trends?siteId={site}&range={range}`
    pub async fn visitor_trends(
        &self,
        site_id: &str,
        range: Range,
    ) -> Result<Vec<DailyVisitorCount>, Error> {
        let site_id = validate_site_id(site_id)?;
        let url = self.url("api/analytics/visitor-trends")?;
        self.get(url, &[("siteId", site_id), ("range", range.as_str())])
            .await
    }
}
