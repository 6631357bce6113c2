// Admin endpoints: manual aggregation trigger and health probe.

use tracing::info;

use crate::client::AnalyticsClient;
use crate::error::Error;
use crate::models::{AggregationStatus, ServiceHealth};

impl AnalyticsClient {
    /// Ask the backend to run its daily aggregation job now.
    ///
    /// `POST /api/admin/trigger-aggregation` (no body). The backend answers
    /// `500` with a `{status: "error"}` body when the job fails; that surfaces
    /// as [`Error::Http`] like any other non-success status.
    pub async fn trigger_aggregation(&self) -> Result<AggregationStatus, Error> {
        let url = self.url("api/admin/trigger-aggregation")?;
        let status: AggregationStatus = self.post_empty(url).await?;
        info!(status = %status.status, "aggregation triggered");
        Ok(status)
    }

    /// `GET /api/admin/health`
    pub async fn admin_health(&self) -> Result<ServiceHealth, Error> {
        let url = self.url("api/admin/health")?;
        self.get(url, &[]).await
    }
}
