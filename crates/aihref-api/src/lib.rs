//! Async Rust client for the AIHref analytics backend.
//!
//! One [`AnalyticsClient`] covers every endpoint the dashboard consumes:
//!
//! - **Analytics**: per-site snapshots (`/api/analytics/enhanced`), the
//!   lightweight summary, daily visitor trends, and the backend-combined
//!   portfolio view.
//! - **Admin**: manual aggregation trigger and health probe.
//! - **Insights**: natural-language AI insights, per site or combined.
//!
//! Requests are single-shot: no retries, no caching. Failures come back as
//! [`Error`], carrying the HTTP status where there is one.

pub mod admin;
pub mod analytics;
pub mod client;
pub mod error;
pub mod insights;
pub mod models;
pub mod transport;

pub use client::AnalyticsClient;
pub use error::Error;
pub use models::{
    AggregationStatus, AnalyticsSummary, CombinedAnalyticsResponse, CombinedPageCount,
    CountryCount, DailyVisitorCount, EnhancedAnalytics, InsightsRequest, InsightsResponse,
    LocationCount, PageCount, Range, ServiceHealth, SiteAnalytics, SourceCount,
};
pub use transport::{TlsMode, TransportConfig};
