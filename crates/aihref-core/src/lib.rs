//! Domain layer between `aihref-api` and the CLI.
//!
//! - **[`Dashboard`]**: facade over one analytics backend. Owns the
//!   [`DashboardConfig`] and the HTTP client, and returns domain types with
//!   [`CoreError`] failures.
//!
//! - **Combiner** ([`combiner`]): fans out one snapshot request per site,
//!   fans back in, and folds the results into a [`CombinedAnalytics`]. Sums
//!   are exact, ranked lists are capped at top-N, daily points are merged by
//!   date. Sites that fail are excluded and listed, never silently hidden.
//!
//! - **[`ViewController`]**: tracks the current site/range selection and
//!   publishes its load state over a `watch` channel. Responses for a
//!   superseded selection are dropped.
//!
//! - **Domain model** ([`model`]): [`SiteDescriptor`], [`SiteSnapshot`],
//!   [`Tally`], [`DailyPoint`], and friends.

pub mod combiner;
pub mod config;
pub mod convert;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use combiner::{
    DEFAULT_TOP_N, SnapshotSource, combine, combine_backend, combine_sites, merge_daily,
    merge_tallies, proportional_daily,
};
pub use config::{CombineMode, DEFAULT_BACKEND_URL, DashboardConfig, TlsVerification};
pub use dashboard::{Dashboard, HealthReport};
pub use error::CoreError;
pub use view::{RequestToken, Selection, ViewController, ViewState};

pub use model::{
    CombinedAnalytics, DailyPoint, Highlights, Location, SiteDescriptor, SiteSnapshot,
    SiteSummary, SiteTrend, Tally, VisitorTotals, default_sites,
};

// Wire types consumers pass straight through.
pub use aihref_api::{
    AggregationStatus, AnalyticsSummary, InsightsRequest, InsightsResponse, Range, ServiceHealth,
};
