// Wire types for the analytics backend.
//
// The backend serializes nullable Java boxed numbers and lists, so every
// counter and list here tolerates both a missing key and an explicit
// `null`, reading either as zero / empty.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Range ───────────────────────────────────────────────────────────

/// Reporting window accepted by every analytics endpoint.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum Range {
    #[default]
    #[serde(rename = "7d")]
    #[strum(serialize = "7d")]
    Last7Days,
    #[serde(rename = "1m")]
    #[strum(serialize = "1m")]
    LastMonth,
    #[serde(rename = "30d")]
    #[strum(serialize = "30d")]
    Last30Days,
    #[serde(rename = "1y")]
    #[strum(serialize = "1y")]
    LastYear,
    #[serde(rename = "5y")]
    #[strum(serialize = "5y")]
    Last5Years,
    #[serde(rename = "all")]
    #[strum(serialize = "all")]
    AllTime,
}

impl Range {
    /// The query-string token (`"7d"`, `"1y"`, ...).
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Human label for headings.
    pub fn label(self) -> &'static str {
        match self {
            Self::Last7Days => "Last 7 days",
            Self::LastMonth => "Last month",
            Self::Last30Days => "Last 30 days",
            Self::LastYear => "Last year",
            Self::Last5Years => "Last 5 years",
            Self::AllTime => "All time",
        }
    }
}

// ── Tallies ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCount {
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCount {
    pub country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCount {
    pub source: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCount {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
}

/// One day of traffic for one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyVisitorCount {
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visitors: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pageviews: u64,
}

// ── Per-site snapshot ───────────────────────────────────────────────

/// `GET /api/analytics/enhanced` response: one site's analytics for a range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedAnalytics {
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub range: Option<String>,

    // Traffic summary
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_visitors_till_date: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub today_visitors: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub this_week_visitors: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub this_month_visitors: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub repeat_visitors_today: u64,

    // Highest performing segments
    #[serde(default)]
    pub peak_visit_day: Option<String>,
    #[serde(default)]
    pub peak_visit_count: Option<u64>,
    #[serde(default)]
    pub top_country: Option<String>,
    #[serde(default)]
    pub top_source: Option<String>,

    // Performance over time
    #[serde(default)]
    pub avg_visits_per_day: Option<f64>,
    #[serde(default)]
    pub avg_visits_per_week: Option<f64>,
    #[serde(default)]
    pub avg_repeat_visitors_per_day: Option<f64>,

    // Detailed data
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_pages: Vec<PageCount>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_countries: Vec<CountryCount>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_sources: Vec<SourceCount>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_locations: Vec<LocationCount>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub daily_visitor_trends: Vec<DailyVisitorCount>,

    #[serde(default)]
    pub last_updated: Option<NaiveDateTime>,
}

/// `GET /api/analytics/summary` response: the lightweight per-site view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visitors: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pageviews: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_pages: Vec<PageCount>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_countries: Vec<CountryCount>,
    #[serde(default)]
    pub last_updated: Option<NaiveDateTime>,
}

// ── Backend-combined view ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteAnalytics {
    pub site_id: String,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub website: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visitors: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub today_visitors: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub week_visitors: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub month_visitors: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub repeat_visitors: u64,
}

/// Page tally in the combined payload, keyed by `page` rather than `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedPageCount {
    pub page: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
}

/// `GET /api/analytics/combined` response, already folded by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedAnalyticsResponse {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_visitors: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_today_visitors: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_week_visitors: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_month_visitors: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_repeat_visitors: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sites: Vec<SiteAnalytics>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_countries: Vec<CountryCount>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_pages: Vec<CombinedPageCount>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_sources: Vec<SourceCount>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub daily_visitors: Vec<DailyVisitorCount>,
    #[serde(default)]
    pub last_updated: Option<NaiveDateTime>,
}

// ── Admin ───────────────────────────────────────────────────────────

/// `{status, message}` body returned by the admin endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl AggregationStatus {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

/// Health probe body for `/api/admin/health` and `/api/ai-analytics/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub gemini_configured: Option<bool>,
}

impl ServiceHealth {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.to_ascii_lowercase().as_str(), "ok" | "healthy")
    }
}

// ── AI insights ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsRequest {
    /// `None` asks for portfolio-wide insights.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    pub range: Range,
    pub query: String,
    pub include_trends: bool,
    pub include_predictions: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    #[serde(default)]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_insights: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trends: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub predictions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommendations: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub range: Option<String>,
}
