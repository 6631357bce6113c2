// ── Analytics domain types ──
//
// Snapshot and combined-view types consumed by the CLI. Wire quirks (nulls,
// differing label keys per tally kind) are flattened away in `convert`.

use std::ops::AddAssign;

use aihref_api::Range;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::site::SiteSummary;

/// A label with an occurrence count (country, page, or source).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub label: String,
    pub count: u64,
}

impl Tally {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Visitors and pageviews on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub visitors: u64,
    pub pageviews: u64,
}

/// The five headline counters every snapshot carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorTotals {
    /// Visitors since tracking began.
    pub total: u64,
    pub today: u64,
    pub this_week: u64,
    pub this_month: u64,
    /// Returning visitors today.
    pub repeat_today: u64,
}

impl AddAssign for VisitorTotals {
    fn add_assign(&mut self, rhs: Self) {
        self.total = self.total.saturating_add(rhs.total);
        self.today = self.today.saturating_add(rhs.today);
        self.this_week = self.this_week.saturating_add(rhs.this_week);
        self.this_month = self.this_month.saturating_add(rhs.this_month);
        self.repeat_today = self.repeat_today.saturating_add(rhs.repeat_today);
    }
}

/// Backend-computed highlights for a single site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Highlights {
    pub peak_day: Option<String>,
    pub peak_count: Option<u64>,
    pub top_country: Option<String>,
    pub top_source: Option<String>,
    pub avg_visits_per_day: Option<f64>,
    pub avg_visits_per_week: Option<f64>,
    pub avg_repeat_visitors_per_day: Option<f64>,
}

/// A city/state/country row from the location breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub count: u64,
}

impl Location {
    /// "City, State, Country" with missing parts skipped.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [&self.city, &self.state, &self.country]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            "Unknown".into()
        } else {
            parts.join(", ")
        }
    }
}

/// One site's analytics for one range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSnapshot {
    pub site_id: String,
    pub range: Range,
    pub totals: VisitorTotals,
    pub highlights: Highlights,
    pub top_pages: Vec<Tally>,
    pub top_countries: Vec<Tally>,
    pub top_sources: Vec<Tally>,
    pub top_locations: Vec<Location>,
    pub daily: Vec<DailyPoint>,
    pub last_updated: Option<NaiveDateTime>,
}

/// Portfolio-wide view folded from every reachable site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedAnalytics {
    pub range: Range,
    pub totals: VisitorTotals,
    /// Ranked descending by count, at most top-N entries.
    pub top_countries: Vec<Tally>,
    pub top_pages: Vec<Tally>,
    pub top_sources: Vec<Tally>,
    /// Ascending by date, one entry per date.
    pub daily: Vec<DailyPoint>,
    /// Sites that contributed, in configuration order.
    pub sites: Vec<SiteSummary>,
    /// Sites whose fetch failed and were left out of the fold.
    pub failed_sites: Vec<String>,
    pub last_updated: Option<NaiveDateTime>,
}

impl CombinedAnalytics {
    /// True when some configured site is missing from the numbers.
    pub fn is_partial(&self) -> bool {
        !self.failed_sites.is_empty()
    }
}

/// Estimated daily series for one site, scaled from the combined series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteTrend {
    pub site_id: String,
    pub site_name: String,
    pub daily: Vec<DailyPoint>,
}
