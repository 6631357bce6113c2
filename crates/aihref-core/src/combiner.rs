// ── Cross-site combiner ──
//
// Fans out one snapshot request per configured site, waits for all of them,
// and folds the survivors into a single portfolio view. Folding is pure
// (`combine`) and kept apart from fetching (`combine_sites`).

use std::collections::BTreeMap;
use std::future::Future;

use aihref_api::models::{CombinedAnalyticsResponse, EnhancedAnalytics};
use aihref_api::{AnalyticsClient, Range};
use chrono::NaiveDate;
use futures_util::future::join_all;
use tracing::{debug, info, warn};

use crate::convert::{CombinedParts, snapshot_from_wire};
use crate::error::CoreError;
use crate::model::{
    CombinedAnalytics, DailyPoint, SiteDescriptor, SiteSnapshot, SiteSummary, SiteTrend, Tally,
    VisitorTotals,
};

/// Length of each ranked list unless configured otherwise.
pub const DEFAULT_TOP_N: usize = 10;

/// Anything that can produce one site's raw snapshot.
///
/// Implemented by [`AnalyticsClient`]; tests substitute in-memory fakes.
pub trait SnapshotSource {
    fn fetch_snapshot(
        &self,
        site_id: &str,
        range: Range,
    ) -> impl Future<Output = Result<EnhancedAnalytics, aihref_api::Error>> + Send;
}

impl SnapshotSource for AnalyticsClient {
    fn fetch_snapshot(
        &self,
        site_id: &str,
        range: Range,
    ) -> impl Future<Output = Result<EnhancedAnalytics, aihref_api::Error>> + Send {
        self.enhanced_analytics(site_id, range)
    }
}

// ── Fetch + fold ─────────────────────────────────────────────────────

/// Fetch every site concurrently and fold the ones that answered.
///
/// Failed sites are logged, left out of the sums, and listed in
/// [`CombinedAnalytics::failed_sites`]. Only a total wipeout is an error.
pub async fn combine_sites<S>(
    source: &S,
    sites: &[SiteDescriptor],
    range: Range,
    top_n: usize,
) -> Result<CombinedAnalytics, CoreError>
where
    S: SnapshotSource + Sync,
{
    if sites.is_empty() {
        return Err(CoreError::NoSites);
    }

    // All requests are created before any is polled to completion.
    let futs = sites.iter().map(|site| async move {
        let result = source.fetch_snapshot(&site.site_id, range).await;
        (site, result)
    });
    let outcomes = join_all(futs).await;

    let mut fetched: Vec<(&SiteDescriptor, SiteSnapshot)> = Vec::with_capacity(sites.len());
    let mut failed_sites = Vec::new();
    for (site, result) in outcomes {
        match result {
            Ok(wire) => {
                debug!(site_id = %site.site_id, "site snapshot received");
                fetched.push((site, snapshot_from_wire(&site.site_id, range, wire)));
            }
            Err(e) => {
                warn!(
                    site_id = %site.site_id,
                    error = %e,
                    "site fetch failed, excluding from combined view"
                );
                failed_sites.push(site.site_id.clone());
            }
        }
    }

    if fetched.is_empty() {
        return Err(CoreError::CombinedFetchFailed {
            reason: format!("all {} site requests failed", sites.len()),
        });
    }

    let mut combined = combine(range, &fetched, top_n);
    combined.failed_sites = failed_sites;
    info!(
        %range,
        sites = combined.sites.len(),
        failed = combined.failed_sites.len(),
        total_visitors = combined.totals.total,
        "combined analytics ready"
    );
    Ok(combined)
}

/// Fold already-fetched snapshots. Pure; no I/O.
pub fn combine(
    range: Range,
    snapshots: &[(&SiteDescriptor, SiteSnapshot)],
    top_n: usize,
) -> CombinedAnalytics {
    let mut totals = VisitorTotals::default();
    for (_, snap) in snapshots {
        totals += snap.totals;
    }

    let sites = snapshots
        .iter()
        .map(|(site, snap)| SiteSummary::new(site, snap.totals))
        .collect();

    CombinedAnalytics {
        range,
        totals,
        top_countries: merge_tallies(snapshots.iter().flat_map(|(_, s)| &s.top_countries), top_n),
        top_pages: merge_tallies(snapshots.iter().flat_map(|(_, s)| &s.top_pages), top_n),
        top_sources: merge_tallies(snapshots.iter().flat_map(|(_, s)| &s.top_sources), top_n),
        daily: merge_daily(snapshots.iter().flat_map(|(_, s)| &s.daily)),
        sites,
        failed_sites: Vec::new(),
        last_updated: snapshots.iter().filter_map(|(_, s)| s.last_updated).max(),
    }
}

/// Normalize the backend's own combination so it obeys the same ordering
/// and length rules as a client-side fold.
pub fn combine_backend(
    range: Range,
    response: CombinedAnalyticsResponse,
    top_n: usize,
) -> CombinedAnalytics {
    let parts = CombinedParts::from(response);
    CombinedAnalytics {
        range,
        totals: parts.totals,
        top_countries: merge_tallies(&parts.top_countries, top_n),
        top_pages: merge_tallies(&parts.top_pages, top_n),
        top_sources: merge_tallies(&parts.top_sources, top_n),
        daily: merge_daily(&parts.daily),
        sites: parts.sites,
        failed_sites: Vec::new(),
        last_updated: parts.last_updated,
    }
}

// ── Merge helpers ────────────────────────────────────────────────────

/// Group by label, sum counts, rank descending, keep the first `top_n`.
///
/// Equal counts are ordered by label, ascending.
pub fn merge_tallies<'a>(tallies: impl IntoIterator<Item = &'a Tally>, top_n: usize) -> Vec<Tally> {
    let mut grouped: BTreeMap<&str, u64> = BTreeMap::new();
    for tally in tallies {
        let slot = grouped.entry(tally.label.as_str()).or_default();
        *slot = slot.saturating_add(tally.count);
    }

    // BTreeMap yields labels ascending; the stable sort keeps that for ties.
    let mut ranked: Vec<Tally> = grouped
        .into_iter()
        .map(|(label, count)| Tally::new(label, count))
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(top_n);
    ranked
}

/// Sum visitors and pageviews per calendar date, ascending by date.
pub fn merge_daily<'a>(points: impl IntoIterator<Item = &'a DailyPoint>) -> Vec<DailyPoint> {
    let mut by_date: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();
    for point in points {
        let (visitors, pageviews) = by_date.entry(point.date).or_default();
        *visitors = visitors.saturating_add(point.visitors);
        *pageviews = pageviews.saturating_add(point.pageviews);
    }

    by_date
        .into_iter()
        .map(|(date, (visitors, pageviews))| DailyPoint {
            date,
            visitors,
            pageviews,
        })
        .collect()
}

/// Estimate each site's daily series from the combined one.
///
/// Every day is scaled by the site's share of total visitors and rounded
/// half-up. These are display estimates, not measurements: the per-day
/// estimates need not sum back to the combined value.
pub fn proportional_daily(combined: &CombinedAnalytics) -> Vec<SiteTrend> {
    let total = combined.totals.total;
    combined
        .sites
        .iter()
        .map(|site| SiteTrend {
            site_id: site.site_id.clone(),
            site_name: site.site_name.clone(),
            daily: combined
                .daily
                .iter()
                .map(|day| DailyPoint {
                    date: day.date,
                    visitors: scale(day.visitors, site.totals.total, total),
                    pageviews: scale(day.pageviews, site.totals.total, total),
                })
                .collect(),
        })
        .collect()
}

/// `round(value * part / whole)`, zero when `whole` is zero.
fn scale(value: u64, part: u64, whole: u64) -> u64 {
    if whole == 0 {
        return 0;
    }
    let num = u128::from(value) * u128::from(part) * 2 + u128::from(whole);
    let den = u128::from(whole) * 2;
    u64::try_from(num / den).unwrap_or(u64::MAX)
}
