// ── Wire → domain conversions ──
//
// Each tally kind arrives with its own label key (`url`, `page`, `country`,
// `source`); everything becomes a `Tally` here so the combiner can treat
// them uniformly.

use aihref_api::models::{
    CombinedAnalyticsResponse, CombinedPageCount, CountryCount, DailyVisitorCount,
    EnhancedAnalytics, LocationCount, PageCount, SiteAnalytics, SourceCount,
};
use aihref_api::Range;

use crate::model::{
    DailyPoint, Highlights, Location, SiteSnapshot, SiteSummary, Tally, VisitorTotals,
};

impl From<PageCount> for Tally {
    fn from(p: PageCount) -> Self {
        Tally::new(p.url, p.count)
    }
}

impl From<CombinedPageCount> for Tally {
    fn from(p: CombinedPageCount) -> Self {
        Tally::new(p.page, p.count)
    }
}

impl From<CountryCount> for Tally {
    fn from(c: CountryCount) -> Self {
        Tally::new(c.country, c.count)
    }
}

impl From<SourceCount> for Tally {
    fn from(s: SourceCount) -> Self {
        Tally::new(s.source, s.count)
    }
}

impl From<DailyVisitorCount> for DailyPoint {
    fn from(d: DailyVisitorCount) -> Self {
        DailyPoint {
            date: d.date,
            visitors: d.visitors,
            pageviews: d.pageviews,
        }
    }
}

impl From<LocationCount> for Location {
    fn from(l: LocationCount) -> Self {
        Location {
            city: l.city,
            state: l.state,
            country: l.country,
            count: l.count,
        }
    }
}

impl From<&EnhancedAnalytics> for VisitorTotals {
    fn from(a: &EnhancedAnalytics) -> Self {
        VisitorTotals {
            total: a.total_visitors_till_date,
            today: a.today_visitors,
            this_week: a.this_week_visitors,
            this_month: a.this_month_visitors,
            repeat_today: a.repeat_visitors_today,
        }
    }
}

impl From<&SiteAnalytics> for VisitorTotals {
    fn from(s: &SiteAnalytics) -> Self {
        VisitorTotals {
            total: s.visitors,
            today: s.today_visitors,
            this_week: s.week_visitors,
            this_month: s.month_visitors,
            repeat_today: s.repeat_visitors,
        }
    }
}

impl From<SiteAnalytics> for SiteSummary {
    fn from(s: SiteAnalytics) -> Self {
        let totals = VisitorTotals::from(&s);
        SiteSummary {
            site_id: s.site_id,
            site_name: s.site_name,
            website: s.website,
            totals,
        }
    }
}

fn tallies<T: Into<Tally>>(items: Vec<T>) -> Vec<Tally> {
    items.into_iter().map(Into::into).collect()
}

/// Build a snapshot for `site_id`.
///
/// The requested site and range win over whatever the payload echoes back,
/// and the daily series is sorted so downstream code can rely on date order.
pub fn snapshot_from_wire(site_id: &str, range: Range, a: EnhancedAnalytics) -> SiteSnapshot {
    let totals = VisitorTotals::from(&a);
    let mut daily: Vec<DailyPoint> = a
        .daily_visitor_trends
        .into_iter()
        .map(DailyPoint::from)
        .collect();
    daily.sort_by_key(|d| d.date);

    SiteSnapshot {
        site_id: site_id.to_owned(),
        range,
        totals,
        highlights: Highlights {
            peak_day: a.peak_visit_day,
            peak_count: a.peak_visit_count,
            top_country: a.top_country,
            top_source: a.top_source,
            avg_visits_per_day: a.avg_visits_per_day,
            avg_visits_per_week: a.avg_visits_per_week,
            avg_repeat_visitors_per_day: a.avg_repeat_visitors_per_day,
        },
        top_pages: tallies(a.top_pages),
        top_countries: tallies(a.top_countries),
        top_sources: tallies(a.top_sources),
        top_locations: a.top_locations.into_iter().map(Location::from).collect(),
        daily,
        last_updated: a.last_updated,
    }
}

/// Raw pieces of a backend-combined payload, before ranking.
pub(crate) struct CombinedParts {
    pub totals: VisitorTotals,
    pub sites: Vec<SiteSummary>,
    pub top_countries: Vec<Tally>,
    pub top_pages: Vec<Tally>,
    pub top_sources: Vec<Tally>,
    pub daily: Vec<DailyPoint>,
    pub last_updated: Option<chrono::NaiveDateTime>,
}

impl From<CombinedAnalyticsResponse> for CombinedParts {
    fn from(r: CombinedAnalyticsResponse) -> Self {
        CombinedParts {
            totals: VisitorTotals {
                total: r.total_visitors,
                today: r.total_today_visitors,
                this_week: r.total_week_visitors,
                this_month: r.total_month_visitors,
                repeat_today: r.total_repeat_visitors,
            },
            sites: r.sites.into_iter().map(SiteSummary::from).collect(),
            top_countries: tallies(r.top_countries),
            top_pages: tallies(r.top_pages),
            top_sources: tallies(r.top_sources),
            daily: r.daily_visitors.into_iter().map(DailyPoint::from).collect(),
            last_updated: r.last_updated,
        }
    }
}
