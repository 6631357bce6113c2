// ── Domain model ──

pub mod analytics;
pub mod site;

pub use analytics::{
    CombinedAnalytics, DailyPoint, Highlights, Location, SiteSnapshot, SiteTrend, Tally,
    VisitorTotals,
};
pub use site::{SiteDescriptor, SiteSummary, default_sites};
