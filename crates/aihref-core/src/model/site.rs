// ── Site domain types ──

use serde::{Deserialize, Serialize};

use super::analytics::VisitorTotals;

/// A tracked website. Static configuration, never fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteDescriptor {
    /// Identifier the backend keys analytics by (e.g., "greplus").
    pub site_id: String,
    /// Human-friendly display name.
    pub site_name: String,
    /// Public hostname, without scheme.
    pub website: String,
}

impl SiteDescriptor {
    pub fn new(
        site_id: impl Into<String>,
        site_name: impl Into<String>,
        website: impl Into<String>,
    ) -> Self {
        Self {
            site_id: site_id.into(),
            site_name: site_name.into(),
            website: website.into(),
        }
    }
}

/// The portfolio served by the production backend.
pub fn default_sites() -> Vec<SiteDescriptor> {
    vec![
        SiteDescriptor::new("greplus", "GRE Plus", "greplus.com"),
        SiteDescriptor::new("novareaders", "Nova Readers", "novareaders.com"),
        SiteDescriptor::new("aixrayassist", "AI X-Ray Assist", "aixrayassist.com"),
        SiteDescriptor::new("aihref", "AIHref", "aihref.com"),
    ]
}

/// One site's row in the combined view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSummary {
    pub site_id: String,
    pub site_name: String,
    pub website: String,
    #[serde(flatten)]
    pub totals: VisitorTotals,
}

impl SiteSummary {
    pub fn new(site: &SiteDescriptor, totals: VisitorTotals) -> Self {
        Self {
            site_id: site.site_id.clone(),
            site_name: site.site_name.clone(),
            website: site.website.clone(),
            totals,
        }
    }
}
