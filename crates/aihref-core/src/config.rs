// ── Runtime dashboard configuration ──
//
// These types describe *which* backend to talk to and *which* sites to
// combine. They never touch disk: the CLI (via aihref-config) builds a
// `DashboardConfig` and hands it in.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

use crate::combiner::DEFAULT_TOP_N;
use crate::error::CoreError;
use crate::model::{SiteDescriptor, default_sites};

/// Backend used when no profile or flag names one.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// Where cross-site numbers come from.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CombineMode {
    /// Fetch every site's snapshot and fold them locally.
    #[default]
    Client,
    /// Trust `/api/analytics/combined`, which the backend folds itself.
    Backend,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed staging backends).
    DangerAcceptInvalid,
}

/// Configuration for one analytics backend and the sites it serves.
///
/// Built by the CLI, passed to [`Dashboard`](crate::Dashboard).
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Backend base URL (e.g., `http://localhost:8080`).
    pub url: Url,
    /// Sites combined into the portfolio view, in display order.
    pub sites: Vec<SiteDescriptor>,
    pub combine_mode: CombineMode,
    /// Length limit for each ranked list in the combined view.
    pub top_n: usize,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
}

impl DashboardConfig {
    /// Config for `url` with the default site list and settings.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            sites: default_sites(),
            combine_mode: CombineMode::default(),
            top_n: DEFAULT_TOP_N,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Check the invariants the combiner relies on.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.top_n == 0 {
            return Err(CoreError::Config {
                message: "top_n must be at least 1".into(),
            });
        }

        let mut seen = HashSet::new();
        for site in &self.sites {
            if site.site_id.trim().is_empty() {
                return Err(CoreError::Config {
                    message: "site ids must not be empty".into(),
                });
            }
            if !seen.insert(site.site_id.as_str()) {
                return Err(CoreError::Config {
                    message: format!("duplicate site id '{}'", site.site_id),
                });
            }
        }
        Ok(())
    }

    /// Look up a configured site by id.
    pub fn site(&self, site_id: &str) -> Option<&SiteDescriptor> {
        self.sites.iter().find(|s| s.site_id == site_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn config() -> DashboardConfig {
        DashboardConfig::new(DEFAULT_BACKEND_URL.parse().unwrap())
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = config();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.sites.len(), 4);
        assert_eq!(cfg.top_n, 10);
        assert_eq!(cfg.combine_mode, CombineMode::Client);
    }

    #[test]
    fn duplicate_site_ids_are_rejected() {
        let mut cfg = config();
        cfg.sites.push(SiteDescriptor::new("greplus", "Again", "greplus.com"));
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate site id 'greplus'"));
    }

    #[test]
    fn zero_top_n_is_rejected() {
        let mut cfg = config();
        cfg.top_n = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn combine_mode_parses_case_insensitively() {
        assert_eq!(CombineMode::from_str("Backend").unwrap(), CombineMode::Backend);
        assert_eq!(CombineMode::Client.to_string(), "client");
        assert!(CombineMode::from_str("hybrid").is_err());
    }
}
