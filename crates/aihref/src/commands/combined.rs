//! Combined (all-sites) analytics.

use std::fmt::Write;

use tabled::Tabled;

use aihref_core::{CombinedAnalytics, Dashboard, SiteSummary};

use crate::cli::{CombinedArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct SiteTotalsRow {
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "Visitors")]
    visitors: String,
    #[tabled(rename = "Today")]
    today: String,
    #[tabled(rename = "Week")]
    week: String,
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Repeat")]
    repeat: String,
}

impl From<&SiteSummary> for SiteTotalsRow {
    fn from(s: &SiteSummary) -> Self {
        Self {
            site: s.site_name.clone(),
            visitors: output::count(s.totals.total),
            today: output::count(s.totals.today),
            week: output::count(s.totals.this_week),
            month: output::count(s.totals.this_month),
            repeat: output::count(s.totals.repeat_today),
        }
    }
}

/// Table-mode rendering of the combined view.
pub fn detail(combined: &CombinedAnalytics, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        output::heading(&format!("All sites · {}", combined.range.label()), color)
    );
    if combined.is_partial() {
        let _ = writeln!(
            out,
            "{} {} unavailable: {}",
            output::status_word("Partial data:", false, color),
            combined.failed_sites.len(),
            combined.failed_sites.join(", ")
        );
    }
    util::push_totals(&mut out, &combined.totals);

    if !combined.sites.is_empty() {
        let rows: Vec<SiteTotalsRow> = combined.sites.iter().map(SiteTotalsRow::from).collect();
        let _ = writeln!(out, "\n{}", output::heading("Per site", color));
        let _ = writeln!(out, "{}", output::render_table(&rows));
    }

    util::push_tallies(&mut out, "Top countries", &combined.top_countries, color);
    util::push_tallies(&mut out, "Top pages", &combined.top_pages, color);
    util::push_tallies(&mut out, "Top sources", &combined.top_sources, color);
    util::push_daily(&mut out, "Daily visitors", &combined.daily, color);

    if let Some(updated) = combined.last_updated {
        let _ = write!(
            out,
            "\n{}",
            output::dim(&format!("Last updated {updated}"), color)
        );
    }
    out
}

pub fn render(combined: &CombinedAnalytics, global: &GlobalOpts) -> Result<String, CliError> {
    let color = output::should_color(&global.color);
    output::render_single(
        &global.output,
        combined,
        |c| detail(c, color),
        |c| c.totals.total.to_string(),
    )
}

pub async fn handle(
    dashboard: &Dashboard,
    args: CombinedArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let range = util::range(args.range);
    let mode = args
        .mode
        .map_or(dashboard.config().combine_mode, util::combine_mode);

    let spinner = output::spinner("Combining site analytics...", global);
    let result = dashboard.combined_with_mode(range, mode).await;
    output::finish(spinner);
    let combined = result?;

    let out = render(&combined, global)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use aihref_core::{Range, VisitorTotals};

    use super::*;

    fn combined(failed: Vec<String>) -> CombinedAnalytics {
        CombinedAnalytics {
            range: Range::Last7Days,
            totals: VisitorTotals {
                total: 1500,
                ..VisitorTotals::default()
            },
            top_countries: Vec::new(),
            top_pages: Vec::new(),
            top_sources: Vec::new(),
            daily: Vec::new(),
            sites: Vec::new(),
            failed_sites: failed,
            last_updated: None,
        }
    }

    #[test]
    fn partial_view_names_missing_sites() {
        let text = detail(&combined(vec!["aihref".into()]), false);
        assert!(text.contains("Partial data: 1 unavailable: aihref"));
        assert!(text.contains("Total visitors:   1,500"));
    }

    #[test]
    fn complete_view_has_no_partial_banner() {
        let text = detail(&combined(Vec::new()), false);
        assert!(!text.contains("Partial data"));
        assert!(text.starts_with("All sites · Last 7 days"));
    }
}
