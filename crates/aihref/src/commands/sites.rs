//! Site command handlers: the configured list and one site's snapshot.

use std::fmt::Write;

use tabled::Tabled;

use aihref_core::{AnalyticsSummary, Dashboard, SiteDescriptor, SiteSnapshot, Tally};

use crate::cli::{GlobalOpts, OutputFormat, SiteArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Website")]
    website: String,
}

impl From<&SiteDescriptor> for SiteRow {
    fn from(s: &SiteDescriptor) -> Self {
        Self {
            id: s.site_id.clone(),
            name: s.site_name.clone(),
            website: s.website.clone(),
        }
    }
}

#[derive(Tabled)]
struct LocationRow {
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Count")]
    count: String,
}

// ── Detail views ────────────────────────────────────────────────────

fn snapshot_detail(snap: &SiteSnapshot, name: &str, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        output::heading(&format!("{name} · {}", snap.range.label()), color)
    );
    util::push_totals(&mut out, &snap.totals);

    let h = &snap.highlights;
    if let Some(ref day) = h.peak_day {
        let peak = h.peak_count.map(output::count).unwrap_or_default();
        let _ = writeln!(out, "  Peak day:         {day} ({peak})");
    }
    if let Some(ref country) = h.top_country {
        let _ = writeln!(out, "  Top country:      {country}");
    }
    if let Some(ref source) = h.top_source {
        let _ = writeln!(out, "  Top source:       {source}");
    }
    if let Some(avg) = h.avg_visits_per_day {
        let _ = writeln!(out, "  Avg visits/day:   {avg:.1}");
    }
    if let Some(avg) = h.avg_visits_per_week {
        let _ = writeln!(out, "  Avg visits/week:  {avg:.1}");
    }
    if let Some(avg) = h.avg_repeat_visitors_per_day {
        let _ = writeln!(out, "  Avg repeat/day:   {avg:.1}");
    }

    util::push_tallies(&mut out, "Top pages", &snap.top_pages, color);
    util::push_tallies(&mut out, "Top countries", &snap.top_countries, color);
    util::push_tallies(&mut out, "Top sources", &snap.top_sources, color);

    if !snap.top_locations.is_empty() {
        let _ = writeln!(out, "\n{}", output::heading("Top locations", color));
        let rows: Vec<LocationRow> = snap
            .top_locations
            .iter()
            .map(|l| LocationRow {
                location: l.display_name(),
                count: output::count(l.count),
            })
            .collect();
        let _ = writeln!(out, "{}", output::render_table(&rows));
    }

    util::push_daily(&mut out, "Daily visitors", &snap.daily, color);

    if let Some(updated) = snap.last_updated {
        let _ = write!(
            out,
            "\n{}",
            output::dim(&format!("Last updated {updated}"), color)
        );
    }
    out
}

fn summary_detail(summary: &AnalyticsSummary, name: &str, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", output::heading(name, color));
    let _ = writeln!(out, "  Visitors:   {}", output::count(summary.visitors));
    let _ = writeln!(out, "  Pageviews:  {}", output::count(summary.pageviews));

    let pages: Vec<Tally> = summary.top_pages.iter().cloned().map(Tally::from).collect();
    let countries: Vec<Tally> = summary
        .top_countries
        .iter()
        .cloned()
        .map(Tally::from)
        .collect();
    util::push_tallies(&mut out, "Top pages", &pages, color);
    util::push_tallies(&mut out, "Top countries", &countries, color);
    out
}

// ── Handlers ────────────────────────────────────────────────────────

fn render_sites(format: &OutputFormat, sites: &[SiteDescriptor]) -> Result<String, CliError> {
    output::render_list(format, sites, |s| SiteRow::from(s), |s| s.site_id.clone())
}

pub fn list(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    let out = render_sites(&global.output, dashboard.sites())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn show(dashboard: &Dashboard, args: SiteArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let range = util::range(args.range);
    let color = output::should_color(&global.color);
    let name = dashboard
        .config()
        .site(args.site_id.trim())
        .map_or_else(|| args.site_id.clone(), |s| s.site_name.clone());

    let spinner = output::spinner(&format!("Fetching {name}..."), global);
    let out = if args.summary {
        let result = dashboard.site_summary(&args.site_id, range).await;
        output::finish(spinner);
        let summary = result?;
        output::render_single(
            &global.output,
            &summary,
            |s| summary_detail(s, &name, color),
            |s| s.visitors.to_string(),
        )?
    } else {
        let result = dashboard.site_snapshot(&args.site_id, range).await;
        output::finish(spinner);
        let snap = result?;
        output::render_single(
            &global.output,
            &snap,
            |s| snapshot_detail(s, &name, color),
            |s| s.totals.total.to_string(),
        )?
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
