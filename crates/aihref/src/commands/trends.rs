use std::fmt::Write;

use serde::Serialize;
use tabled::Tabled;

use aihref_core::{CombinedAnalytics, Dashboard, DailyPoint, SiteTrend};

use crate::cli::{GlobalOpts, OutputFormat, TrendsArgs};
use crate::error::CliError;
use crate::output;

use super::util::{self, DailyRow};

/// One row of the `--by-site` table: an estimated figure for one site on one day.
#[derive(Tabled)]
struct SiteDayRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "Visitors (est.)")]
    visitors: String,
    #[tabled(rename = "Pageviews (est.)")]
    pageviews: String,
}

#[derive(Serialize)]
struct BySite<'a> {
    range: &'a str,
    combined: &'a [DailyPoint],
    sites: &'a [SiteTrend],
}

fn by_site_detail(combined: &CombinedAnalytics, trends: &[SiteTrend], color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        output::heading(
            &format!("Per-site trends · {}", combined.range.label()),
            color
        )
    );
    let _ = writeln!(
        out,
        "{}",
        output::dim("Estimated from each site's share of total visitors.", color)
    );

    let rows: Vec<SiteDayRow> = combined
        .daily
        .iter()
        .enumerate()
        .flat_map(|(i, day)| {
            trends.iter().filter_map(move |t| {
                t.daily.get(i).map(|p| SiteDayRow {
                    date: day.date.to_string(),
                    site: t.site_name.clone(),
                    visitors: output::count(p.visitors),
                    pageviews: output::count(p.pageviews),
                })
            })
        })
        .collect();
    if rows.is_empty() {
        let _ = write!(out, "  -");
    } else {
        let _ = write!(out, "{}", output::render_table(&rows));
    }
    out
}

fn render_daily(format: &OutputFormat, daily: &[DailyPoint]) -> Result<String, CliError> {
    output::render_list(format, daily, |d| DailyRow::from(d), |d| {
        format!("{}\t{}", d.date, d.visitors)
    })
}

pub async fn handle(dashboard: &Dashboard, args: TrendsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let range = util::range(args.range);
    let color = output::should_color(&global.color);

    let out = if args.by_site {
        let spinner = output::spinner("Combining site analytics...", global);
        let result = dashboard.combined_trends(range).await;
        output::finish(spinner);
        let (combined, trends) = result?;

        let view = BySite {
            range: range.as_str(),
            combined: &combined.daily,
            sites: &trends,
        };
        output::render_single(
            &global.output,
            &view,
            |_| by_site_detail(&combined, &trends, color),
            |v| v.sites.iter().map(|t| t.site_id.clone()).collect::<Vec<_>>().join("\n"),
        )?
    } else {
        let daily = match args.site_id {
            Some(ref id) => {
                let spinner = output::spinner("Fetching visitor trends...", global);
                let result = dashboard.visitor_trends(id, range).await;
                output::finish(spinner);
                result?
            }
            None => {
                let spinner = output::spinner("Combining site analytics...", global);
                let result = dashboard.combined(range).await;
                output::finish(spinner);
                result?.daily
            }
        };
        render_daily(&global.output, &daily)?
    };

    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use aihref_core::{Range, VisitorTotals};
    use chrono::NaiveDate;

    use super::*;

    fn point(day: u32, visitors: u64) -> DailyPoint {
        DailyPoint {
            date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            visitors,
            pageviews: visitors * 2,
        }
    }

    #[test]
    fn by_site_rows_follow_combined_dates() {
        let combined = CombinedAnalytics {
            range: Range::Last7Days,
            totals: VisitorTotals::default(),
            top_countries: Vec::new(),
            top_pages: Vec::new(),
            top_sources: Vec::new(),
            daily: vec![point(1, 10), point(2, 20)],
            sites: Vec::new(),
            failed_sites: Vec::new(),
            last_updated: None,
        };
        let trends = vec![SiteTrend {
            site_id: "greplus".into(),
            site_name: "GRE Plus".into(),
            daily: vec![point(1, 4), point(2, 8)],
        }];

        let text = by_site_detail(&combined, &trends, false);
        assert!(text.contains("2026-03-01"));
        assert!(text.contains("2026-03-02"));
        assert!(text.contains("GRE Plus"));
        assert!(text.contains("Estimated"));
    }

    #[test]
    fn daily_series_renders_as_table_and_plain() {
        let daily = [point(1, 1200), point(2, 30)];

        let table = render_daily(&OutputFormat::Table, &daily).unwrap();
        assert!(table.contains("2026-03-01"));
        assert!(table.contains("1,200"));
        assert!(table.contains("2,400"));

        let plain = render_daily(&OutputFormat::Plain, &daily).unwrap();
        assert_eq!(plain, "2026-03-01\t1200\n2026-03-02\t30");
    }
}
