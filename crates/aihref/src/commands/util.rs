//! Shared helpers for command handlers.

use std::fmt::Write;

use tabled::Tabled;

use aihref_core::{CombineMode, DailyPoint, Range, Tally, VisitorTotals};

use crate::cli::{CombineModeArg, RangeArg};
use crate::output;

pub fn range(arg: RangeArg) -> Range {
    match arg {
        RangeArg::Week => Range::Last7Days,
        RangeArg::Month => Range::LastMonth,
        RangeArg::ThirtyDays => Range::Last30Days,
        RangeArg::Year => Range::LastYear,
        RangeArg::FiveYears => Range::Last5Years,
        RangeArg::All => Range::AllTime,
    }
}

pub fn combine_mode(arg: CombineModeArg) -> CombineMode {
    match arg {
        CombineModeArg::Client => CombineMode::Client,
        CombineModeArg::Backend => CombineMode::Backend,
    }
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct TallyRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Count")]
    count: String,
}

#[derive(Tabled)]
pub struct DailyRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Visitors")]
    visitors: String,
    #[tabled(rename = "Pageviews")]
    pageviews: String,
}

impl From<&DailyPoint> for DailyRow {
    fn from(d: &DailyPoint) -> Self {
        Self {
            date: d.date.to_string(),
            visitors: output::count(d.visitors),
            pageviews: output::count(d.pageviews),
        }
    }
}

// ── Detail-view sections ────────────────────────────────────────────

/// Append a titled ranked table, or a dash when the list is empty.
pub fn push_tallies(out: &mut String, title: &str, tallies: &[Tally], color: bool) {
    let _ = writeln!(out, "\n{}", output::heading(title, color));
    if tallies.is_empty() {
        let _ = writeln!(out, "  -");
        return;
    }
    let rows: Vec<TallyRow> = tallies
        .iter()
        .enumerate()
        .map(|(i, t)| TallyRow {
            rank: i + 1,
            label: t.label.clone(),
            count: output::count(t.count),
        })
        .collect();
    let _ = writeln!(out, "{}", output::render_table(&rows));
}

pub fn push_daily(out: &mut String, title: &str, daily: &[DailyPoint], color: bool) {
    let _ = writeln!(out, "\n{}", output::heading(title, color));
    if daily.is_empty() {
        let _ = writeln!(out, "  -");
        return;
    }
    let rows: Vec<DailyRow> = daily.iter().map(DailyRow::from).collect();
    let _ = writeln!(out, "{}", output::render_table(&rows));
}

pub fn push_totals(out: &mut String, totals: &VisitorTotals) {
    let _ = writeln!(out, "  Total visitors:   {}", output::count(totals.total));
    let _ = writeln!(out, "  Today:            {}", output::count(totals.today));
    let _ = writeln!(out, "  This week:        {}", output::count(totals.this_week));
    let _ = writeln!(out, "  This month:       {}", output::count(totals.this_month));
    let _ = writeln!(out, "  Repeat today:     {}", output::count(totals.repeat_today));
}
