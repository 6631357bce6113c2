//! AI insight commands.

use std::fmt::Write;

use aihref_core::{Dashboard, InsightsRequest, InsightsResponse};

use crate::cli::{GlobalOpts, InsightsArgs, InsightsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

fn push_section(out: &mut String, title: &str, items: &[String], color: bool) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{}", output::heading(title, color));
    for item in items {
        let _ = writeln!(out, "  • {item}");
    }
}

fn detail(resp: &InsightsResponse, color: bool) -> String {
    let mut out = String::new();
    if !resp.summary.is_empty() {
        let _ = writeln!(out, "{}", resp.summary.trim());
    }
    push_section(&mut out, "Key insights", &resp.key_insights, color);
    push_section(&mut out, "Trends", &resp.trends, color);
    push_section(&mut out, "Predictions", &resp.predictions, color);
    push_section(&mut out, "Recommendations", &resp.recommendations, color);

    if !resp.metrics.is_empty() {
        let _ = writeln!(out, "\n{}", output::heading("Metrics", color));
        for (key, value) in &resp.metrics {
            let _ = writeln!(out, "  {key}: {value}");
        }
    }
    if let Some(ref at) = resp.generated_at {
        let _ = write!(out, "\n{}", output::dim(&format!("Generated {at}"), color));
    }
    out.trim_end().to_owned()
}

pub async fn handle(
    dashboard: &Dashboard,
    args: InsightsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let spinner = output::spinner("Asking for insights...", global);
    let result = match args.command {
        InsightsCommand::Ask {
            query,
            site,
            range,
            trends,
            predictions,
        } => {
            let request = InsightsRequest {
                site_id: site,
                range: util::range(range),
                query,
                include_trends: trends,
                include_predictions: predictions,
            };
            if request.site_id.is_some() {
                dashboard.insights(&request).await
            } else {
                dashboard.combined_insights(&request).await
            }
        }
        InsightsCommand::Quick { site, range } => match site {
            Some(id) => dashboard.quick_insights(&id, util::range(range)).await,
            None => dashboard.combined_quick_insights(util::range(range)).await,
        },
    };
    output::finish(spinner);
    let resp = result?;

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &resp,
        |r| detail(r, color),
        |r| r.summary.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
