//! Backend maintenance: re-aggregation and health probes.

use std::fmt::Write;

use aihref_core::{Dashboard, HealthReport, ServiceHealth};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

fn health_line(out: &mut String, name: &str, health: Option<&ServiceHealth>, color: bool) {
    match health {
        Some(h) => {
            let word = output::status_word(&h.status, h.is_healthy(), color);
            let _ = write!(out, "  {name:<10} {word}");
            if !h.message.is_empty() {
                let _ = write!(out, "  {}", output::dim(&h.message, color));
            }
            if h.gemini_configured == Some(false) {
                let _ = write!(out, "  {}", output::dim("(AI model not configured)", color));
            }
            let _ = writeln!(out);
        }
        None => {
            let _ = writeln!(
                out,
                "  {name:<10} {}",
                output::status_word("unreachable", false, color)
            );
        }
    }
}

fn health_detail(report: &HealthReport, color: bool) -> String {
    let mut out = String::new();
    health_line(&mut out, "backend", Some(&report.backend), color);
    health_line(&mut out, "insights", report.insights.as_ref(), color);
    out.trim_end().to_owned()
}

pub async fn aggregate(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    let spinner = output::spinner("Triggering aggregation...", global);
    let result = dashboard.trigger_aggregation().await;
    output::finish(spinner);
    let status = result?;

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &status,
        |s| {
            let msg = if s.message.is_empty() {
                "Aggregation triggered".to_owned()
            } else {
                s.message.clone()
            };
            format!("{} {msg}", output::status_word("✓", true, color))
        },
        |s| s.status.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn health(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    let report = dashboard.health().await?;
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &report,
        |r| health_detail(r, color),
        |r| r.backend.status.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
