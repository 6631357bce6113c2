//! `watch`: re-render the combined view on a fixed interval.
//!
//! Each tick starts a fetch through a [`ViewController`]. Ticks that land
//! while a fetch is still running are skipped, so a backend slower than the
//! interval delays the next view instead of discarding every response.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use aihref_core::{CombinedAnalytics, Dashboard, Selection, ViewController, ViewState};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::{combined, util};

pub(crate) fn parse_interval(raw: &str) -> Result<Duration, CliError> {
    let interval = humantime::parse_duration(raw).map_err(|e| CliError::Validation {
        field: "interval".into(),
        reason: e.to_string(),
    })?;
    if interval.is_zero() {
        return Err(CliError::Validation {
            field: "interval".into(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(interval)
}

pub async fn handle(dashboard: &Dashboard, args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let period = parse_interval(&args.interval)?;
    let range = util::range(args.range);
    let color = output::should_color(&global.color);

    let view: Arc<ViewController<CombinedAnalytics>> = Arc::new(ViewController::new());
    let mut rx = view.subscribe();

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut remaining = args.count;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                match state {
                    ViewState::Ready { data, .. } => {
                        if matches!(global.output, OutputFormat::Table) && !global.quiet {
                            let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
                            println!("{}", output::dim(&format!("── {stamp} ──"), color));
                        }
                        let out = combined::render(&data, global)?;
                        output::print_output(&out, global.quiet);
                    }
                    ViewState::Failed { selection, message } => {
                        eprintln!(
                            "{} {selection}: {message}",
                            output::status_word("refresh failed", false, color)
                        );
                    }
                    ViewState::Idle | ViewState::Loading { .. } => continue,
                }
                if let Some(ref mut n) = remaining {
                    *n = n.saturating_sub(1);
                    if *n == 0 {
                        break;
                    }
                }
            }
            _ = ticker.tick() => {
                // A refresh of the same selection never supersedes one in flight
                if view.current().is_loading() {
                    debug!(%range, "previous refresh still running, skipping tick");
                    continue;
                }
                // Begin before spawning so the next tick already sees Loading
                let token = view.begin(Selection::combined(range));
                let view = Arc::clone(&view);
                let dashboard = dashboard.clone();
                debug!(%range, generation = token.generation(), "watch tick");
                tokio::spawn(async move {
                    let result = dashboard.combined(range).await;
                    view.complete(token, result);
                });
            }
        }
    }

    cancel.cancel();
    Ok(())
}
