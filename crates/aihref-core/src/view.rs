// ── Range/state controller ──
//
// Tracks the current (site, range) selection and the state of the request
// that serves it. Every selection change bumps a generation counter; a
// completion carrying an older generation is dropped, so a slow response
// for a previous selection can never overwrite a newer one.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use aihref_api::Range;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use crate::error::CoreError;

/// What the user is looking at: one site, or all of them, over a range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    /// `None` selects the combined view.
    pub site: Option<String>,
    pub range: Range,
}

impl Selection {
    pub fn combined(range: Range) -> Self {
        Self { site: None, range }
    }

    pub fn site(site_id: impl Into<String>, range: Range) -> Self {
        Self {
            site: Some(site_id.into()),
            range,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.site {
            Some(site) => write!(f, "{site} ({})", self.range),
            None => write!(f, "all sites ({})", self.range),
        }
    }
}

/// Published state of the current selection.
#[derive(Debug, Clone, Default)]
pub enum ViewState<T> {
    /// Nothing requested yet.
    #[default]
    Idle,
    Loading {
        selection: Selection,
    },
    Ready {
        selection: Selection,
        data: Arc<T>,
    },
    Failed {
        selection: Selection,
        message: String,
    },
}

impl<T> ViewState<T> {
    pub fn selection(&self) -> Option<&Selection> {
        match self {
            Self::Idle => None,
            Self::Loading { selection }
            | Self::Ready { selection, .. }
            | Self::Failed { selection, .. } => Some(selection),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn data(&self) -> Option<&Arc<T>> {
        match self {
            Self::Ready { data, .. } => Some(data),
            _ => None,
        }
    }
}

/// Proof that a request was started for a given selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    generation: u64,
    selection: Selection,
}

impl RequestToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }
}

/// Owns the selection state and discards stale completions.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct ViewController<T> {
    generation: AtomicU64,
    state: watch::Sender<ViewState<T>>,
}

impl<T> Default for ViewController<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ViewController<T> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ViewState::Idle);
        Self {
            generation: AtomicU64::new(0),
            state,
        }
    }

    /// Switch to `selection` and enter `Loading`.
    ///
    /// Any request started before this call becomes stale.
    pub fn begin(&self, selection: Selection) -> RequestToken {
        let mut generation = 0;
        // Bump and publish under the channel lock so `complete` sees both or neither.
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = ViewState::Loading {
                selection: selection.clone(),
            };
        });
        debug!(generation, %selection, "view request started");
        RequestToken {
            generation,
            selection,
        }
    }

    /// Whether `token` still belongs to the newest request.
    pub fn is_current(&self, token: &RequestToken) -> bool {
        self.generation.load(Ordering::SeqCst) == token.generation
    }

    /// Publish the outcome of the request behind `token`.
    ///
    /// Returns `false` (and publishes nothing) if a newer request has
    /// started since.
    pub fn complete(&self, token: RequestToken, result: Result<T, CoreError>) -> bool {
        let RequestToken {
            generation,
            selection,
        } = token;

        let applied = self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = match result {
                Ok(data) => ViewState::Ready {
                    selection: selection.clone(),
                    data: Arc::new(data),
                },
                Err(e) => ViewState::Failed {
                    selection: selection.clone(),
                    message: e.to_string(),
                },
            };
            true
        });

        if !applied {
            debug!(generation, %selection, "discarding stale view result");
        }
        applied
    }

    /// `begin`, await `fetch`, then `complete`.
    pub async fn load<F>(&self, selection: Selection, fetch: F) -> bool
    where
        F: Future<Output = Result<T, CoreError>> + Send,
        T: Send + Sync,
    {
        let token = self.begin(selection);
        let result = fetch.await;
        self.complete(token, result)
    }

    /// Receive every published state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState<T>> {
        self.state.subscribe()
    }

    /// The most recently published selection, if any.
    pub fn selection(&self) -> Option<Selection> {
        self.state.borrow().selection().cloned()
    }
}

impl<T: Clone> ViewController<T> {
    /// Snapshot of the published state.
    pub fn current(&self) -> ViewState<T> {
        self.state.borrow().clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn starts_idle() {
        let view: ViewController<u64> = ViewController::new();
        assert!(matches!(view.current(), ViewState::Idle));
        assert_eq!(view.selection(), None);
    }

    #[test]
    fn begin_then_complete_publishes_ready() {
        let view = ViewController::new();
        let token = view.begin(Selection::combined(Range::Last7Days));
        assert!(view.current().is_loading());

        assert!(view.complete(token, Ok(42u64)));
        let state = view.current();
        assert_eq!(state.data().map(|d| **d), Some(42));
        assert_eq!(
            state.selection(),
            Some(&Selection::combined(Range::Last7Days))
        );
    }

    #[test]
    fn failure_keeps_selection_and_message() {
        let view: ViewController<u64> = ViewController::new();
        let token = view.begin(Selection::site("greplus", Range::LastYear));
        assert!(view.complete(token, Err(CoreError::NoSites)));

        match view.current() {
            ViewState::Failed { selection, message } => {
                assert_eq!(selection.site.as_deref(), Some("greplus"));
                assert_eq!(message, "No sites configured");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn load_applies_result_for_current_selection() {
        let view = ViewController::new();
        let applied = tokio_test::block_on(
            view.load(Selection::site("aihref", Range::AllTime), async { Ok(3u8) }),
        );
        assert!(applied);
        assert_eq!(view.current().data().map(|d| **d), Some(3));
    }

    #[test]
    fn stale_completion_is_discarded() {
        let view = ViewController::new();
        let week = view.begin(Selection::combined(Range::Last7Days));
        let year = view.begin(Selection::combined(Range::LastYear));

        assert!(!view.is_current(&week));
        assert!(view.complete(year, Ok("1y")));
        // The 7d response arrives last and must not win.
        assert!(!view.complete(week, Ok("7d")));

        let state = view.current();
        assert_eq!(state.data().map(|d| **d), Some("1y"));
        assert_eq!(state.selection().unwrap().range, Range::LastYear);
    }

    #[test]
    fn stale_completion_does_not_clobber_loading() {
        let view = ViewController::new();
        let week = view.begin(Selection::combined(Range::Last7Days));
        let _year = view.begin(Selection::combined(Range::LastYear));

        assert!(!view.complete(week, Ok(7u64)));
        assert!(view.current().is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_for_old_range_loses_the_race() {
        let view = Arc::new(ViewController::new());

        let slow = {
            let view = Arc::clone(&view);
            tokio::spawn(async move {
                view.load(Selection::combined(Range::Last7Days), async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok("7d")
                })
                .await
            })
        };
        // Let the slow request register before the user switches range.
        tokio::task::yield_now().await;

        let fast = view
            .load(Selection::combined(Range::LastYear), async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok("1y")
            })
            .await;

        assert!(fast);
        assert!(!slow.await.unwrap());

        let state = view.current();
        assert_eq!(state.data().map(|d| **d), Some("1y"));
    }

    #[tokio::test]
    async fn subscribers_see_transitions() {
        let view = ViewController::new();
        let mut rx = view.subscribe();

        let token = view.begin(Selection::combined(Range::AllTime));
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_loading());

        view.complete(token, Ok(1u8));
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().data().is_some());
    }
}
