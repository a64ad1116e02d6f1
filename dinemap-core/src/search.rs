//! Debounced place autocomplete.
//!
//! Each keystroke aborts the pending debounce timer and schedules a new one,
//! so only the last query typed within the idle window reaches the places
//! provider. Once a timer fires, the request runs as its own task and is no
//! longer cancelled by typing; instead its response is tagged with the
//! query's [`Generation`] and discarded on arrival if a newer query exists.
//!
//! Scheduling uses `tokio::spawn`, so [`Autocomplete::set_query`] must be
//! called from within a Tokio runtime.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::{Coordinate, Generation, PlacesProvider, SearchConfig, Suggestion};

#[derive(Debug, Default)]
struct SearchState {
    query: String,
    latest: Generation,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<SearchState>,
    suggestions: watch::Sender<Vec<Suggestion>>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, generation: Generation, suggestions: Vec<Suggestion>) {
        let state = self.lock();
        if state.latest != generation {
            debug!(
                "discarding suggestions for query {generation}; latest is {}",
                state.latest
            );
            return;
        }
        self.suggestions.send_replace(suggestions);
    }
}

/// Text query to suggestion pipeline.
pub struct Autocomplete {
    places: Arc<dyn PlacesProvider>,
    config: SearchConfig,
    shared: Arc<Shared>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for Autocomplete {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Autocomplete")
            .field("places", &"<dyn PlacesProvider>")
            .field("config", &self.config)
            .field("shared", &self.shared)
            .finish_non_exhaustive()
    }
}

impl Autocomplete {
    /// Create an idle pipeline with an empty query.
    #[must_use]
    pub fn new(places: Arc<dyn PlacesProvider>, config: SearchConfig) -> Self {
        let (suggestions, _) = watch::channel(Vec::new());
        Self {
            places,
            config,
            shared: Arc::new(Shared {
                state: Mutex::new(SearchState::default()),
                suggestions,
            }),
            timer: Mutex::new(None),
        }
    }

    fn cancel_timer(&self) {
        let pending = self
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = pending {
            handle.abort();
        }
    }

    /// Start a new query generation and clear suggestions, returning it.
    fn supersede(&self, query: &str) -> Generation {
        let mut state = self.shared.lock();
        state.query = query.to_owned();
        state.latest = state.latest.next();
        state.latest
    }

    /// Record a keystroke.
    ///
    /// Queries shorter than the configured minimum clear the suggestions
    /// immediately and schedule nothing.
    pub fn set_query(&self, text: &str, bias: Option<Coordinate>) {
        self.cancel_timer();
        let generation = self.supersede(text);
        let query = text.trim().to_owned();
        if query.chars().count() < self.config.min_query_len {
            self.shared.suggestions.send_replace(Vec::new());
            return;
        }

        let places = Arc::clone(&self.places);
        let shared = Arc::clone(&self.shared);
        let debounce = self.config.debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            tokio::spawn(fetch(places, shared, query, bias, generation));
        });
        *self.timer.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }

    /// Drop the query, any pending timer, and the suggestions.
    pub fn clear(&self) {
        self.cancel_timer();
        self.supersede("");
        self.shared.suggestions.send_replace(Vec::new());
    }

    /// Resolve `suggestion` to a coordinate, clearing query and suggestions.
    ///
    /// A failed lookup is logged and yields `None`.
    pub async fn select(&self, suggestion: &Suggestion) -> Option<Coordinate> {
        self.clear();
        match self.places.place_detail(&suggestion.place_id).await {
            Ok(coordinate) => Some(coordinate),
            Err(err) => {
                warn!("place detail for {} failed: {err}", suggestion.place_id);
                None
            }
        }
    }

    /// Current query text as typed.
    #[must_use]
    pub fn query(&self) -> String {
        self.shared.lock().query.clone()
    }

    /// Current suggestions.
    #[must_use]
    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.shared.suggestions.borrow().clone()
    }

    /// Observe suggestion list replacements.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Suggestion>> {
        self.shared.suggestions.subscribe()
    }
}

impl Drop for Autocomplete {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

async fn fetch(
    places: Arc<dyn PlacesProvider>,
    shared: Arc<Shared>,
    query: String,
    bias: Option<Coordinate>,
    generation: Generation,
) {
    debug!("autocomplete {generation} for {query:?}");
    let suggestions = match places.autocomplete(&query, bias).await {
        Ok(suggestions) => suggestions,
        Err(err) => {
            warn!("autocomplete for {query:?} failed: {err}");
            Vec::new()
        }
    };
    shared.publish(generation, suggestions);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use rstest::{fixture, rstest};

    use crate::test_support::ScriptedPlaces;
    use crate::PlacesError;

    fn suggestion(id: &str) -> Suggestion {
        Suggestion::new(id, format!("Place {id}"))
    }

    fn pipeline(places: &Arc<ScriptedPlaces>) -> Autocomplete {
        Autocomplete::new(
            Arc::clone(places) as Arc<dyn PlacesProvider>,
            SearchConfig::default(),
        )
    }

    #[fixture]
    fn places() -> Arc<ScriptedPlaces> {
        Arc::new(
            ScriptedPlaces::new()
                .with_suggestions("pho", vec![suggestion("p1")])
                .with_suggestions("pho bo", vec![suggestion("p2"), suggestion("p3")]),
        )
    }

    async fn idle(millis: u64) {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn short_queries_never_reach_the_provider(places: Arc<ScriptedPlaces>) {
        let search = pipeline(&places);

        search.set_query("ph", None);
        idle(1_000).await;

        assert!(places.queries().is_empty());
        assert!(search.suggestions().is_empty());
        assert_eq!(search.query(), "ph");
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn only_the_last_query_in_the_window_is_sent(places: Arc<ScriptedPlaces>) {
        let search = pipeline(&places);

        search.set_query("pho", None);
        idle(100).await;
        search.set_query("pho bo", None);
        idle(1_000).await;

        let sent: Vec<String> = places.queries().into_iter().map(|(q, _)| q).collect();
        assert_eq!(sent, vec!["pho bo".to_owned()]);
        assert_eq!(search.suggestions().len(), 2);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn superseded_response_is_discarded() {
        let places = Arc::new(
            ScriptedPlaces::new()
                .with_delayed_suggestions("pho", vec![suggestion("late")], Duration::from_millis(500))
                .with_suggestions("pho bo", vec![suggestion("fresh")]),
        );
        let search = pipeline(&places);

        search.set_query("pho", None);
        idle(400).await;
        search.set_query("pho bo", None);
        idle(2_000).await;

        assert_eq!(places.queries().len(), 2);
        assert_eq!(search.suggestions(), vec![suggestion("fresh")]);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn shortening_the_query_clears_suggestions(places: Arc<ScriptedPlaces>) {
        let search = pipeline(&places);
        search.set_query("pho", None);
        idle(1_000).await;
        assert_eq!(search.suggestions().len(), 1);

        search.set_query("p", None);

        assert!(search.suggestions().is_empty());
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn failures_reset_suggestions() {
        let places = Arc::new(
            ScriptedPlaces::new()
                .with_suggestions("pho", vec![suggestion("p1")])
                .with_autocomplete_failure(
                    "phoenix",
                    PlacesError::ParseError {
                        message: "truncated body".to_owned(),
                    },
                ),
        );
        let search = pipeline(&places);
        search.set_query("pho", None);
        idle(1_000).await;

        search.set_query("phoenix", None);
        idle(1_000).await;

        assert!(search.suggestions().is_empty());
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn bias_is_forwarded(places: Arc<ScriptedPlaces>) {
        let search = pipeline(&places);
        let here = Coordinate::new(10.0, 106.0).expect("valid");

        search.set_query("pho", Some(here));
        idle(1_000).await;

        assert_eq!(places.queries(), vec![("pho".to_owned(), Some(here))]);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn selecting_clears_query_and_suggestions() {
        let target = Coordinate::new(10.77, 106.7).expect("valid");
        let places = Arc::new(
            ScriptedPlaces::new()
                .with_suggestions("pho", vec![suggestion("p1")])
                .with_detail("p1", target),
        );
        let search = pipeline(&places);
        search.set_query("pho", None);
        idle(1_000).await;

        let resolved = search.select(&suggestion("p1")).await;

        assert_eq!(resolved, Some(target));
        assert!(search.suggestions().is_empty());
        assert!(search.query().is_empty());
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn failed_selection_yields_none(places: Arc<ScriptedPlaces>) {
        let search = pipeline(&places);

        let resolved = search.select(&suggestion("missing")).await;

        assert!(resolved.is_none());
        assert!(search.suggestions().is_empty());
    }
}
