//! Searchable location selector
//!
//! A [`LocationSelector`] turns keystrokes into debounced forward-geocoding
//! requests and exposes the result list as an observable [`SelectorView`].
//!
//! ## State machine
//! - `Idle`: query shorter than the minimum length, no results
//! - `Debouncing`: keystroke received, timer pending
//! - `Searching`: request in flight
//! - `Results`: list populated (possibly empty)
//! - `Closed`: a result was selected or the search was dismissed
//!
//! Every keystroke bumps a per-instance generation counter. A finished
//! request only commits if its generation is still current, so a slow
//! response for an older query can never replace results for a newer one.
//! Search failures are logged and shown as an empty list; they are never
//! returned to the caller.

pub mod task;

use crate::config::SearchConfig;
use crate::coord::Coordinates;
use crate::geo::{to_search_options, GeoBackend, SearchOption};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use task::SearchTask;
use tokio::sync::watch;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Placeholder shown when the caller does not provide one
pub const DEFAULT_PLACEHOLDER: &str = "Search for a location...";

/// Message shown when a search completes with no matches
pub const NO_RESULTS_MESSAGE: &str = "No locations found";

/// Selector lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchState {
    Idle,
    Debouncing,
    Searching,
    Results,
    Closed,
}

/// Observable snapshot of a selector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectorView {
    pub query: String,
    pub results: Vec<SearchOption>,
    pub state: SearchState,
    /// Incremented on every query change, selection and dismissal
    pub generation: u64,
}

impl SelectorView {
    fn new() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            state: SearchState::Idle,
            generation: 0,
        }
    }

    pub fn is_searching(&self) -> bool {
        self.state == SearchState::Searching
    }

    pub fn is_open(&self) -> bool {
        self.state != SearchState::Closed
    }

    /// Empty-state message, if one should be displayed
    pub fn empty_message(&self) -> Option<&'static str> {
        (self.state == SearchState::Results && self.results.is_empty())
            .then_some(NO_RESULTS_MESSAGE)
    }
}

/// Timing and cancellation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub min_query_len: usize,
    /// Abort a superseded request that is already in flight
    pub cancel_in_flight: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
            min_query_len: config.min_query_len,
            cancel_in_flight: config.cancel_in_flight,
        }
    }
}

type ValueCallback = Box<dyn FnMut(&str) + Send>;
type CoordinatesCallback = Box<dyn FnMut(Coordinates) + Send>;

/// Debounced location search bound to one input field
///
/// All state is owned by the instance, so any number of selectors can run
/// side by side against the same backend.
pub struct LocationSelector<B> {
    id: Uuid,
    backend: Arc<B>,
    settings: SearchSettings,
    value: String,
    placeholder: String,
    disabled: bool,
    view: Arc<watch::Sender<SelectorView>>,
    pending: Option<SearchTask>,
    on_value_change: ValueCallback,
    on_coordinates_change: Option<CoordinatesCallback>,
}

impl<B: GeoBackend + 'static> LocationSelector<B> {
    /// Create a selector that reports selections through `on_value_change`
    pub fn new<F>(backend: Arc<B>, settings: SearchSettings, on_value_change: F) -> Self
    where
        F: FnMut(&str) + Send + 'static,
    {
        let (view, _) = watch::channel(SelectorView::new());

        Self {
            id: Uuid::new_v4(),
            backend,
            settings,
            value: String::new(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            disabled: false,
            view: Arc::new(view),
            pending: None,
            on_value_change: Box::new(on_value_change),
            on_coordinates_change: None,
        }
    }

    /// Also report the coordinates of each selection
    pub fn on_coordinates_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(Coordinates) + Send + 'static,
    {
        self.on_coordinates_change = Some(Box::new(callback));
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current controlled value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Update the controlled value from the parent
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Enable or disable input; disabling closes any open search
    pub fn set_disabled(&mut self, disabled: bool) {
        if disabled && !self.disabled {
            self.close();
        }
        self.disabled = disabled;
    }

    /// Observe state changes
    pub fn subscribe(&self) -> watch::Receiver<SelectorView> {
        self.view.subscribe()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> SelectorView {
        self.view.borrow().clone()
    }

    /// Handle a keystroke: the query text is now `query`
    pub fn set_query(&mut self, query: impl Into<String>) {
        if self.disabled {
            debug!(selector = %self.id, "Ignoring input while disabled");
            return;
        }

        let query = query.into();
        let searchable = query.trim().chars().count() >= self.settings.min_query_len;

        if let Some(task) = self.pending.take() {
            task.cancel(self.settings.cancel_in_flight);
        }

        let mut generation = 0;
        self.view.send_modify(|view| {
            view.generation += 1;
            generation = view.generation;
            view.query = query.clone();
            if searchable {
                view.state = SearchState::Debouncing;
            } else {
                view.results.clear();
                view.state = SearchState::Idle;
            }
        });

        if !searchable {
            return;
        }

        debug!(selector = %self.id, generation, query = %query, "Debouncing search");
        self.pending = Some(self.spawn_search(generation, query.trim().to_string()));
    }

    fn spawn_search(&self, generation: u64, query: String) -> SearchTask {
        let backend = Arc::clone(&self.backend);
        let view = Arc::clone(&self.view);
        let debounce = self.settings.debounce;
        let id = self.id;

        SearchTask::spawn(generation, move |flag| async move {
            tokio::time::sleep(debounce).await;

            if !mark_searching(&view, generation) {
                return;
            }
            flag.mark_started();
            info!(selector = %id, generation, query = %query, "Searching locations");

            let options = match backend.search(&query).await {
                Ok(results) => to_search_options(&results),
                Err(e) => {
                    error!(selector = %id, query = %query, "Location search failed: {}", e);
                    Vec::new()
                }
            };

            commit_results(&view, generation, options);
        })
    }

    /// Select the result at `index` in the current list
    ///
    /// Returns the selected option, or None if the index is out of range or
    /// the selector is disabled.
    pub fn select(&mut self, index: usize) -> Option<SearchOption> {
        if self.disabled {
            return None;
        }

        let option = self.view.borrow().results.get(index).cloned()?;
        self.apply_selection(&option);
        Some(option)
    }

    fn apply_selection(&mut self, option: &SearchOption) {
        self.close();
        info!(selector = %self.id, label = %option.label, "Location selected");

        self.value = option.label.clone();
        (self.on_value_change)(&option.label);
        if let Some(callback) = self.on_coordinates_change.as_mut() {
            callback(option.coordinates);
        }
    }

    /// Close the search without selecting anything
    pub fn dismiss(&mut self) {
        debug!(selector = %self.id, "Search dismissed");
        self.close();
    }

    fn close(&mut self) {
        if let Some(task) = self.pending.take() {
            task.cancel(true);
        }

        self.view.send_modify(|view| {
            view.generation += 1;
            view.query.clear();
            view.results.clear();
            view.state = SearchState::Closed;
        });
    }
}

impl<B> Drop for LocationSelector<B> {
    fn drop(&mut self) {
        if let Some(task) = self.pending.take() {
            task.cancel(true);
        }
    }
}

/// Move to `Searching` if `generation` is still current
fn mark_searching(view: &watch::Sender<SelectorView>, generation: u64) -> bool {
    view.send_if_modified(|current| {
        if current.generation != generation {
            return false;
        }
        current.state = SearchState::Searching;
        true
    })
}

/// Publish results if `generation` is still current
///
/// Returns false when the results were discarded as stale.
fn commit_results(
    view: &watch::Sender<SelectorView>,
    generation: u64,
    options: Vec<SearchOption>,
) -> bool {
    view.send_if_modified(|current| {
        if current.generation != generation {
            debug!(
                generation,
                current = current.generation,
                "Discarding stale search results"
            );
            return false;
        }
        current.results = options;
        current.state = SearchState::Results;
        true
    })
}
