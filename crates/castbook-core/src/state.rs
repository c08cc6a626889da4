//! Table state machine.
//!
//! Follows the Elm Architecture: `State + Message → (State, Command)`.
//! Every input (dataset arrival, keystroke, click, resize, timer) is a
//! [`Message`]; [`TableState::update`] mutates the state and returns the
//! side effects the runtime must perform as a [`Command`].
//!
//! # Examples
//!
//! ```
//! use castbook_core::{Command, Dataset, Message, State, TableConfig, TableState};
//!
//! let mut state = TableState::new(TableConfig::default(), "");
//! assert!(matches!(state.init(), Command::LoadDataset { .. }));
//!
//! state.update(Message::DatasetLoaded(Dataset::empty()));
//! state.update(Message::Revealed);
//! assert!(state.is_ready());
//! assert_eq!(state.total_pages(), 0);
//! ```

use crate::config::TableConfig;
use crate::dataset::Dataset;
use crate::derive::Query;
use crate::memo::DerivationCache;
use crate::model::Actor;
use crate::page::Pagination;
use crate::sort::{SortKey, SortSpec};
use crate::timer::{Debouncer, TimerSlot};
use crate::viewport::{LayoutHints, Viewport, ViewportClassifier, ViewportMonitor};
use std::sync::Arc;
use std::time::Duration;

/// Elm-style state: messages in, commands out.
pub trait State {
    /// Message type for state updates
    type Message;

    /// Update state in response to a message.
    ///
    /// Returns a command describing side effects to run afterwards.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;
}

/// Side effects requested by a state update.
#[derive(Debug, Default)]
pub enum Command<M> {
    /// No command
    #[default]
    None,
    /// Execute multiple commands in order
    Batch(Vec<Command<M>>),
    /// Deliver `message` after `delay`, superseding any timer in `slot`
    Schedule {
        /// Timer slot
        slot: TimerSlot,
        /// Delay before delivery
        delay: Duration,
        /// Message to deliver
        message: M,
    },
    /// Cancel the timer in a slot
    Cancel(TimerSlot),
    /// Fetch both dataset documents and deliver the joined result
    LoadDataset {
        /// Actors document location
        actors_url: String,
        /// Movies document location
        movies_url: String,
    },
}

impl<M> Command<M> {
    /// Create a batch of commands, dropping empty ones.
    pub fn batch(commands: impl IntoIterator<Item = Self>) -> Self {
        let commands: Vec<Self> = commands.into_iter().filter(|c| !c.is_none()).collect();
        if commands.is_empty() {
            Self::None
        } else {
            Self::Batch(commands)
        }
    }

    /// Check if this is the none command.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Whether the table is waiting for data or showing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Dataset not yet revealed; the surface shows skeleton rows
    #[default]
    Loading,
    /// Table visible
    Ready,
}

/// Messages for [`TableState`].
#[derive(Debug, Clone)]
pub enum Message {
    /// Both documents arrived and validated
    DatasetLoaded(Dataset),
    /// Fetching or decoding failed
    DatasetFailed(String),
    /// Reveal delay elapsed
    Revealed,
    /// Raw keystroke in the search box
    SearchInput(String),
    /// Search debounce timer fired
    SearchSettled(u64),
    /// Filter by a movie title
    SelectMovie(String),
    /// Remove the movie filter
    ClearMovie,
    /// Header for a sort key activated
    ToggleSort(SortKey),
    /// Jump to a page
    GoToPage(usize),
    /// Next page
    NextPage,
    /// Previous page
    PrevPage,
    /// Initial window width at mount
    Measured(u32),
    /// Window resized
    Resized(u32),
    /// Resize debounce timer fired
    ResizeSettled(u64),
    /// Unmount: cancel timers, ignore anything afterwards
    Teardown,
}

/// All UI state behind the actor table.
#[derive(Debug)]
pub struct TableState {
    config: TableConfig,
    phase: Phase,
    dataset: Option<Dataset>,
    selected_movie: Option<String>,
    search: Debouncer<String>,
    sort: SortSpec,
    pagination: Pagination,
    viewport: ViewportMonitor,
    cache: DerivationCache,
    rows: Arc<[usize]>,
    torn_down: bool,
}

impl TableState {
    /// Create state for a page load with the given browser user agent.
    #[must_use]
    pub fn new(config: TableConfig, user_agent: &str) -> Self {
        let classifier = ViewportClassifier::new(config.breakpoints, user_agent);
        Self {
            phase: Phase::Loading,
            dataset: None,
            selected_movie: None,
            search: Debouncer::new(String::new(), config.search_debounce()),
            sort: config.default_sort,
            pagination: Pagination::new(config.page_size, 0),
            viewport: ViewportMonitor::new(classifier, config.resize_debounce()),
            cache: DerivationCache::new(),
            rows: Arc::from(Vec::new()),
            torn_down: false,
            config,
        }
    }

    /// Command to run at mount.
    #[must_use]
    pub fn init(&self) -> Command<Message> {
        Command::LoadDataset {
            actors_url: self.config.actors_url.clone(),
            movies_url: self.config.movies_url.clone(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the table is visible.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.phase, Phase::Ready)
    }

    /// Whether teardown has run.
    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Loaded dataset, if any.
    #[must_use]
    pub const fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Selected movie title.
    #[must_use]
    pub fn selected_movie(&self) -> Option<&str> {
        self.selected_movie.as_deref()
    }

    /// Search text as typed.
    #[must_use]
    pub fn search_text(&self) -> &str {
        self.search.raw()
    }

    /// Search text the derivation uses.
    #[must_use]
    pub fn settled_search(&self) -> &str {
        self.search.settled()
    }

    /// Active sort.
    #[must_use]
    pub const fn sort(&self) -> SortSpec {
        self.sort
    }

    /// Pagination over the displayed list.
    #[must_use]
    pub const fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Current page (1-based).
    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.pagination.page()
    }

    /// Page count; zero when nothing is displayed.
    #[must_use]
    pub const fn total_pages(&self) -> usize {
        self.pagination.total_pages()
    }

    /// Latest viewport snapshot.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport.current()
    }

    /// Viewport subscription point.
    pub fn viewport_monitor(&mut self) -> &mut ViewportMonitor {
        &mut self.viewport
    }

    /// Layout decisions for the current viewport.
    #[must_use]
    pub const fn layout(&self) -> LayoutHints {
        LayoutHints::for_viewport(&self.viewport.current(), self.config.cameo_min_width)
    }

    /// Inputs of the derivation as they stand.
    #[must_use]
    pub fn query(&self) -> Query {
        Query {
            selected_movie: self.selected_movie.clone(),
            search: self.search.settled().clone(),
            sort: self.sort,
        }
    }

    /// Number of actors in the full displayed list.
    #[must_use]
    pub fn displayed_len(&self) -> usize {
        self.rows.len()
    }

    /// Actors on the current page.
    #[must_use]
    pub fn page_rows(&self) -> Vec<&Actor> {
        let Some(dataset) = &self.dataset else {
            return Vec::new();
        };
        self.pagination
            .slice(&self.rows[..])
            .iter()
            .filter_map(|&i| dataset.actors().get(i))
            .collect()
    }

    /// Derivation cache statistics as `(hits, misses)`.
    #[must_use]
    pub const fn cache_stats(&self) -> (u64, u64) {
        (self.cache.hits(), self.cache.misses())
    }

    fn refresh(&mut self) {
        let query = self.query();
        if let Some(dataset) = &self.dataset {
            self.rows = self.cache.get(dataset, &query);
        }
        self.pagination.set_total_items(self.rows.len());
    }

    fn inputs_changed(&mut self) {
        self.pagination.reset();
        self.refresh();
    }

    fn load(&mut self, dataset: Dataset) -> Command<Message> {
        tracing::info!(
            actors = dataset.actors().len(),
            movies = dataset.movies().len(),
            "dataset loaded"
        );
        for problem in dataset.inconsistencies() {
            tracing::warn!(%problem, "dataset inconsistency");
        }
        self.dataset = Some(dataset);
        self.cache.invalidate();
        self.inputs_changed();

        if self.is_ready() {
            return Command::None;
        }
        Command::Schedule {
            slot: TimerSlot::Reveal,
            delay: self.config.reveal_delay(),
            message: Message::Revealed,
        }
    }

    fn teardown(&mut self) -> Command<Message> {
        self.torn_down = true;
        self.search.cancel();
        self.viewport.teardown();
        Command::batch([
            Command::Cancel(TimerSlot::Search),
            Command::Cancel(TimerSlot::Resize),
            Command::Cancel(TimerSlot::Reveal),
        ])
    }
}

impl State for TableState {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        if self.torn_down {
            tracing::trace!(?msg, "message after teardown ignored");
            return Command::None;
        }

        match msg {
            Message::DatasetLoaded(dataset) => return self.load(dataset),
            Message::DatasetFailed(reason) => {
                tracing::warn!(%reason, "dataset failed to load");
            }
            Message::Revealed => {
                if self.dataset.is_some() {
                    self.phase = Phase::Ready;
                }
            }
            Message::SearchInput(text) => {
                let generation = self.search.input(text);
                return Command::Schedule {
                    slot: TimerSlot::Search,
                    delay: self.search.quiet(),
                    message: Message::SearchSettled(generation),
                };
            }
            Message::SearchSettled(generation) => {
                if self.search.settle(generation) {
                    self.inputs_changed();
                }
            }
            Message::SelectMovie(title) => {
                if self.selected_movie.as_deref() != Some(title.as_str()) {
                    self.selected_movie = Some(title);
                    self.inputs_changed();
                }
            }
            Message::ClearMovie => {
                if self.selected_movie.take().is_some() {
                    self.inputs_changed();
                }
            }
            Message::ToggleSort(key) => {
                self.sort = self.sort.toggled(key);
                self.inputs_changed();
            }
            Message::GoToPage(page) => {
                self.pagination.go_to(page);
            }
            Message::NextPage => {
                self.pagination.next();
            }
            Message::PrevPage => {
                self.pagination.prev();
            }
            Message::Measured(width) => {
                self.viewport.measure(width);
            }
            Message::Resized(width) => {
                let generation = self.viewport.resized(width);
                return Command::Schedule {
                    slot: TimerSlot::Resize,
                    delay: self.viewport.quiet(),
                    message: Message::ResizeSettled(generation),
                };
            }
            Message::ResizeSettled(generation) => {
                if let Some(snapshot) = self.viewport.settle(generation) {
                    tracing::debug!(class = %snapshot.class, width = snapshot.width, "viewport changed");
                }
            }
            Message::Teardown => return self.teardown(),
        }
        Command::None
    }
}
