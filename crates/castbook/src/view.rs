//! View model for the actor table.
//!
//! [`TableView::build`] is a pure function of [`TableState`]; renderers
//! (HTML here, text in the CLI) only read the result.

use crate::avatar::Portrait;
use castbook_core::{
    Actor, ActorId, Dataset, LayoutHints, Message, SortKey, SortSpec, TableState,
};
use serde::Serialize;

/// Page heading.
pub const TITLE: &str = "Pastel Actors: The Wes Anderson Cast Database";

/// Search box placeholder.
pub const SEARCH_PLACEHOLDER: &str = "Search actors or movies...";

/// Movie columns drawn while loading.
pub const SKELETON_COLUMNS: usize = 11;

/// Heading of the empty-result notice.
pub const NO_RESULTS_TITLE: &str = "No actors in sight. Maybe they're having tea?";

/// Hint under the empty-result notice.
pub const NO_RESULTS_HINT: &str = "Try adjusting your search, dear.";

/// A sortable column header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortHeader {
    /// Sort key toggled by this header
    pub key: SortKey,
    /// Column label
    pub label: &'static str,
    /// "▲", "▼" or empty
    pub indicator: &'static str,
}

impl SortHeader {
    fn new(key: SortKey, sort: &SortSpec) -> Self {
        let label = match key {
            SortKey::Name => "Actor",
            SortKey::Movies => "Total Movies",
        };
        Self {
            key,
            label,
            indicator: sort.indicator_for(key),
        }
    }

    /// Label followed by the indicator, if any.
    #[must_use]
    pub fn text(&self) -> String {
        if self.indicator.is_empty() {
            self.label.to_string()
        } else {
            format!("{} {}", self.label, self.indicator)
        }
    }
}

/// One movie column header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieHeader {
    /// Title (click target for the filter)
    pub title: String,
    /// Year caption
    pub year: Option<i32>,
    /// Poster URI
    pub poster: Option<String>,
    /// "Title (year)"
    pub tooltip: String,
    /// Whether this movie is the active filter
    pub selected: bool,
}

/// One actor × movie cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieCell {
    /// Whether the actor is in the movie's cast
    pub appeared: bool,
    /// "Name in Title (year)" when appeared
    pub tooltip: Option<String>,
    /// Character name when known
    pub character: Option<String>,
}

/// One actor row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorRow {
    /// Actor id
    pub id: ActorId,
    /// Display name
    pub name: String,
    /// Portrait or placeholder
    pub portrait: Portrait,
    /// Appearance count badge
    pub total_movies: usize,
    /// Cells parallel to the movie headers
    pub cells: Vec<MovieCell>,
}

/// Filter banner above the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "title", rename_all = "lowercase")]
pub enum Banner {
    /// No movie filter
    All,
    /// Filtering by a movie title
    Filtering(String),
}

impl Banner {
    /// Banner text.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::All => "Showing all actors".to_string(),
            Self::Filtering(title) => format!("Filtering actors by: {title}"),
        }
    }

    /// Whether the "Clear Filter" control is shown.
    #[must_use]
    pub const fn shows_clear(&self) -> bool {
        matches!(self, Self::Filtering(_))
    }
}

/// Pagination controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationBar {
    /// Current page
    pub current: usize,
    /// Page count
    pub total: usize,
    /// "Previous" enabled
    pub prev_enabled: bool,
    /// "Next" enabled
    pub next_enabled: bool,
}

impl PaginationBar {
    /// "Page x of y".
    #[must_use]
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current, self.total)
    }
}

/// Table body contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Body {
    /// Placeholder rows while loading
    Skeleton {
        /// Movie columns
        columns: usize,
        /// Rows
        rows: usize,
    },
    /// The current page
    Rows {
        /// Actor rows
        rows: Vec<ActorRow>,
    },
    /// Nothing matched
    Empty,
}

/// Everything the surface needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    /// Viewport-driven layout
    pub layout: LayoutHints,
    /// Search text as typed
    pub search: String,
    /// Filter banner
    pub banner: Banner,
    /// "Actor" and "Total Movies" headers
    pub sort_headers: [SortHeader; 2],
    /// Movie headers; empty while loading
    pub movies: Vec<MovieHeader>,
    /// Body
    pub body: Body,
    /// Pagination bar; `None` when hidden
    pub pagination: Option<PaginationBar>,
}

impl TableView {
    /// Build the view for the current state.
    #[must_use]
    pub fn build(state: &TableState) -> Self {
        let sort = state.sort();
        let selected = state.selected_movie();
        let banner = selected.map_or(Banner::All, |title| Banner::Filtering(title.to_string()));
        let sort_headers = [
            SortHeader::new(SortKey::Name, &sort),
            SortHeader::new(SortKey::Movies, &sort),
        ];

        let mut view = Self {
            layout: state.layout(),
            search: state.search_text().to_string(),
            banner,
            sort_headers,
            movies: Vec::new(),
            body: Body::Skeleton {
                columns: SKELETON_COLUMNS,
                rows: state.pagination().page_size(),
            },
            pagination: None,
        };

        let Some(dataset) = state.dataset().filter(|_| state.is_ready()) else {
            return view;
        };

        view.movies = dataset
            .movies()
            .iter()
            .map(|m| MovieHeader {
                title: m.title.clone(),
                year: m.year,
                poster: m.poster.clone(),
                tooltip: m.label(),
                selected: selected == Some(m.title.as_str()),
            })
            .collect();

        let page = state.page_rows();
        if page.is_empty() {
            view.body = Body::Empty;
            return view;
        }

        view.body = Body::Rows {
            rows: page.iter().map(|actor| actor_row(dataset, actor)).collect(),
        };
        let pagination = state.pagination();
        view.pagination = Some(PaginationBar {
            current: pagination.page(),
            total: pagination.total_pages(),
            prev_enabled: pagination.has_prev(),
            next_enabled: pagination.has_next(),
        });
        view
    }

    /// Whether the table is still loading.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.body, Body::Skeleton { .. })
    }

    /// Rows on the current page (empty while loading).
    #[must_use]
    pub fn rows(&self) -> &[ActorRow] {
        match &self.body {
            Body::Rows { rows } => rows,
            Body::Skeleton { .. } | Body::Empty => &[],
        }
    }
}

/// Page regions that need drawing after a message.
///
/// Raw keystrokes and raw resizes never reach the derivation or the
/// layout, so they redraw nothing. The masthead only depends on the
/// layout, which changes when a viewport snapshot is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Redraw {
    /// Portrait, title and cameo
    pub masthead: bool,
    /// Banner, table and pagination
    pub table: bool,
}

impl Redraw {
    /// Nothing to draw.
    pub const NONE: Self = Self {
        masthead: false,
        table: false,
    };

    /// Both regions.
    pub const ALL: Self = Self {
        masthead: true,
        table: true,
    };

    /// Regions to draw after `msg`; `layout_changed` is set when a viewport
    /// snapshot was published while handling it.
    #[must_use]
    pub const fn after(msg: &Message, layout_changed: bool) -> Self {
        let table = !matches!(
            msg,
            Message::SearchInput(_)
                | Message::Measured(_)
                | Message::Resized(_)
                | Message::ResizeSettled(_)
                | Message::Teardown
        );
        Self {
            masthead: layout_changed,
            table,
        }
    }

    /// Whether anything needs drawing.
    #[must_use]
    pub const fn any(self) -> bool {
        self.masthead || self.table
    }
}

fn actor_row(dataset: &Dataset, actor: &Actor) -> ActorRow {
    let cells = dataset
        .movies()
        .iter()
        .enumerate()
        .map(|(index, movie)| {
            if dataset.in_cast(index, actor.id) {
                MovieCell {
                    appeared: true,
                    tooltip: Some(format!("{} in {}", actor.name, movie.label())),
                    character: movie
                        .cast_member(actor.id)
                        .and_then(|member| member.character.clone()),
                }
            } else {
                MovieCell {
                    appeared: false,
                    tooltip: None,
                    character: None,
                }
            }
        })
        .collect();

    ActorRow {
        id: actor.id,
        name: actor.name.clone(),
        portrait: Portrait::for_actor(actor),
        total_movies: actor.total_movies(),
        cells,
    }
}
