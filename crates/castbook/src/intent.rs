//! Intents the surface sends back to the state.
//!
//! Rendered controls carry an action name and an optional value as
//! `data-action` / `data-value` attributes; [`Intent::from_action`] turns a
//! clicked control back into an intent.

use castbook_core::{Message, SortKey};

/// A user intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Search text changed
    Search(String),
    /// Filter by a movie
    SelectMovie(String),
    /// Remove the movie filter
    ClearMovie,
    /// Sort header activated
    ToggleSort(SortKey),
    /// Previous page
    PrevPage,
    /// Next page
    NextPage,
    /// Jump to a page
    GoToPage(usize),
}

/// Attribute values for [`SortKey`].
#[must_use]
pub const fn sort_key_name(key: SortKey) -> &'static str {
    match key {
        SortKey::Name => "name",
        SortKey::Movies => "movies",
    }
}

impl Intent {
    /// Action name carried by the control.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Search(_) => "search",
            Self::SelectMovie(_) => "select-movie",
            Self::ClearMovie => "clear-movie",
            Self::ToggleSort(_) => "sort",
            Self::PrevPage => "prev-page",
            Self::NextPage => "next-page",
            Self::GoToPage(_) => "go-to-page",
        }
    }

    /// Value carried by the control, if any.
    #[must_use]
    pub fn value(&self) -> Option<String> {
        match self {
            Self::Search(text) | Self::SelectMovie(text) => Some(text.clone()),
            Self::ToggleSort(key) => Some(sort_key_name(*key).to_string()),
            Self::GoToPage(page) => Some(page.to_string()),
            Self::ClearMovie | Self::PrevPage | Self::NextPage => None,
        }
    }

    /// Parse an action/value pair; unknown or malformed pairs yield `None`.
    #[must_use]
    pub fn from_action(action: &str, value: Option<&str>) -> Option<Self> {
        let intent = match action {
            "search" => Self::Search(value.unwrap_or_default().to_string()),
            "select-movie" => Self::SelectMovie(value?.to_string()),
            "clear-movie" => Self::ClearMovie,
            "sort" => Self::ToggleSort(match value? {
                "name" => SortKey::Name,
                "movies" => SortKey::Movies,
                _ => return None,
            }),
            "prev-page" => Self::PrevPage,
            "next-page" => Self::NextPage,
            "go-to-page" => Self::GoToPage(value?.trim().parse().ok()?),
            _ => return None,
        };
        Some(intent)
    }
}

impl From<Intent> for Message {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::Search(text) => Self::SearchInput(text),
            Intent::SelectMovie(title) => Self::SelectMovie(title),
            Intent::ClearMovie => Self::ClearMovie,
            Intent::ToggleSort(key) => Self::ToggleSort(key),
            Intent::PrevPage => Self::PrevPage,
            Intent::NextPage => Self::NextPage,
            Intent::GoToPage(page) => Self::GoToPage(page),
        }
    }
}
