//! Sort specification and the three-state header toggle.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Column a table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Actor name, locale-aware
    Name,
    /// Number of appearances
    Movies,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    /// Smallest first (A→Z, fewest movies first)
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    /// Largest first
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// Header indicator for this direction.
    #[must_use]
    pub const fn indicator(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }

    /// Apply this direction to an ascending comparison.
    #[must_use]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Active sort: at most one key, plus a direction.
///
/// With `key == None` the list keeps its filtered order; the direction is
/// retained but has no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SortSpec {
    /// Active key, if any
    #[serde(default)]
    pub key: Option<SortKey>,
    /// Direction for the active key
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    /// No active sort.
    pub const UNSORTED: Self = Self {
        key: None,
        direction: SortDirection::Ascending,
    };

    /// Sort by `key` ascending.
    #[must_use]
    pub const fn ascending(key: SortKey) -> Self {
        Self {
            key: Some(key),
            direction: SortDirection::Ascending,
        }
    }

    /// Sort by `key` descending.
    #[must_use]
    pub const fn descending(key: SortKey) -> Self {
        Self {
            key: Some(key),
            direction: SortDirection::Descending,
        }
    }

    /// Whether no key is active.
    #[must_use]
    pub const fn is_unsorted(&self) -> bool {
        self.key.is_none()
    }

    /// Next state after activating the header for `key`.
    ///
    /// Same key cycles asc → desc → unsorted; a different key (or no key)
    /// starts at asc.
    #[must_use]
    pub fn toggled(self, key: SortKey) -> Self {
        match (self.key, self.direction) {
            (Some(current), SortDirection::Ascending) if current == key => Self::descending(key),
            (Some(current), SortDirection::Descending) if current == key => Self::UNSORTED,
            _ => Self::ascending(key),
        }
    }

    /// Indicator to render on the header for `key` (empty when inactive).
    #[must_use]
    pub fn indicator_for(&self, key: SortKey) -> &'static str {
        if self.key == Some(key) {
            self.direction.indicator()
        } else {
            ""
        }
    }
}

/// Key used for locale-aware name ordering.
///
/// Names are transliterated to ASCII and case-folded so that "Édouard"
/// sorts with "Edward" rather than after "Zoe".
#[must_use]
pub fn collation_key(name: &str) -> String {
    deunicode::deunicode(name).to_lowercase()
}

/// Compare two names the way a reader expects: accent- and case-folded
/// first, then [`case_tiebreak`] so distinct names never compare equal.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| case_tiebreak(a, b))
}

/// Order names that fold to the same key: lower case before upper case
/// ("bill" < "Bill"), then raw text.
#[must_use]
pub fn case_tiebreak(a: &str, b: &str) -> Ordering {
    let flip = |c: char| {
        if c.is_uppercase() {
            c.to_lowercase().next().unwrap_or(c)
        } else {
            c.to_uppercase().next().unwrap_or(c)
        }
    };
    a.chars()
        .map(flip)
        .cmp(b.chars().map(flip))
        .then_with(|| a.cmp(b))
}
