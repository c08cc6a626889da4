//! Actor and movie records as they appear in the dataset documents.
//!
//! Both documents are denormalized mirrors of one cast relation: a movie
//! lists its cast, and every actor lists the movies they appear in. Optional
//! fields are modelled as `Option` so consumers never have to guess at
//! sentinel values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable actor identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ActorId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// One film an actor appears in, from the actor's side of the relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    /// Movie title (join key into the movie list)
    pub title: String,
    /// Release year
    #[serde(default)]
    pub year: Option<i32>,
    /// Poster URI
    #[serde(default)]
    pub poster: Option<String>,
    /// Runtime in minutes
    #[serde(default)]
    pub runtime: Option<u32>,
}

impl Appearance {
    /// Create an appearance with only a title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: None,
            poster: None,
            runtime: None,
        }
    }

    /// Set the release year.
    #[must_use]
    pub const fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }
}

/// A cast member with a list of film appearances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Unique identifier
    pub id: ActorId,
    /// Display name
    pub name: String,
    /// Portrait URI; `None` means the surface draws a placeholder
    #[serde(default)]
    pub image: Option<String>,
    /// Films this actor appears in
    #[serde(default)]
    pub appearances: Vec<Appearance>,
}

impl Actor {
    /// Create an actor with no image and no appearances.
    #[must_use]
    pub fn new(id: impl Into<ActorId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: None,
            appearances: Vec::new(),
        }
    }

    /// Set the portrait URI.
    #[must_use]
    pub fn image(mut self, uri: impl Into<String>) -> Self {
        self.image = Some(uri.into());
        self
    }

    /// Add an appearance.
    #[must_use]
    pub fn appearance(mut self, appearance: Appearance) -> Self {
        self.appearances.push(appearance);
        self
    }

    /// Number of films this actor appears in.
    #[must_use]
    pub fn total_movies(&self) -> usize {
        self.appearances.len()
    }

    /// Whether any appearance has exactly this title.
    #[must_use]
    pub fn appears_in(&self, title: &str) -> bool {
        self.appearances.iter().any(|a| a.title == title)
    }
}

/// A movie's view of one cast member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    /// Actor identifier
    pub id: ActorId,
    /// Actor name as credited
    pub name: String,
    /// Portrait URI
    #[serde(default)]
    pub image: Option<String>,
    /// Screen time in minutes
    #[serde(default)]
    pub minutes: Option<u32>,
    /// Character portrayed
    #[serde(default)]
    pub character: Option<String>,
}

impl CastMember {
    /// Create a cast entry.
    #[must_use]
    pub fn new(id: impl Into<ActorId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: None,
            minutes: None,
            character: None,
        }
    }

    /// Set the character name.
    #[must_use]
    pub fn character(mut self, character: impl Into<String>) -> Self {
        self.character = Some(character.into());
        self
    }
}

/// A film with descriptive fields and its cast list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Title; unique within a dataset
    pub title: String,
    /// Release year
    #[serde(default)]
    pub year: Option<i32>,
    /// Runtime in minutes
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Poster URI
    #[serde(default)]
    pub poster: Option<String>,
    /// Average rating
    #[serde(default)]
    pub rating: Option<f32>,
    /// Plot summary
    #[serde(default)]
    pub overview: Option<String>,
    /// Cast in billing order
    #[serde(default)]
    pub actors: Vec<CastMember>,
}

impl Movie {
    /// Create a movie with no cast.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: None,
            runtime: None,
            poster: None,
            rating: None,
            overview: None,
            actors: Vec::new(),
        }
    }

    /// Set the release year.
    #[must_use]
    pub const fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Add a cast member.
    #[must_use]
    pub fn cast(mut self, member: CastMember) -> Self {
        self.actors.push(member);
        self
    }

    /// Find the cast entry for an actor.
    #[must_use]
    pub fn cast_member(&self, id: ActorId) -> Option<&CastMember> {
        self.actors.iter().find(|m| m.id == id)
    }

    /// Title with the year in parentheses when known.
    #[must_use]
    pub fn label(&self) -> String {
        match self.year {
            Some(year) => format!("{} ({year})", self.title),
            None => self.title.clone(),
        }
    }
}
