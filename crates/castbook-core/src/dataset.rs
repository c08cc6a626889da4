//! Immutable dataset snapshot with precomputed lookup indexes.
//!
//! A [`Dataset`] is built once from the two documents and shared by
//! reference afterwards. Cloning is cheap; two clones of the same snapshot
//! compare equal under [`Dataset::same_snapshot`].

use crate::error::{Error, Result};
use crate::model::{Actor, ActorId, Movie};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// A mismatch between the actor and movie sides of the cast relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    /// A movie credits an actor whose appearances omit that movie.
    CastWithoutAppearance {
        /// Credited actor
        actor: ActorId,
        /// Movie title
        title: String,
    },
    /// An actor lists a known movie whose cast omits them.
    AppearanceWithoutCast {
        /// Actor listing the appearance
        actor: ActorId,
        /// Movie title
        title: String,
    },
    /// An actor lists a title that no movie has.
    UnknownMovie {
        /// Actor listing the appearance
        actor: ActorId,
        /// Unmatched title
        title: String,
    },
    /// A movie credits an id that no actor record has.
    UnknownActor {
        /// Credited id
        actor: ActorId,
        /// Movie title
        title: String,
    },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CastWithoutAppearance { actor, title } => {
                write!(f, "'{title}' credits actor {actor}, who has no appearance for it")
            }
            Self::AppearanceWithoutCast { actor, title } => {
                write!(f, "actor {actor} lists '{title}', whose cast omits them")
            }
            Self::UnknownMovie { actor, title } => {
                write!(f, "actor {actor} lists unknown movie '{title}'")
            }
            Self::UnknownActor { actor, title } => {
                write!(f, "'{title}' credits unknown actor {actor}")
            }
        }
    }
}

/// Immutable snapshot of both dataset documents.
#[derive(Debug, Clone)]
pub struct Dataset {
    actors: Arc<[Actor]>,
    movies: Arc<[Movie]>,
    /// Title -> index into `movies`
    titles: Arc<HashMap<String, usize>>,
    /// Cast ids per movie, parallel to `movies`
    casts: Arc<[HashSet<ActorId>]>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self::empty()
    }
}

impl Dataset {
    /// Build a snapshot, rejecting duplicate movie titles.
    pub fn new(actors: Vec<Actor>, movies: Vec<Movie>) -> Result<Self> {
        let mut titles = HashMap::with_capacity(movies.len());
        for (index, movie) in movies.iter().enumerate() {
            if titles.insert(movie.title.clone(), index).is_some() {
                return Err(Error::DuplicateTitle(movie.title.clone()));
            }
        }

        let casts: Vec<HashSet<ActorId>> = movies
            .iter()
            .map(|m| m.actors.iter().map(|c| c.id).collect())
            .collect();

        Ok(Self {
            actors: actors.into(),
            movies: movies.into(),
            titles: Arc::new(titles),
            casts: casts.into(),
        })
    }

    /// A snapshot with no actors and no movies.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            actors: Arc::from(Vec::new()),
            movies: Arc::from(Vec::new()),
            titles: Arc::new(HashMap::new()),
            casts: Arc::from(Vec::new()),
        }
    }

    /// Decode both documents and build a snapshot.
    pub fn from_json(actors_json: &str, movies_json: &str) -> Result<Self> {
        let actors: Vec<Actor> = serde_json::from_str(actors_json).map_err(|source| Error::Json {
            document: "actors",
            source,
        })?;
        let movies: Vec<Movie> = serde_json::from_str(movies_json).map_err(|source| Error::Json {
            document: "movies",
            source,
        })?;
        Self::new(actors, movies)
    }

    /// All actors in dataset order.
    #[must_use]
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// All movies in dataset order.
    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Whether both collections are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty() && self.movies.is_empty()
    }

    /// Look up a movie by exact title.
    #[must_use]
    pub fn movie(&self, title: &str) -> Option<&Movie> {
        self.titles.get(title).map(|&i| &self.movies[i])
    }

    /// Cast ids of the movie with this exact title.
    #[must_use]
    pub fn cast_of(&self, title: &str) -> Option<&HashSet<ActorId>> {
        self.titles.get(title).map(|&i| &self.casts[i])
    }

    /// Whether an actor is in the cast of the movie at `movie_index`.
    #[must_use]
    pub fn in_cast(&self, movie_index: usize, actor: ActorId) -> bool {
        self.casts
            .get(movie_index)
            .is_some_and(|cast| cast.contains(&actor))
    }

    /// Whether two handles share the same underlying documents.
    #[must_use]
    pub fn same_snapshot(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.actors, &other.actors) && Arc::ptr_eq(&self.movies, &other.movies)
    }

    /// Report every place where the two sides of the cast relation disagree.
    #[must_use]
    pub fn inconsistencies(&self) -> Vec<Inconsistency> {
        let known: HashMap<ActorId, &Actor> = self.actors.iter().map(|a| (a.id, a)).collect();
        let mut found = Vec::new();

        for movie in self.movies.iter() {
            for member in &movie.actors {
                match known.get(&member.id) {
                    None => found.push(Inconsistency::UnknownActor {
                        actor: member.id,
                        title: movie.title.clone(),
                    }),
                    Some(actor) if !actor.appears_in(&movie.title) => {
                        found.push(Inconsistency::CastWithoutAppearance {
                            actor: member.id,
                            title: movie.title.clone(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        for actor in self.actors.iter() {
            for appearance in &actor.appearances {
                match self.titles.get(&appearance.title) {
                    None => found.push(Inconsistency::UnknownMovie {
                        actor: actor.id,
                        title: appearance.title.clone(),
                    }),
                    Some(&i) if !self.casts[i].contains(&actor.id) => {
                        found.push(Inconsistency::AppearanceWithoutCast {
                            actor: actor.id,
                            title: appearance.title.clone(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        found
    }
}
