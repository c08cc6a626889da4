//! The derivation: raw records plus active constraints to an ordered list.
//!
//! Filters run movie-filter first, then text search; both are independent
//! predicates so the order only matters for documentation. Sorting is
//! stable in both directions: a descending sort compares in reverse rather
//! than reversing the ascending result, so tied actors keep their upstream
//! order.

use crate::dataset::Dataset;
use crate::model::{Actor, ActorId, Movie};
use crate::sort::{case_tiebreak, collation_key, SortKey, SortSpec};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Every input of the derivation except the dataset itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Query {
    /// Exact title of the movie to filter by
    pub selected_movie: Option<String>,
    /// Settled search text; empty means no text filter
    pub search: String,
    /// Active sort
    pub sort: SortSpec,
}

impl Query {
    /// Query with no filters and no sort.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by movie title.
    #[must_use]
    pub fn movie(mut self, title: impl Into<String>) -> Self {
        self.selected_movie = Some(title.into());
        self
    }

    /// Filter by search text.
    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    /// Set the sort.
    #[must_use]
    pub const fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }
}

/// Case-insensitive substring match against the name or any appearance title.
///
/// `needle` must already be lower-cased.
#[must_use]
pub fn matches_search(actor: &Actor, needle: &str) -> bool {
    actor.name.to_lowercase().contains(needle)
        || actor
            .appearances
            .iter()
            .any(|a| a.title.to_lowercase().contains(needle))
}

/// Derive the displayed list from plain slices.
///
/// When several movies share the selected title the first one wins; use
/// [`Dataset`] to have duplicates rejected up front.
#[must_use]
pub fn derive<'a>(actors: &'a [Actor], movies: &[Movie], query: &Query) -> Vec<&'a Actor> {
    let cast: Option<HashSet<ActorId>> = query
        .selected_movie
        .as_deref()
        .and_then(|title| movies.iter().find(|m| m.title == title))
        .map(|m| m.actors.iter().map(|c| c.id).collect());

    order(actors, cast.as_ref(), query)
        .into_iter()
        .map(|i| &actors[i])
        .collect()
}

/// Derive the displayed list as indices into `dataset.actors()`.
#[must_use]
pub fn derive_indices(dataset: &Dataset, query: &Query) -> Vec<usize> {
    let cast = query
        .selected_movie
        .as_deref()
        .and_then(|title| dataset.cast_of(title));
    order(dataset.actors(), cast, query)
}

fn order(actors: &[Actor], cast: Option<&HashSet<ActorId>>, query: &Query) -> Vec<usize> {
    let needle = query.search.to_lowercase();

    let mut indices: Vec<usize> = actors
        .iter()
        .enumerate()
        .filter(|(_, actor)| cast.map_or(true, |ids| ids.contains(&actor.id)))
        .filter(|(_, actor)| needle.is_empty() || matches_search(actor, &needle))
        .map(|(i, _)| i)
        .collect();

    sort_indices(actors, &mut indices, query.sort);
    indices
}

fn sort_indices(actors: &[Actor], indices: &mut [usize], spec: SortSpec) {
    let Some(key) = spec.key else {
        return;
    };
    let direction = spec.direction;

    match key {
        SortKey::Name => {
            // Collation keys are computed once per actor, not per comparison.
            let mut keyed: Vec<(String, usize)> = indices
                .iter()
                .map(|&i| (collation_key(&actors[i].name), i))
                .collect();
            keyed.sort_by(|(ka, ia), (kb, ib)| {
                direction.apply(
                    ka.cmp(kb)
                        .then_with(|| case_tiebreak(&actors[*ia].name, &actors[*ib].name)),
                )
            });
            for (slot, (_, i)) in indices.iter_mut().zip(keyed) {
                *slot = i;
            }
        }
        SortKey::Movies => {
            indices.sort_by(|&a, &b| {
                direction.apply(actors[a].total_movies().cmp(&actors[b].total_movies()))
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Appearance, CastMember};
    use crate::sort::SortKey;
    use proptest::prelude::*;

    fn actor(id: u64, name: &str, titles: &[&str]) -> Actor {
        titles
            .iter()
            .fold(Actor::new(id, name), |a, t| a.appearance(Appearance::new(*t)))
    }

    fn fixture() -> (Vec<Actor>, Vec<Movie>) {
        let actors = vec![
            actor(1, "Bill Murray", &["Rushmore", "The Life Aquatic", "Isle of Dogs"]),
            actor(2, "Owen Wilson", &["Bottle Rocket", "Rushmore", "The Life Aquatic"]),
            actor(3, "Anjelica Huston", &["The Life Aquatic"]),
            actor(4, "Jason Schwartzman", &["Rushmore", "Isle of Dogs"]),
            actor(5, "Luke Wilson", &["Bottle Rocket"]),
        ];
        let mut movies: Vec<Movie> = ["Bottle Rocket", "Rushmore", "The Life Aquatic", "Isle of Dogs"]
            .iter()
            .map(|t| Movie::new(*t))
            .collect();
        for a in &actors {
            for app in &a.appearances {
                if let Some(m) = movies.iter_mut().find(|m| m.title == app.title) {
                    m.actors.push(CastMember::new(a.id, a.name.clone()));
                }
            }
        }
        (actors, movies)
    }

    fn ids(list: &[&Actor]) -> Vec<u64> {
        list.iter().map(|a| a.id.0).collect()
    }

    mod filter_tests {
        use super::*;

        #[test]
        fn test_no_constraints_keeps_dataset_order() {
            let (actors, movies) = fixture();
            let out = derive(&actors, &movies, &Query::new());
            assert_eq!(ids(&out), vec![1, 2, 3, 4, 5]);
        }

        #[test]
        fn test_movie_filter() {
            let (actors, movies) = fixture();
            let out = derive(&actors, &movies, &Query::new().movie("Bottle Rocket"));
            assert_eq!(ids(&out), vec![2, 5]);
        }

        #[test]
        fn test_unknown_movie_is_noop() {
            let (actors, movies) = fixture();
            let out = derive(&actors, &movies, &Query::new().movie("Moonrise Kingdom"));
            assert_eq!(out.len(), actors.len());
        }

        #[test]
        fn test_movie_filter_is_case_sensitive() {
            let (actors, movies) = fixture();
            let out = derive(&actors, &movies, &Query::new().movie("rushmore"));
            assert_eq!(out.len(), actors.len());
        }

        #[test]
        fn test_search_matches_name_case_insensitive() {
            let (actors, movies) = fixture();
            let out = derive(&actors, &movies, &Query::new().search("WILSON"));
            assert_eq!(ids(&out), vec![2, 5]);
        }

        #[test]
        fn test_search_matches_appearance_title() {
            let (actors, movies) = fixture();
            let out = derive(&actors, &movies, &Query::new().search("dogs"));
            assert_eq!(ids(&out), vec![1, 4]);
        }

        #[test]
        fn test_search_whitespace_is_literal() {
            let (actors, movies) = fixture();
            let out = derive(&actors, &movies, &Query::new().search(" "));
            // every name and most titles contain a space
            assert_eq!(out.len(), 5);
            let out = derive(&actors, &movies, &Query::new().search("  "));
            assert!(out.is_empty());
        }

        #[test]
        fn test_movie_and_search_compose() {
            let (actors, movies) = fixture();
            let q = Query::new().movie("Rushmore").search("wilson");
            assert_eq!(ids(&derive(&actors, &movies, &q)), vec![2]);
        }

        #[test]
        fn test_empty_inputs() {
            let out = derive(&[], &[], &Query::new().movie("X").search("y"));
            assert!(out.is_empty());
        }
    }

    mod sort_tests {
        use super::*;

        #[test]
        fn test_sort_by_name_ascending() {
            let (actors, movies) = fixture();
            let q = Query::new().sort(SortSpec::ascending(SortKey::Name));
            assert_eq!(ids(&derive(&actors, &movies, &q)), vec![3, 1, 4, 5, 2]);
        }

        #[test]
        fn test_sort_by_name_descending() {
            let (actors, movies) = fixture();
            let q = Query::new().sort(SortSpec::descending(SortKey::Name));
            assert_eq!(ids(&derive(&actors, &movies, &q)), vec![2, 5, 4, 1, 3]);
        }

        #[test]
        fn test_name_sort_puts_lower_case_first() {
            let actors = vec![
                actor(1, "Owen", &[]),
                actor(2, "owen", &[]),
                actor(3, "Öwen", &[]),
            ];
            let q = Query::new().sort(SortSpec::ascending(SortKey::Name));
            assert_eq!(ids(&derive(&actors, &[], &q)), vec![2, 1, 3]);
            let q = Query::new().sort(SortSpec::descending(SortKey::Name));
            assert_eq!(ids(&derive(&actors, &[], &q)), vec![3, 1, 2]);
        }

        #[test]
        fn test_sort_by_movies_ascending_is_stable() {
            let (actors, movies) = fixture();
            let q = Query::new().sort(SortSpec::ascending(SortKey::Movies));
            // 3 and 5 tie at 1; 4 alone at 2; 1 and 2 tie at 3
            assert_eq!(ids(&derive(&actors, &movies, &q)), vec![3, 5, 4, 1, 2]);
        }

        #[test]
        fn test_sort_by_movies_descending_is_stable() {
            let (actors, movies) = fixture();
            let q = Query::new().sort(SortSpec::descending(SortKey::Movies));
            assert_eq!(ids(&derive(&actors, &movies, &q)), vec![1, 2, 4, 3, 5]);
        }

        #[test]
        fn test_unsorted_keeps_filtered_order() {
            let (actors, movies) = fixture();
            let q = Query::new().search("rushmore").sort(SortSpec::UNSORTED);
            assert_eq!(ids(&derive(&actors, &movies, &q)), vec![1, 2, 4]);
        }

        #[test]
        fn test_dataset_path_matches_slice_path() {
            let (actors, movies) = fixture();
            let ds = Dataset::new(actors.clone(), movies.clone()).unwrap();
            let q = Query::new()
                .movie("The Life Aquatic")
                .sort(SortSpec::ascending(SortKey::Name));
            let via_slices = ids(&derive(&actors, &movies, &q));
            let via_dataset: Vec<u64> = derive_indices(&ds, &q)
                .into_iter()
                .map(|i| ds.actors()[i].id.0)
                .collect();
            assert_eq!(via_slices, via_dataset);
        }
    }

    fn arb_actors() -> impl Strategy<Value = Vec<Actor>> {
        let titles = prop::sample::select(vec!["Rushmore", "Bottle Rocket", "Isle of Dogs", "Asteroid City"]);
        prop::collection::vec(
            ("[a-zA-Z ]{0,8}", prop::collection::vec(titles, 0..4)),
            0..30,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (name, titles))| actor(i as u64, &name, &titles))
                .collect()
        })
    }

    fn cast_movies(actors: &[Actor]) -> Vec<Movie> {
        ["Rushmore", "Bottle Rocket", "Isle of Dogs", "Asteroid City"]
            .iter()
            .map(|t| {
                actors
                    .iter()
                    .filter(|a| a.appears_in(t))
                    .fold(Movie::new(*t), |m, a| m.cast(CastMember::new(a.id, a.name.clone())))
            })
            .collect()
    }

    proptest! {
        #[test]
        fn prop_every_result_satisfies_filters(
            actors in arb_actors(),
            search in "[a-z]{1,3}",
            movie in prop::sample::select(vec!["Rushmore", "Isle of Dogs"]),
        ) {
            let movies = cast_movies(&actors);
            let q = Query::new().movie(movie).search(search.clone());
            for a in derive(&actors, &movies, &q) {
                prop_assert!(a.appears_in(movie));
                prop_assert!(matches_search(a, &search));
            }
        }

        #[test]
        fn prop_movies_sort_ties_keep_upstream_order(actors in arb_actors(), desc in any::<bool>()) {
            let movies = cast_movies(&actors);
            let spec = if desc {
                SortSpec::descending(SortKey::Movies)
            } else {
                SortSpec::ascending(SortKey::Movies)
            };
            let out = derive(&actors, &movies, &Query::new().sort(spec));
            for pair in out.windows(2) {
                if pair[0].total_movies() == pair[1].total_movies() {
                    prop_assert!(pair[0].id < pair[1].id);
                }
            }
        }

        #[test]
        fn prop_sort_is_permutation_of_filter(actors in arb_actors()) {
            let movies = cast_movies(&actors);
            let unsorted = derive(&actors, &movies, &Query::new().search("o"));
            let sorted = derive(
                &actors,
                &movies,
                &Query::new().search("o").sort(SortSpec::ascending(SortKey::Name)),
            );
            let mut a = ids(&unsorted);
            let mut b = ids(&sorted);
            a.sort_unstable();
            b.sort_unstable();
            prop_assert_eq!(a, b);
        }
    }
}
