//! Benchmarks for the derivation over a synthetic catalog.
//!
//! 5,000 actors across 40 movies, with a mix of filters and sorts.

use castbook_core::{
    derive_indices, Actor, Appearance, CastMember, Dataset, DerivationCache, Movie, Query,
    SortKey, SortSpec,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const ACTORS: u64 = 5_000;
const MOVIES: usize = 40;

const SURNAMES: [&str; 8] = [
    "Murray", "Wilson", "Huston", "Schwartzman", "Swinton", "Brody", "Norton", "Ronan",
];
const GIVEN: [&str; 8] = [
    "Bill", "Owen", "Anjelica", "Jason", "Tilda", "Adrien", "Édouard", "Saoirse",
];

fn catalog() -> Dataset {
    let titles: Vec<String> = (0..MOVIES).map(|i| format!("Feature {i:02}")).collect();
    let actors: Vec<Actor> = (0..ACTORS)
        .map(|id| {
            let name = format!(
                "{} {} {id}",
                GIVEN[(id % 8) as usize],
                SURNAMES[(id / 8 % 8) as usize]
            );
            let count = (id % 7 + 1) as usize;
            (0..count).fold(Actor::new(id, name), |actor, k| {
                let title = &titles[(id as usize + k * 5) % MOVIES];
                actor.appearance(Appearance::new(title.as_str()))
            })
        })
        .collect();
    let movies: Vec<Movie> = titles
        .iter()
        .map(|title| {
            actors
                .iter()
                .filter(|a| a.appears_in(title))
                .fold(Movie::new(title.as_str()), |m, a| {
                    m.cast(CastMember::new(a.id, a.name.clone()))
                })
        })
        .collect();
    Dataset::new(actors, movies).expect("synthetic titles are unique")
}

fn bench_derive(c: &mut Criterion) {
    let dataset = catalog();
    let queries = [
        ("unfiltered_unsorted", Query::new()),
        (
            "movies_desc",
            Query::new().sort(SortSpec::descending(SortKey::Movies)),
        ),
        ("name_asc", Query::new().sort(SortSpec::ascending(SortKey::Name))),
        ("search_name_asc", {
            Query::new()
                .search("wil")
                .sort(SortSpec::ascending(SortKey::Name))
        }),
        ("movie_filter", Query::new().movie("Feature 07")),
    ];

    let mut group = c.benchmark_group("derive_indices");
    for (label, query) in &queries {
        group.bench_with_input(BenchmarkId::from_parameter(label), query, |b, query| {
            b.iter(|| derive_indices(black_box(&dataset), black_box(query)));
        });
    }
    group.finish();
}

fn bench_cache_hit(c: &mut Criterion) {
    let dataset = catalog();
    let query = Query::new().sort(SortSpec::ascending(SortKey::Name));
    let mut cache = DerivationCache::new();
    cache.get(&dataset, &query);

    c.bench_function("derivation_cache_hit", |b| {
        b.iter(|| cache.get(black_box(&dataset), black_box(&query)));
    });
}

criterion_group!(benches, bench_derive, bench_cache_hit);
criterion_main!(benches);
