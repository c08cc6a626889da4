//! Castbook CLI - check datasets, query the table, serve the browser build.

#![allow(
    clippy::needless_pass_by_value,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate
)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use anyhow::{bail, Context, Result};
use castbook::view::{Body, NO_RESULTS_HINT, NO_RESULTS_TITLE};
use castbook::{
    Dataset, DatasetLoader, Intent, Session, SortKey, SortSpec, TableConfig, TableView,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tiny_http::{Header, Response, Server};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Width the CLI session mounts at; desktop, with the cameo shown.
const CLI_WIDTH: u32 = 1440;

#[derive(Parser)]
#[command(name = "castbook")]
#[command(about = "Actor/movie table: dataset checks, queries and a static server")]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load both documents and report consistency problems
    Check {
        /// Actors document
        #[arg(long, default_value = "www/data/actors.json")]
        actors: PathBuf,

        /// Movies document
        #[arg(long, default_value = "www/data/movies.json")]
        movies: PathBuf,
    },

    /// Run the table derivation and print one page
    Query(QueryArgs),

    /// Serve the browser build and data documents
    Serve {
        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Directory to serve (default: www)
        #[arg(short, long, default_value = "www")]
        dir: PathBuf,
    },
}

#[derive(clap::Args, Debug, Clone)]
struct QueryArgs {
    /// Actors document
    #[arg(long, default_value = "www/data/actors.json")]
    actors: PathBuf,

    /// Movies document
    #[arg(long, default_value = "www/data/movies.json")]
    movies: PathBuf,

    /// Only actors in this movie's cast
    #[arg(long)]
    movie: Option<String>,

    /// Case-insensitive text matched against names and movie titles
    #[arg(short, long)]
    search: Option<String>,

    /// Sort key (default from config: movies, descending)
    #[arg(long, value_enum)]
    sort: Option<SortArg>,

    /// Sort direction when --sort is given
    #[arg(long, value_enum, default_value = "asc")]
    direction: DirectionArg,

    /// Page to print (1-based, clamped)
    #[arg(short, long, default_value = "1")]
    page: usize,

    /// TOML table configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the view model as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortArg {
    Name,
    Movies,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DirectionArg {
    Asc,
    Desc,
}

fn sort_spec(sort: SortArg, direction: DirectionArg) -> SortSpec {
    let key = match sort {
        SortArg::Name => SortKey::Name,
        SortArg::Movies => SortKey::Movies,
        SortArg::None => return SortSpec::UNSORTED,
    };
    match direction {
        DirectionArg::Asc => SortSpec::ascending(key),
        DirectionArg::Desc => SortSpec::descending(key),
    }
}

/// Hands an already validated snapshot to the session.
struct Preloaded(Dataset);

impl DatasetLoader for Preloaded {
    fn load(&mut self, _actors_url: &str, _movies_url: &str) -> castbook::Result<Dataset> {
        Ok(self.0.clone())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Check { actors, movies } => check(&actors, &movies),
        Commands::Query(args) => {
            let view = run_query(&args)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render_text(&view));
            }
            Ok(())
        }
        Commands::Serve { port, dir } => serve(port, &dir),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "castbook=debug" } else { "castbook=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_dataset(actors: &Path, movies: &Path) -> Result<Dataset> {
    let actors_json = fs::read_to_string(actors)
        .with_context(|| format!("Failed to read {}", actors.display()))?;
    let movies_json = fs::read_to_string(movies)
        .with_context(|| format!("Failed to read {}", movies.display()))?;
    Dataset::from_json(&actors_json, &movies_json).context("Invalid dataset")
}

fn check(actors: &Path, movies: &Path) -> Result<()> {
    let dataset = load_dataset(actors, movies)?;
    println!(
        "✓ {} actors, {} movies",
        dataset.actors().len(),
        dataset.movies().len()
    );

    let problems = dataset.inconsistencies();
    if problems.is_empty() {
        println!("✓ Cast lists and appearances agree");
    } else {
        println!("⚠ {} inconsistencies:", problems.len());
        for problem in &problems {
            println!("  - {problem}");
        }
    }
    Ok(())
}

fn run_query(args: &QueryArgs) -> Result<TableView> {
    let mut config = match &args.config {
        Some(path) => TableConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TableConfig::default(),
    };
    if let Some(sort) = args.sort {
        config.default_sort = sort_spec(sort, args.direction);
    }

    let dataset = load_dataset(&args.actors, &args.movies)?;
    if let Some(title) = &args.movie {
        if dataset.movie(title).is_none() {
            bail!("Unknown movie '{title}'");
        }
    }

    let mut session = Session::new(config, "", Preloaded(dataset));
    session.mount(CLI_WIDTH);
    if let Some(title) = &args.movie {
        session.intent(Intent::SelectMovie(title.clone()));
    }
    if let Some(text) = &args.search {
        session.intent(Intent::Search(text.clone()));
    }
    session.settle();
    session.intent(Intent::GoToPage(args.page));

    let (hits, misses) = session.state().cache_stats();
    tracing::debug!(hits, misses, "derivation cache");
    Ok(session.view())
}

fn render_text(view: &TableView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.banner.text());

    match &view.body {
        Body::Skeleton { .. } => {
            let _ = writeln!(out, "Loading...");
        }
        Body::Empty => {
            let _ = writeln!(out, "{NO_RESULTS_TITLE}");
            let _ = writeln!(out, "{NO_RESULTS_HINT}");
        }
        Body::Rows { rows } => {
            for (i, movie) in view.movies.iter().enumerate() {
                let marker = if movie.selected { " *" } else { "" };
                let _ = writeln!(out, "  [{:>2}] {}{marker}", i + 1, movie.tooltip);
            }
            let _ = writeln!(out);

            let [actor, total] = &view.sort_headers;
            let name_width = rows
                .iter()
                .map(|r| r.name.chars().count())
                .chain(std::iter::once(actor.text().chars().count()))
                .max()
                .unwrap_or(0);
            let total_width = total.text().chars().count();
            let _ = writeln!(
                out,
                "{:<name_width$}  {:>total_width$}  Movies",
                actor.text(),
                total.text()
            );
            for row in rows {
                let cells: String = row
                    .cells
                    .iter()
                    .map(|c| if c.appeared { '●' } else { '·' })
                    .collect();
                let _ = writeln!(
                    out,
                    "{:<name_width$}  {:>total_width$}  {cells}",
                    row.name, row.total_movies
                );
            }
        }
    }

    if let Some(bar) = view.pagination {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", bar.label());
    }
    out
}

fn serve(port: u16, dir: &Path) -> Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let server =
        Server::http(&addr).map_err(|e| anyhow::anyhow!("Failed to start server on {addr}: {e}"))?;
    tracing::info!(dir = %dir.display(), "serving http://localhost:{port}");
    println!("Press Ctrl+C to stop");

    for request in server.incoming_requests() {
        let url = request.url().to_string();
        let response = match resolve(dir, &url).filter(|p| p.is_file()) {
            Some(path) => match fs::read(&path) {
                Ok(content) => {
                    let mut response = Response::from_data(content);
                    if let Ok(header) =
                        Header::from_bytes(&b"Content-Type"[..], content_type(&path).as_bytes())
                    {
                        response = response.with_header(header);
                    }
                    response
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "read failed");
                    Response::from_string("500 Internal Server Error").with_status_code(500)
                }
            },
            None => Response::from_string("404 Not Found").with_status_code(404),
        };
        tracing::debug!(%url, status = response.status_code().0, "request");

        if let Err(err) = request.respond(response) {
            tracing::warn!(%url, %err, "respond failed");
        }
    }
    Ok(())
}

/// Map a request URL to a file under `dir`, refusing anything that
/// climbs out of it.
fn resolve(dir: &Path, url: &str) -> Option<PathBuf> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    if path == "/" || path.is_empty() {
        return Some(dir.join("index.html"));
    }
    let relative = Path::new(path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(dir.join(relative))
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html",
        Some("js") => "application/javascript",
        Some("wasm") => "application/wasm",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("toml") => "application/toml",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTORS: &str = r#"[
        {"id": 1, "name": "Bill Murray", "image": "/img/bill.jpg",
         "appearances": [{"title": "Rushmore", "year": 1998},
                         {"title": "The Darjeeling Limited", "year": 2007}]},
        {"id": 2, "name": "Adrien Brody", "image": null,
         "appearances": [{"title": "The Darjeeling Limited", "year": 2007}]},
        {"id": 3, "name": "Olivia Williams", "image": null,
         "appearances": [{"title": "Rushmore", "year": 1998}]}
    ]"#;
    const MOVIES: &str = r#"[
        {"title": "Rushmore", "year": 1998,
         "actors": [{"id": 1, "name": "Bill Murray"}, {"id": 3, "name": "Olivia Williams"}]},
        {"title": "The Darjeeling Limited", "year": 2007,
         "actors": [{"id": 1, "name": "Bill Murray"}, {"id": 2, "name": "Adrien Brody"}]}
    ]"#;

    fn fixture(name: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("castbook-cli-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let actors = dir.join("actors.json");
        let movies = dir.join("movies.json");
        fs::write(&actors, ACTORS).unwrap();
        fs::write(&movies, MOVIES).unwrap();
        (actors, movies)
    }

    fn args(name: &str) -> QueryArgs {
        let (actors, movies) = fixture(name);
        QueryArgs {
            actors,
            movies,
            movie: None,
            search: None,
            sort: None,
            direction: DirectionArg::Asc,
            page: 1,
            config: None,
            json: false,
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn test_default_query_sorts_by_movies() {
            let view = run_query(&args("default")).unwrap();
            let names: Vec<_> = view.rows().iter().map(|r| r.name.as_str()).collect();
            assert_eq!(names, ["Bill Murray", "Adrien Brody", "Olivia Williams"]);
        }

        #[test]
        fn test_movie_search_and_sort() {
            let mut query = args("filtered");
            query.movie = Some("Rushmore".into());
            query.sort = Some(SortArg::Name);
            query.direction = DirectionArg::Desc;
            let view = run_query(&query).unwrap();
            let names: Vec<_> = view.rows().iter().map(|r| r.name.as_str()).collect();
            assert_eq!(names, ["Olivia Williams", "Bill Murray"]);

            query.search = Some("OLIVIA".into());
            let view = run_query(&query).unwrap();
            assert_eq!(view.rows().len(), 1);
        }

        #[test]
        fn test_unknown_movie_is_an_error() {
            let mut query = args("unknown");
            query.movie = Some("Bottle Rocket".into());
            let err = run_query(&query).unwrap_err();
            assert!(err.to_string().contains("Bottle Rocket"));
        }

        #[test]
        fn test_page_is_clamped() {
            let mut query = args("clamped");
            query.page = 9;
            let view = run_query(&query).unwrap();
            assert_eq!(view.pagination.unwrap().label(), "Page 1 of 1");
        }

        #[test]
        fn test_sort_spec_mapping() {
            assert_eq!(
                sort_spec(SortArg::Movies, DirectionArg::Desc),
                SortSpec::descending(SortKey::Movies)
            );
            assert!(sort_spec(SortArg::None, DirectionArg::Desc).is_unsorted());
        }
    }

    mod render_tests {
        use super::*;

        #[test]
        fn test_text_table() {
            let text = render_text(&run_query(&args("text")).unwrap());
            assert!(text.starts_with("Showing all actors\n"));
            assert!(text.contains("[ 2] The Darjeeling Limited (2007)"));
            assert!(text.contains("Total Movies ▼"));
            assert!(text.contains("Bill Murray"));
            assert!(text.contains("●●"));
            assert!(text.ends_with("Page 1 of 1\n"));
        }

        #[test]
        fn test_text_empty() {
            let mut query = args("empty");
            query.search = Some("nobody".into());
            let text = render_text(&run_query(&query).unwrap());
            assert!(text.contains(NO_RESULTS_TITLE));
            assert!(!text.contains("Page "));
        }
    }

    mod serve_tests {
        use super::*;

        #[test]
        fn test_resolve() {
            let root = Path::new("www");
            assert_eq!(resolve(root, "/"), Some(PathBuf::from("www/index.html")));
            assert_eq!(
                resolve(root, "/data/actors.json?v=2"),
                Some(PathBuf::from("www/data/actors.json"))
            );
            assert_eq!(resolve(root, "/../secret"), None);
            assert_eq!(resolve(root, "/data/./actors.json"), Some(PathBuf::from("www/data/actors.json")));
        }

        #[test]
        fn test_content_type() {
            assert_eq!(content_type(Path::new("index.html")), "text/html");
            assert_eq!(content_type(Path::new("castbook_bg.wasm")), "application/wasm");
            assert_eq!(content_type(Path::new("data/movies.json")), "application/json");
            assert_eq!(content_type(Path::new("wes.png")), "image/png");
            assert_eq!(content_type(Path::new("poster.jpg")), "image/jpeg");
            assert_eq!(content_type(Path::new("notes.xyz")), "application/octet-stream");
        }
    }
}
