//! Native runtime: drives a [`TableState`] on a virtual [`TimerQueue`].
//!
//! The browser runtime performs the same command loop on top of
//! `fetch` and `setTimeout`; this one is used by the CLI and by tests.

use crate::intent::Intent;
use crate::view::TableView;
use castbook_core::{
    Command, Dataset, Message, Result, Scheduler, State, TableConfig, TableState, TimerQueue,
};
use std::path::PathBuf;
use std::time::Duration;

/// Source of the two dataset documents.
pub trait DatasetLoader {
    /// Fetch both documents and build a snapshot.
    fn load(&mut self, actors_url: &str, movies_url: &str) -> Result<Dataset>;
}

/// Loader over documents already in memory.
#[derive(Debug, Clone)]
pub struct StaticLoader {
    actors: String,
    movies: String,
}

impl StaticLoader {
    /// Serve these two documents for any location.
    #[must_use]
    pub fn new(actors: impl Into<String>, movies: impl Into<String>) -> Self {
        Self {
            actors: actors.into(),
            movies: movies.into(),
        }
    }
}

impl DatasetLoader for StaticLoader {
    fn load(&mut self, _actors_url: &str, _movies_url: &str) -> Result<Dataset> {
        Dataset::from_json(&self.actors, &self.movies)
    }
}

/// Loader reading documents from disk.
///
/// Locations are resolved against `root`; a leading `/` is treated as
/// relative to it, so the browser's `/data/actors.json` maps to
/// `<root>/data/actors.json`. With an empty root locations are used as is.
#[derive(Debug, Clone, Default)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    /// Resolve locations against `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, location: &str) -> PathBuf {
        if self.root.as_os_str().is_empty() {
            return PathBuf::from(location);
        }
        self.root.join(location.trim_start_matches('/'))
    }
}

impl DatasetLoader for FsLoader {
    fn load(&mut self, actors_url: &str, movies_url: &str) -> Result<Dataset> {
        let actors = std::fs::read_to_string(self.resolve(actors_url))?;
        let movies = std::fs::read_to_string(self.resolve(movies_url))?;
        Dataset::from_json(&actors, &movies)
    }
}

/// A single page load, from mount to teardown.
#[derive(Debug)]
pub struct Session<L> {
    state: TableState,
    timers: TimerQueue<Message>,
    loader: L,
}

impl<L: DatasetLoader> Session<L> {
    /// Create a session; nothing runs until [`Session::mount`].
    #[must_use]
    pub fn new(config: TableConfig, user_agent: &str, loader: L) -> Self {
        Self {
            state: TableState::new(config, user_agent),
            timers: TimerQueue::new(),
            loader,
        }
    }

    /// Mount at `width`: measure the viewport and load the dataset.
    pub fn mount(&mut self, width: u32) {
        self.send(Message::Measured(width));
        let init = self.state.init();
        self.execute(init);
    }

    /// Deliver a message and run its effects.
    pub fn send(&mut self, msg: Message) {
        let cmd = self.state.update(msg);
        self.execute(cmd);
    }

    /// Deliver a user intent.
    pub fn intent(&mut self, intent: Intent) {
        self.send(intent.into());
    }

    /// Advance virtual time, delivering any timers that come due.
    pub fn advance(&mut self, by: Duration) {
        for msg in self.timers.advance(by) {
            self.send(msg);
        }
    }

    /// Deliver every pending timer, in deadline order.
    pub fn settle(&mut self) {
        while !self.timers.is_empty() {
            for msg in self.timers.advance_to_next() {
                self.send(msg);
            }
        }
    }

    /// Tear the session down, cancelling outstanding timers.
    pub fn teardown(&mut self) {
        self.send(Message::Teardown);
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &TableState {
        &self.state
    }

    /// Pending timers.
    #[must_use]
    pub const fn timers(&self) -> &TimerQueue<Message> {
        &self.timers
    }

    /// Build the view for the current state.
    #[must_use]
    pub fn view(&self) -> TableView {
        TableView::build(&self.state)
    }

    fn execute(&mut self, cmd: Command<Message>) {
        match cmd {
            Command::None => {}
            Command::Batch(cmds) => {
                for cmd in cmds {
                    self.execute(cmd);
                }
            }
            Command::Schedule {
                slot,
                delay,
                message,
            } => {
                self.timers.schedule(slot, delay, message);
            }
            Command::Cancel(slot) => self.timers.cancel(slot),
            Command::LoadDataset {
                actors_url,
                movies_url,
            } => {
                tracing::debug!(%actors_url, %movies_url, "loading dataset");
                let msg = match self.loader.load(&actors_url, &movies_url) {
                    Ok(dataset) => Message::DatasetLoaded(dataset),
                    Err(err) => Message::DatasetFailed(err.to_string()),
                };
                self.send(msg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTORS: &str = r#"[
        {"id": 1, "name": "Bill Murray", "image": null,
         "appearances": [{"title": "Rushmore", "year": 1998}]}
    ]"#;
    const MOVIES: &str = r#"[
        {"title": "Rushmore", "year": 1998,
         "actors": [{"id": 1, "name": "Bill Murray", "image": null, "minutes": 40}]}
    ]"#;

    #[test]
    fn test_mount_loads_and_reveals() {
        let mut session = Session::new(TableConfig::default(), "", StaticLoader::new(ACTORS, MOVIES));
        session.mount(1400);
        assert!(session.view().is_loading());
        assert!(session.state().dataset().is_some());
        session.advance(Duration::from_millis(1000));
        assert_eq!(session.view().rows().len(), 1);
    }

    #[test]
    fn test_bad_document_stays_loading() {
        let mut session = Session::new(TableConfig::default(), "", StaticLoader::new("{", MOVIES));
        session.mount(1400);
        session.settle();
        assert!(session.view().is_loading());
        assert!(session.state().dataset().is_none());
    }

    #[test]
    fn test_fs_loader_resolves_against_root() {
        let loader = FsLoader::new("/srv/www");
        assert_eq!(
            loader.resolve("/data/actors.json"),
            PathBuf::from("/srv/www/data/actors.json")
        );
        assert_eq!(loader.resolve("movies.json"), PathBuf::from("/srv/www/movies.json"));
        assert_eq!(
            FsLoader::default().resolve("/tmp/actors.json"),
            PathBuf::from("/tmp/actors.json")
        );
    }

    #[test]
    fn test_fs_loader_missing_file_fails() {
        let mut session = Session::new(
            TableConfig::default(),
            "",
            FsLoader::new("/nonexistent-castbook-root"),
        );
        session.mount(800);
        session.settle();
        assert!(session.state().dataset().is_none());
    }
}
