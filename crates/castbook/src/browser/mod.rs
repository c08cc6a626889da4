//! Browser runtime for the actor table.
//!
//! Binds a [`TableState`](castbook_core::TableState) to the DOM: `fetch`
//! for the dataset, `setTimeout` for debounce and reveal timers, and event
//! delegation for clicks on rendered controls.

pub mod app;
mod fetch;
mod timers;

pub use app::{App, MASTHEAD_ID, SEARCH_ID, TABLE_ID};
pub use timers::WindowScheduler;
