//! Core types and logic for the Castbook actor table.
//!
//! This crate has no browser dependencies:
//! - Data model and validated snapshots: [`Actor`], [`Movie`], [`Dataset`]
//! - The derivation engine: [`derive`], [`Query`], [`DerivationCache`]
//! - Sorting and paging: [`SortSpec`], [`Pagination`]
//! - Timers and debounce: [`Scheduler`], [`TimerQueue`], [`Debouncer`]
//! - Viewport classification: [`ViewportClassifier`], [`ViewportMonitor`]
//! - The state machine tying them together: [`TableState`]

#![cfg_attr(test, allow(clippy::unwrap_used))]

mod config;
mod dataset;
mod derive;
mod error;
mod memo;
mod model;
mod page;
mod sort;
mod state;
mod timer;
mod viewport;

pub use config::TableConfig;
pub use dataset::{Dataset, Inconsistency};
pub use derive::{derive, derive_indices, matches_search, Query};
pub use error::{Error, Result};
pub use memo::DerivationCache;
pub use model::{Actor, ActorId, Appearance, CastMember, Movie};
pub use page::{Pagination, DEFAULT_PAGE_SIZE};
pub use sort::{case_tiebreak, collation_key, compare_names, SortDirection, SortKey, SortSpec};
pub use state::{Command, Message, Phase, State, TableState};
pub use timer::{
    Debouncer, Scheduler, TimerQueue, TimerSlot, TimerToken, RESIZE_DEBOUNCE, SEARCH_DEBOUNCE,
};
pub use viewport::{
    classify, device_signature, Breakpoints, DeviceClass, LayoutHints, Viewport,
    ViewportClassifier, ViewportMonitor,
};
