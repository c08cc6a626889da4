//! Castbook: the actor table surface.
//!
//! Built on [`castbook_core`], this crate turns table state into a view
//! model and HTML, and runs it either natively ([`Session`]) or in the
//! browser (`App`, wasm32 only).
//!
//! # Browser Usage (WASM)
//!
//! ```javascript
//! import init, { App } from './castbook.js';
//!
//! async function main() {
//!     await init();
//!     const app = new App();
//!     app.mount();
//! }
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub use castbook_core::*;

pub mod avatar;
pub mod html;
pub mod intent;
pub mod runtime;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub mod browser;

pub use avatar::{Placeholder, Portrait};
pub use intent::Intent;
pub use runtime::{DatasetLoader, FsLoader, Session, StaticLoader};
pub use view::{Redraw, TableView};

#[cfg(target_arch = "wasm32")]
pub use browser::App;
