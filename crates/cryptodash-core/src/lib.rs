//! # Cryptodash Core
//!
//! The dashboard engine behind the `cryptodash` terminal UI: the row model,
//! the sort engine, viewport layout, key mapping, the global market summary,
//! and the single task that owns all mutable dashboard state.
//!
//! ## Laws (Compiler Enforced)
//!
//! - No `unwrap()` - returns `Result` instead
//! - No `expect()` - returns `Result` instead
//! - No `panic!()` - returns `Result` instead
//! - No `unsafe` - safe Rust only
//!
//! ## Ownership
//!
//! Exactly one task mutates [`DashboardState`]: the [`DashboardEngine`]. The
//! refresh scheduler, the key pump and resize notifications only ever send
//! [`EngineMessage`]s into its channel, so every render observes a state that
//! was fully updated by the previous message.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod engine;
mod error;
pub mod format;
pub mod keymap;
pub mod launcher;
pub mod layout;
pub mod market;
pub mod refresh;
pub mod row;
pub mod screen;
pub mod shutdown;
pub mod sort;
pub mod state;
pub mod theme;
pub mod view;

pub use config::{load_config, ConfigOverrides, DashboardConfig};
pub use engine::{DashboardEngine, EngineHandle, EngineMessage, ExitReason};
pub use error::{Error, Result};
pub use keymap::{Action, Key, KeyMap};
pub use launcher::{coin_url, Launcher};
pub use layout::{layout, Dimensions, LayoutMode, Region, ViewportGeometry};
pub use market::{MarketSummary, RawGlobal};
pub use refresh::{DataSource, RefreshScheduler, TriggerOutcome};
pub use row::{RawRecord, Row, RowSet};
pub use screen::Screen;
pub use shutdown::{terminate_requested, ShutdownCoordinator, ShutdownSignal};
pub use sort::{apply_sort, SortKey, SortSpec};
pub use state::{DashboardState, Effect, InputMode, Mutation, Transition};
pub use theme::Theme;
pub use view::View;
