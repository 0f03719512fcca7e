//! gymlog - Personal gym set logger
//!
//! Fast kg × reps logging against a fixed three-day split, with PRs,
//! weekly volume tracking, CSV export and JSON backup.

pub mod export;
pub mod plan;
pub mod state;
pub mod stats;
pub mod store;
pub mod tui;

pub use state::AppState;
pub use store::Store;
