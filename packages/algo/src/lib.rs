//! # recall-algo - flashcard review core
//!
//! Pure Rust spaced-repetition building blocks:
//!
//! - **Scheduler** - SM-2 style interval and ease updates from a recall grade
//! - **Selection** - due ordering, random sampling and name lookup over a deck
//!
//! ## Design goals
//!
//! - **No I/O** - storage and rendering live in the application crate
//! - **Injected clock** - every time-dependent function takes `now`
//! - **Tested boundaries** - the fixed learning steps for repetition counts
//!   0, 1 and 2 are asserted explicitly
//!
//! ## Module layout
//!
//! - [`scheduler`] - `Scheduler::update`, `is_due`, `SchedulerParams`
//! - [`selection`] - `order_due`, `sample_without_replacement`, `match_name`
//! - [`types`] - `Grade`, `MemoryState`, constants and errors
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use recall_algo::{is_due, Grade, Scheduler};
//!
//! let scheduler = Scheduler::default();
//! let now = Utc::now();
//!
//! assert!(is_due(None, now));
//! let state = scheduler.update(None, Grade::Good, now);
//! assert_eq!(state.repetition_count, 1);
//! assert!(!is_due(Some(&state), now));
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod scheduler;
pub mod selection;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use types::*;

pub use scheduler::{is_due, Scheduler, SchedulerParams};

pub use selection::{
    match_name, order_due, pick_one, sample_without_replacement, search_names, NameMatch, Named,
};
