//! # Fanin Core
//!
//! Folds a burst of per-file invocations into a single merge-engine launch.
//!
//! A file manager that cannot pass a multi-selection to one process starts
//! one process per file instead. Every process registers its path in a shared
//! state directory, waits out a debounce window, and then competes for
//! leadership under an advisory file lock. Exactly one instance per burst
//! (a "wave") wins, launches the engine with the whole selection, and resets
//! the session for the next wave.
//!
//! ## Laws (Compiler Enforced)
//!
//! - No `unwrap()` / `expect()` / `panic!()` outside tests
//! - No `unsafe` - safe Rust only
//!
//! ## Error Handling
//!
//! All fallible operations return `Result<T, Error>`. Lock contention past the
//! timeout is not an error: it surfaces as [`Locked::TimedOut`] and ends the
//! invocation as [`Outcome::TimedOut`].

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod clock;
pub mod config;
pub mod coordinator;
pub mod diagnostics;
mod error;
pub mod launcher;
pub mod lock;
pub mod resolve;
pub mod state;

pub use clock::{Clock, SystemClock, Timestamp};
pub use config::Config;
pub use coordinator::{AbstainReason, Coordinator, Election, Outcome, Phase};
pub use error::{Error, IoErrorKind, Result};
pub use launcher::{EngineLauncher, Launcher};
pub use lock::{AdvisoryLock, Locked};
pub use state::{LastUpdate, SessionPaths, SessionStore};
