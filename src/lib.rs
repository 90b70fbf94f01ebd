//! Deadline tracking against a remote deadline API.
//!
//! The core is small: [`timescale`] classifies each deadline by how much
//! time is left, and [`store::DeadlineStore`] holds the session's deadlines.
//! [`session`] keeps the store in step with the server by applying a change
//! only after the server confirmed it. The CLI in [`commands`] and the
//! terminal UI in [`tui`] sit on top.

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod session;
pub mod store;
pub mod timescale;
pub mod tui;

pub use error::{DeadlineError, Result, ValidationError};
pub use models::{Deadline, DeadlineDraft, DeadlineId};
pub use store::DeadlineStore;
pub use timescale::{
    calculate_time_scale, generate_time_scale_mapping, TimeScale, TimeScaleMapping,
};
