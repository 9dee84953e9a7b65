//! Shared declaration model and curated configuration for meos-bindgen.
//!
//! This crate holds the values every other part of the generator consumes:
//! - [`Declaration`]: one native function as fed by the header scanner
//! - [`CuratedTables`]: the hand-maintained role sets and skip/hide lists,
//!   validated once at load
//! - [`checker`]: the configuration-drift detector run over the full
//!   function-name universe

pub mod checker;
pub mod config;
pub mod declaration;
pub mod error;

pub use checker::{ConsistencyWarning, check_named_table, check_tables};
pub use config::CuratedTables;
pub use declaration::Declaration;
pub use error::ConfigError;
