//! Shared domain types for the Mac Bar sales dashboard.
//!
//! Holds the month/weekday vocabulary, the order-line record, the error
//! enum, CLI settings, timestamp parsing and number formatting used by the
//! data, runtime and UI crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;
