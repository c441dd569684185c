//! Data pipeline for the Mac Bar sales dashboard.
//!
//! Loads the monthly point-of-sale exports into one unified table, narrows
//! it by month and day-of-week, and computes the aggregates and insights the
//! renderers display. Everything after the initial read is a pure function
//! of its input.

pub mod aggregator;
pub mod filter;
pub mod reader;

pub use macbar_core as core;
