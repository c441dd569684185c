//! Runtime layer for the Mac Bar dashboard.
//!
//! Holds the process-wide load cache and the interactive selection state that
//! the renderers drive.

pub mod cache;
pub mod session;

pub use macbar_core as core;
pub use macbar_data as data;
