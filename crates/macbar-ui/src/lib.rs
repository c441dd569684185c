//! Rendering layer for the Mac Bar dashboard.
//!
//! One [`render::Renderer`] trait with three implementations: a plain-text
//! report, a JSON document, and a ratatui terminal dashboard driven by the
//! interactive [`app::App`] event loop.

pub mod app;
pub mod components;
pub mod dashboard_view;
pub mod render;
pub mod themes;

pub use macbar_core as core;
