//! Memograph - rotating node-link graph scenes
//!
//! Loads semicolon-delimited edge and layout files, builds 2D or 3D scenes
//! with a closed rotation animation for a plotly-style plotting surface,
//! and logs the viewpoints users settle on to an anonymous-auth store.

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod models;
pub mod render;
pub mod scene;
pub mod sequencer;
pub mod surface;
pub mod telemetry;
pub mod trace;
