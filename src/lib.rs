//! Multi-timeframe confluence scanner.
//!
//! Computes technical indicators over eight candle resolutions per
//! instrument, classifies each resolution into a directional signal and
//! ranks instruments by how well the fast and slow resolutions agree.

pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
