//! auto-farm history - day-by-day sensor and trigger history for the
//! greenhouse dashboard.
//!
//! This library exposes the core modules for testing and reuse.

pub mod api;
pub mod browse;
pub mod chart;
pub mod common;
pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod services;
pub mod view;
