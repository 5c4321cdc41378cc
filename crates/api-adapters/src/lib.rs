//! # api-adapters
//!
//! The web layer of rusty-press: JSON endpoints for the dashboard, the
//! API-key gated public API, server-rendered blog pages and `/metrics`.

pub mod metrics;
pub mod pages;

#[cfg(feature = "web-axum")]
pub mod http;

pub use metrics::Metrics;
