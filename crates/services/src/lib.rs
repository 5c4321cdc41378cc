//! # services
//!
//! Business rules of rusty-press, written against the `domains` ports only.

pub mod accounts;
pub mod analytics;
pub mod api_keys;
pub mod articles;
pub mod validation;
pub mod views;

pub use accounts::AccountService;
pub use analytics::AnalyticsService;
pub use api_keys::ApiKeyService;
pub use articles::ArticleService;
pub use views::{TrackingOutcome, ViewRecorder};
