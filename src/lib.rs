// src/lib.rs - End-to-end checks for the DummyJSON REST API

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod expect;
pub mod latency;
pub mod models;
pub mod query;
pub mod suite;
pub mod totals;

// Re-export commonly used items for convenience
pub use auth::{get_access_token, CredentialAcquirer, LoginOptions};
pub use client::{ApiContext, ApiResponse, ContextObserver};
pub use config::SuiteConfig;
pub use error::{Result, SuiteError};
pub use models::{TestData, TokenPair};
pub use suite::{CheckFilter, RunReport, Runner};
pub use totals::{recompute_cart_totals, CartTotals, LineItem};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    pub use crate::{
        ApiContext, CartTotals, CheckFilter, CredentialAcquirer, LineItem, LoginOptions, Result,
        Runner, SuiteConfig, SuiteError, TokenPair,
    };
}
