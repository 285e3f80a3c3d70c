//! Shopify Admin API client for the catalog sync jobs (HIGH PRIVILEGE).
//!
//! # Security
//!
//! **This crate holds the high-privilege Admin API access token.** The
//! token can create products, change inventory and rewrite unit costs.
//!
//! # Architecture
//!
//! - `graphql_client::GraphQLQuery` describes every operation (variables,
//!   response shape, query text)
//! - Requests are sent with `reqwest` directly
//! - Every call goes through the bounded throttle retry in [`retry`]
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_sync_shopify::{AdminClient, config::SyncConfig};
//!
//! let config = SyncConfig::from_env()?;
//! let client = AdminClient::new(&config.shopify, config.retry)?;
//!
//! // Look up every variant sharing a SKU
//! let variants = client.find_variants_by_sku(&sku).await?;
//!
//! // Set the first variant's available quantity to zero
//! if let Some((variant, level)) = variants.first().and_then(|v| Some((v, v.first_level()?))) {
//!     client
//!         .adjust_available(&variant.inventory_item_id, &level.location_id,
//!             -level.available, Some(level.available), "correction")
//!         .await?;
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod admin;
pub mod config;
pub mod retry;
pub mod types;

use std::time::Duration;

pub use admin::AdminClient;
pub use types::*;

use retry::{Classify, RetryError, RetrySignal};
use thiserror::Error;

/// GraphQL error code Shopify uses for cost-based rate limiting.
pub const THROTTLED_CODE: &str = "THROTTLED";

/// Failures of an Admin API call, after any throttle retries.
#[derive(Debug, Error)]
pub enum AdminShopifyError {
    /// Transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status other than 401/429.
    #[error("Unexpected HTTP status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated).
        body: String,
    },

    /// Top-level `errors` in an otherwise successful response.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// Response body did not decode.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A mutation returned no object and no user errors.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify (HTTP 429 or a `THROTTLED` GraphQL error).
    #[error("Rate limited{}", format_retry_after(*.retry_after))]
    Throttled {
        /// Server-suggested wait, if the response carried one.
        retry_after: Option<Duration>,
    },

    /// Still throttled after the retry policy's last attempt.
    #[error("Rate limited, gave up after {attempts} attempts")]
    RetriesExhausted {
        /// Attempts made, including the first.
        attempts: u32,
    },

    /// HTTP 401.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// `userErrors` reported by a mutation.
    #[error("User error: {0}")]
    UserError(String),

    /// Endpoint or client setup failed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Classify for AdminShopifyError {
    fn retry_signal(&self) -> RetrySignal {
        match self {
            Self::Throttled { retry_after } => RetrySignal::Throttled {
                retry_after: *retry_after,
            },
            _ => RetrySignal::Fatal,
        }
    }
}

impl From<RetryError<Self>> for AdminShopifyError {
    fn from(err: RetryError<Self>) -> Self {
        match err {
            RetryError::Failed(err) => err,
            RetryError::Exhausted { attempts, .. } => Self::RetriesExhausted { attempts },
        }
    }
}

/// One entry of a response's `errors` array.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    pub message: String,
    /// `extensions.code`, e.g. `THROTTLED` or `ACCESS_DENIED`.
    pub code: Option<String>,
    pub locations: Vec<GraphQLErrorLocation>,
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    /// An error synthesized by the client rather than sent by Shopify.
    #[must_use]
    pub fn client(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            locations: vec![],
            path: vec![],
        }
    }

    /// Whether this error is Shopify's cost-based throttle.
    #[must_use]
    pub fn is_throttled(&self) -> bool {
        self.code.as_deref() == Some(THROTTLED_CODE)
    }
}

/// Position in the query text an error points at, 1-indexed.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    pub line: i64,
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_retry_after(retry_after: Option<Duration>) -> String {
    retry_after.map_or_else(String::new, |d| {
        format!(", retry after {} ms", d.as_millis())
    })
}
