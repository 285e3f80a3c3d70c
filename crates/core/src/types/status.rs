//! Status enums for catalog rows and Shopify products.

use serde::{Deserialize, Serialize};

/// Result of processing one CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The row was applied (or its data fetched) successfully.
    Success,
    /// The row was deliberately not sent, or needed no change.
    Skipped(SkipReason),
    /// The SKU the row refers to does not exist in the store.
    NotFound,
    /// The row failed; the message describes the terminal error.
    Error(String),
}

impl Outcome {
    /// Coarse classification used for counting and for the status column.
    #[must_use]
    pub const fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success => OutcomeKind::Success,
            Self::Skipped(_) => OutcomeKind::Skipped,
            Self::NotFound => OutcomeKind::NotFound,
            Self::Error(_) => OutcomeKind::Error,
        }
    }

    /// Free-text detail for reports (empty for success and not found).
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Success | Self::NotFound => String::new(),
            Self::Skipped(reason) => reason.to_string(),
            Self::Error(message) => message.clone(),
        }
    }

    /// Convenience constructor for the "nothing to change" case.
    #[must_use]
    pub const fn no_update_needed() -> Self {
        Self::Skipped(SkipReason::NoUpdateNeeded)
    }

    /// Whether this outcome is an error.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success | Self::NotFound => write!(f, "{}", self.kind()),
            Self::Skipped(reason) => write!(f, "skipped: {reason}"),
            Self::Error(message) => write!(f, "error: {message}"),
        }
    }
}

/// Why a row was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// A column the job needs is missing or blank.
    MissingField(String),
    /// The supplier marks the product as out of stock.
    OutOfStock,
    /// The store already holds the desired value.
    NoUpdateNeeded,
    /// A column holds a value that cannot be interpreted.
    InvalidValue {
        /// Column name.
        column: String,
        /// Raw cell value.
        value: String,
    },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(column) => write!(f, "missing {column}"),
            Self::OutOfStock => write!(f, "out of stock"),
            Self::NoUpdateNeeded => write!(f, "no update needed"),
            Self::InvalidValue { column, value } => write!(f, "invalid {column}: {value:?}"),
        }
    }
}

/// Outcome classification without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Success,
    Skipped,
    NotFound,
    Error,
}

impl OutcomeKind {
    /// Stable lowercase tag written to status reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Skipped => "skipped",
            Self::NotFound => "not_found",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product publication status.
///
/// Maps to Shopify's `ProductStatus` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    Active,
    Archived,
    #[default]
    Draft,
}

/// Whether customers may buy a variant that is out of stock.
///
/// Maps to Shopify's `ProductVariantInventoryPolicy` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventoryPolicy {
    #[default]
    Deny,
    Continue,
}
