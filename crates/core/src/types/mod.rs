//! Core types for the catalog sync jobs.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod row;
pub mod status;

pub use id::*;
pub use money::{CurrencyCode, Money, MoneyError, parse_amount, round_cost};
pub use row::Row;
pub use status::*;
