//! Newtype IDs for Shopify global identifiers.
//!
//! Shopify addresses every Admin API object with a global ID of the form
//! `gid://shopify/<Type>/<number>`. Use the `define_gid!` macro to create
//! type-safe wrappers that prevent accidentally passing a location ID where
//! an inventory item ID is expected.

use serde::{Deserialize, Serialize};

/// Prefix shared by every Shopify global ID.
pub const GID_PREFIX: &str = "gid://shopify/";

/// Macro to define a type-safe Shopify global ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `from_numeric()`, `as_str()`, `numeric_id()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use catalog_sync_core::define_gid;
/// define_gid!(ProductId, "Product");
/// define_gid!(LocationId, "Location");
///
/// let product = ProductId::from_numeric(42);
/// assert_eq!(product.as_str(), "gid://shopify/Product/42");
///
/// // These are different types, so this won't compile:
/// // let _: LocationId = product;
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident, $kind:literal) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Shopify object type name used in the global ID.
            pub const KIND: &'static str = $kind;

            /// Wrap an existing global ID string.
            #[must_use]
            pub fn new(gid: impl Into<String>) -> Self {
                Self(gid.into())
            }

            /// Build a global ID from the numeric legacy resource ID.
            #[must_use]
            pub fn from_numeric(id: u64) -> Self {
                Self(format!("{}{}/{}", $crate::types::id::GID_PREFIX, $kind, id))
            }

            /// Get the underlying global ID string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Numeric tail of the global ID, if it has one.
            #[must_use]
            pub fn numeric_id(&self) -> Option<u64> {
                $crate::types::id::numeric_tail(&self.0)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(gid: String) -> Self {
                Self(gid)
            }
        }

        impl From<&str> for $name {
            fn from(gid: &str) -> Self {
                Self(gid.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Parse the numeric tail of a global ID (`gid://shopify/Product/42` -> 42).
///
/// Query strings such as `?inventory_item_id=1` are ignored.
#[must_use]
pub fn numeric_tail(gid: &str) -> Option<u64> {
    let path = gid.strip_prefix(GID_PREFIX)?;
    let path = path.split('?').next().unwrap_or(path);
    path.rsplit('/').next()?.parse().ok()
}

define_gid!(ProductId, "Product");
define_gid!(VariantId, "ProductVariant");
define_gid!(InventoryItemId, "InventoryItem");
define_gid!(InventoryLevelId, "InventoryLevel");
define_gid!(LocationId, "Location");

/// A stock keeping unit as it appears in the supplier CSVs.
///
/// Several variants (one per size) usually share one SKU.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Create a SKU, trimming surrounding whitespace.
    ///
    /// Returns `None` for a blank value.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    /// Get the SKU string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Admin API search expression matching this SKU exactly.
    #[must_use]
    pub fn search_query(&self) -> String {
        let escaped = self.0.replace('\\', "\\\\").replace('"', "\\\"");
        format!("sku:\"{escaped}\"")
    }
}

impl std::fmt::Display for Sku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Sku> for String {
    fn from(sku: Sku) -> Self {
        sku.0
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
