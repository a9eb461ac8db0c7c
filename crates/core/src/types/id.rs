//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. IDs are strings
//! because both the catalog (`"1"`) and the Pi platform (payment identifiers,
//! user uids) hand them out as opaque text.

use chrono::Utc;
use rand::Rng;

/// Number of random base36 characters appended to generated IDs.
const RANDOM_SUFFIX_LEN: usize = 9;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use foodpi_core::define_id;
/// define_id!(CourierId);
/// define_id!(TableId);
///
/// let courier = CourierId::new("c-1");
/// let table = TableId::new("c-1");
///
/// // These are different types, so this won't compile:
/// // let _: CourierId = table;
/// assert_eq!(courier.as_str(), table.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(RestaurantId);
define_id!(MenuItemId);
define_id!(OrderId);
define_id!(ReviewId);
define_id!(
    /// Pi Network user uid (app-scoped).
    UserId
);
define_id!(
    /// Pi Network payment identifier.
    PaymentId
);

impl OrderId {
    /// Generate a fresh order ID: `order_<unix-millis>_<9 base36 chars>`.
    #[must_use]
    pub fn generate() -> Self {
        Self(prefixed_id("order"))
    }
}

impl ReviewId {
    /// Generate a fresh review ID: `review_<unix-millis>_<9 base36 chars>`.
    #[must_use]
    pub fn generate() -> Self {
        Self(prefixed_id("review"))
    }
}

fn prefixed_id(prefix: &str) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..RANDOM_SUFFIX_LEN)
        .map(|_| char::from(BASE36[rng.random_range(0..BASE36.len())]))
        .collect();

    format!("{prefix}_{}_{suffix}", Utc::now().timestamp_millis())
}
