//! Strongly-typed identifiers used across the domain.
//!
//! Books are identified by ISBN, actors by stable string ids such as
//! `customer::0`. Order ids are a strictly increasing sequence and render as
//! `order_<n>`, which is also the name of the order entity in the knowledge
//! store.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// ISBN of a book (stable identity of an inventory row).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Isbn(String);

/// Identifier of a customer actor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

/// Identifier of an employee actor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create an identifier, rejecting blank input.
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(DomainError::invalid_id(format!("{} cannot be empty", $name)));
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Name of the matching knowledge-store entity (`::` becomes `_`).
            pub fn entity_name(&self) -> String {
                self.0.replace("::", "_")
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_string_newtype!(Isbn, "Isbn");
impl_string_newtype!(CustomerId, "CustomerId");
impl_string_newtype!(EmployeeId, "EmployeeId");

impl CustomerId {
    /// Generated id for the `index`-th customer of a run.
    pub fn numbered(index: usize) -> Self {
        Self(format!("customer::{index}"))
    }
}

impl EmployeeId {
    /// Generated id for the `index`-th employee of a run.
    pub fn numbered(index: usize) -> Self {
        Self(format!("employee::{index}"))
    }
}

/// Identifier of a purchase order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    const PREFIX: &'static str = "order_";

    pub fn new(sequence: u64) -> Self {
        Self(sequence)
    }

    pub fn sequence(&self) -> u64 {
        self.0
    }

    /// Parse an order entity name (`order_<n>`), if it is one.
    pub fn parse_entity_name(name: &str) -> Option<Self> {
        name.strip_prefix(Self::PREFIX)?.parse().ok().map(Self)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

impl FromStr for OrderId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_entity_name(s)
            .ok_or_else(|| DomainError::invalid_id(format!("OrderId: expected order_<n>, got '{s}'")))
    }
}
