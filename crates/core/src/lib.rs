//! `bookstore-core`: identifiers, money and the domain error type shared by
//! every other crate. No IO, no store access.

pub mod error;
pub mod id;
pub mod money;

pub use error::{DomainError, DomainResult};
pub use id::{CustomerId, EmployeeId, Isbn, OrderId};
pub use money::Money;
