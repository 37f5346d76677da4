//! Shared types for the bakery order service.
//!
//! Every crate in the workspace speaks in terms of the types defined here: orders and
//! their status, caller identity, catalog entries, users, pagination, the error taxonomy
//! and the HTTP error envelope.

/// Request and response types for the HTTP API.
pub mod api;
/// Cakes and customization options.
pub mod catalog;
/// Time source abstraction.
pub mod clock;
/// Contact form messages.
pub mod contact;
/// The shared error taxonomy.
pub mod error;
/// Caller identity.
pub mod identity;
/// Orders, order status and order views.
pub mod order;
/// Page requests and paged results.
pub mod pagination;
/// Registry trait for self-registering backends.
pub mod registry;
/// Redacting wrapper for secrets.
pub mod secret_string;
/// Administrator dashboard statistics.
pub mod stats;
/// Storage namespaces.
pub mod storage;
/// Directory users.
pub mod user;
/// Configuration schema validation.
pub mod validation;

pub use api::*;
pub use catalog::*;
pub use clock::*;
pub use contact::*;
pub use error::*;
pub use identity::*;
pub use order::*;
pub use pagination::*;
pub use registry::ImplementationRegistry;
pub use secret_string::SecretString;
pub use stats::*;
pub use storage::*;
pub use user::*;
pub use validation::*;

/// Identifier of an order.
pub type OrderId = u64;
/// Identifier of a directory user.
pub type UserId = u64;
/// Identifier of a cake.
pub type CakeId = u64;
/// Identifier of a customization option.
pub type CustomizationId = u64;
