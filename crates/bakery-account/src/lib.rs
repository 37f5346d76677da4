//! User directory and caller identity for the bakery order service.
//!
//! The core only reads users. Registration and admin promotion exist for the seeding
//! and administration tooling.

use async_trait::async_trait;
use bakery_storage::StorageError;
use bakery_types::{BakeryError, Identity, Page, PageRequest, User, UserId};
use thiserror::Error;

pub mod token;

/// Re-export implementations
pub mod implementations {
	pub mod stored;
}

pub use implementations::stored::{NewUser, StoredUserDirectory};
pub use token::TokenAuthority;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// The credential is malformed or its signature does not match.
	#[error("Invalid token: {0}")]
	InvalidToken(String),
	/// The credential was valid but has expired.
	#[error("Token expired")]
	TokenExpired,
	/// No user matches the lookup.
	#[error("User not found: {0}")]
	UserNotFound(String),
	/// Another user already registered this email.
	#[error("Email already registered: {0}")]
	DuplicateEmail(String),
	/// User data failed validation.
	#[error("{0}")]
	InvalidUser(String),
	/// The backing store failed.
	#[error("Storage error: {0}")]
	Storage(#[from] StorageError),
}

impl From<AccountError> for BakeryError {
	fn from(err: AccountError) -> Self {
		match err {
			AccountError::InvalidToken(_) | AccountError::TokenExpired => {
				BakeryError::Unauthenticated
			},
			AccountError::UserNotFound(_) => BakeryError::not_found(err.to_string()),
			AccountError::DuplicateEmail(_) => BakeryError::Conflict(err.to_string()),
			AccountError::InvalidUser(message) => BakeryError::InvalidInput(message),
			AccountError::Storage(e) => e.into(),
		}
	}
}

/// Read access to the user directory.
#[async_trait]
pub trait UserDirectory: Send + Sync {
	/// Resolves an optional bearer credential to a caller identity.
	///
	/// No credential gives `Anonymous`. A credential that cannot be verified, or whose
	/// user no longer exists, gives `Guest`. Only store failures are errors.
	async fn resolve_identity(&self, credential: Option<&str>) -> Result<Identity, AccountError>;

	async fn user_exists(&self, id: UserId) -> Result<bool, AccountError>;

	/// Whether the user is currently an administrator. Unknown users are not.
	async fn is_admin(&self, id: UserId) -> Result<bool, AccountError>;

	async fn get_user(&self, id: UserId) -> Result<Option<User>, AccountError>;

	async fn count_users(&self) -> Result<u64, AccountError>;

	/// Users ordered newest first, ties broken by id descending.
	async fn list_users(&self, page: PageRequest) -> Result<Page<User>, AccountError>;
}
