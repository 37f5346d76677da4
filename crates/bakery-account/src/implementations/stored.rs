//! User directory backed by [`StorageService`].
//!
//! Users live under `users:<id>`. A `user_emails:<lowercased email>` index enforces
//! unique emails; it is written with a create-only put before the user record.

use crate::{AccountError, TokenAuthority, UserDirectory};
use async_trait::async_trait;
use bakery_storage::{StorageError, StorageService};
use bakery_types::{Clock, Identity, Page, PageRequest, StorageKey, User, UserId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::ValidateEmail;

/// Data for registering a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
	pub name: String,
	pub email: String,
	#[serde(default)]
	pub phone: Option<String>,
	#[serde(default)]
	pub is_admin: bool,
}

pub struct StoredUserDirectory {
	storage: Arc<StorageService>,
	tokens: TokenAuthority,
	clock: Arc<dyn Clock>,
}

impl StoredUserDirectory {
	pub fn new(storage: Arc<StorageService>, tokens: TokenAuthority, clock: Arc<dyn Clock>) -> Self {
		Self {
			storage,
			tokens,
			clock,
		}
	}

	/// Adds a user. Emails are compared case-insensitively.
	pub async fn register_user(&self, new_user: NewUser) -> Result<User, AccountError> {
		let name = new_user.name.trim();
		if name.is_empty() {
			return Err(AccountError::InvalidUser("User name is required".into()));
		}
		let email = new_user.email.trim();
		if !email.validate_email() {
			return Err(AccountError::InvalidUser(format!(
				"Invalid email address: {}",
				email
			)));
		}
		let email_key = email.to_lowercase();

		let id = self.storage.next_id(StorageKey::Users).await?;
		match self
			.storage
			.insert_new(StorageKey::UserEmails.as_str(), &email_key, &id)
			.await
		{
			Ok(()) => {},
			Err(StorageError::AlreadyExists(_)) => {
				return Err(AccountError::DuplicateEmail(email.to_string()))
			},
			Err(e) => return Err(e.into()),
		}

		let user = User {
			id,
			name: name.to_string(),
			email: email.to_string(),
			phone: new_user.phone.filter(|p| !p.trim().is_empty()),
			is_admin: new_user.is_admin,
			created_at: self.clock.timestamp(),
		};
		self.storage
			.store(StorageKey::Users.as_str(), &id.to_string(), &user)
			.await?;

		tracing::info!(user_id = id, admin = user.is_admin, "Registered user");
		Ok(user)
	}

	pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountError> {
		let id: Option<UserId> = self
			.storage
			.retrieve_optional(StorageKey::UserEmails.as_str(), &email.trim().to_lowercase())
			.await?;
		match id {
			Some(id) => self.get_user(id).await,
			None => Ok(None),
		}
	}

	/// Grants or revokes administrator rights. Takes effect on the user's next request.
	pub async fn set_admin(&self, email: &str, is_admin: bool) -> Result<User, AccountError> {
		let mut user = self
			.find_by_email(email)
			.await?
			.ok_or_else(|| AccountError::UserNotFound(email.to_string()))?;
		user.is_admin = is_admin;
		self.storage
			.update(StorageKey::Users.as_str(), &user.id.to_string(), &user)
			.await?;
		tracing::info!(user_id = user.id, admin = is_admin, "Updated admin flag");
		Ok(user)
	}

	/// Mints a bearer token for the user with this email.
	pub async fn issue_token(&self, email: &str) -> Result<String, AccountError> {
		let user = self
			.find_by_email(email)
			.await?
			.ok_or_else(|| AccountError::UserNotFound(email.to_string()))?;
		Ok(self.tokens.issue(user.id))
	}

	async fn all_users(&self) -> Result<Vec<User>, AccountError> {
		let mut users: Vec<User> = self
			.storage
			.retrieve_all(StorageKey::Users.as_str())
			.await?;
		users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
		Ok(users)
	}
}

#[async_trait]
impl UserDirectory for StoredUserDirectory {
	async fn resolve_identity(&self, credential: Option<&str>) -> Result<Identity, AccountError> {
		let Some(credential) = credential else {
			return Ok(Identity::Anonymous);
		};

		let user_id = match self.tokens.verify(credential) {
			Ok(id) => id,
			Err(e) => {
				tracing::debug!(error = %e, "Credential rejected");
				return Ok(Identity::Guest);
			},
		};

		Ok(match self.get_user(user_id).await? {
			Some(user) if user.is_admin => Identity::Admin(user.id),
			Some(user) => Identity::User(user.id),
			None => {
				tracing::debug!(user_id, "Credential for unknown user");
				Identity::Guest
			},
		})
	}

	async fn user_exists(&self, id: UserId) -> Result<bool, AccountError> {
		Ok(self
			.storage
			.exists(StorageKey::Users.as_str(), &id.to_string())
			.await?)
	}

	async fn is_admin(&self, id: UserId) -> Result<bool, AccountError> {
		Ok(self.get_user(id).await?.is_some_and(|u| u.is_admin))
	}

	async fn get_user(&self, id: UserId) -> Result<Option<User>, AccountError> {
		Ok(self
			.storage
			.retrieve_optional(StorageKey::Users.as_str(), &id.to_string())
			.await?)
	}

	async fn count_users(&self) -> Result<u64, AccountError> {
		Ok(self.storage.count(StorageKey::Users.as_str()).await?)
	}

	async fn list_users(&self, page: PageRequest) -> Result<Page<User>, AccountError> {
		Ok(page.paginate(self.all_users().await?))
	}
}
