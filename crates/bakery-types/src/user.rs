//! Directory users as seen by the core.

use crate::UserId;
use serde::{Deserialize, Serialize};

/// A registered storefront user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	pub id: UserId,
	pub name: String,
	/// Unique across the directory.
	pub email: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
	#[serde(default)]
	pub is_admin: bool,
	/// Unix seconds.
	pub created_at: u64,
}

/// A user row in the administrator listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
	#[serde(flatten)]
	pub user: User,
	/// Number of orders owned by this user.
	pub order_count: u64,
}
