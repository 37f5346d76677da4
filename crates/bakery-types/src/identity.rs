//! Caller identity.

use crate::{BakeryError, UserId};
use serde::{Deserialize, Serialize};

/// Who is making a request.
///
/// `Anonymous` means no credential was presented; `Guest` means one was presented but
/// could not be verified. Both are treated the same by operations that need a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "user_id", rename_all = "lowercase")]
pub enum Identity {
	Anonymous,
	Guest,
	User(UserId),
	Admin(UserId),
}

impl Identity {
	/// The verified user behind this identity, if any.
	pub fn user_id(&self) -> Option<UserId> {
		match self {
			Identity::User(id) | Identity::Admin(id) => Some(*id),
			Identity::Anonymous | Identity::Guest => None,
		}
	}

	pub fn is_admin(&self) -> bool {
		matches!(self, Identity::Admin(_))
	}

	/// Returns the user id or fails with `Unauthenticated`.
	pub fn require_user(&self) -> Result<UserId, BakeryError> {
		self.user_id().ok_or(BakeryError::Unauthenticated)
	}

	/// Returns the admin's user id, failing with `Unauthenticated` for callers without a
	/// verified credential and `Forbidden` for regular users.
	pub fn require_admin(&self) -> Result<UserId, BakeryError> {
		match self {
			Identity::Admin(id) => Ok(*id),
			Identity::User(_) => Err(BakeryError::forbidden("Admin access required")),
			Identity::Anonymous | Identity::Guest => Err(BakeryError::Unauthenticated),
		}
	}

	/// Whether this caller may read a record owned by `owner`.
	///
	/// Admins read everything. Users read only their own records, which excludes guest
	/// records.
	pub fn can_read(&self, owner: Option<UserId>) -> bool {
		match self {
			Identity::Admin(_) => true,
			Identity::User(id) => owner == Some(*id),
			Identity::Anonymous | Identity::Guest => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_require_admin() {
		assert_eq!(Identity::Admin(1).require_admin().unwrap(), 1);
		assert!(matches!(
			Identity::User(2).require_admin(),
			Err(BakeryError::Forbidden(_))
		));
		assert_eq!(
			Identity::Guest.require_admin(),
			Err(BakeryError::Unauthenticated)
		);
		assert_eq!(
			Identity::Anonymous.require_admin(),
			Err(BakeryError::Unauthenticated)
		);
	}

	#[test]
	fn test_can_read() {
		assert!(Identity::Admin(1).can_read(None));
		assert!(Identity::Admin(1).can_read(Some(7)));
		assert!(Identity::User(7).can_read(Some(7)));
		assert!(!Identity::User(9).can_read(Some(7)));
		assert!(!Identity::User(7).can_read(None));
		assert!(!Identity::Guest.can_read(None));
	}
}
