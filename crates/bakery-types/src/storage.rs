//! Storage namespaces used by the bakery components.

use std::str::FromStr;

/// Namespaces under which records are stored.
///
/// Full keys have the form `namespace:id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
	/// Orders keyed by order id
	Orders,
	/// Users keyed by user id
	Users,
	/// Lowercased email to user id index
	UserEmails,
	/// Cakes keyed by cake id
	Cakes,
	/// Customization options keyed by option id
	Customizations,
	/// Id sequences keyed by the namespace they allocate for
	Sequences,
}

impl StorageKey {
	/// Returns the string representation of the storage key.
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageKey::Orders => "orders",
			StorageKey::Users => "users",
			StorageKey::UserEmails => "user_emails",
			StorageKey::Cakes => "cakes",
			StorageKey::Customizations => "customizations",
			StorageKey::Sequences => "sequences",
		}
	}

	/// Returns an iterator over all StorageKey variants.
	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::Orders,
			Self::Users,
			Self::UserEmails,
			Self::Cakes,
			Self::Customizations,
			Self::Sequences,
		]
		.into_iter()
	}
}

impl FromStr for StorageKey {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::all().find(|key| key.as_str() == s).ok_or(())
	}
}

impl From<StorageKey> for &'static str {
	fn from(key: StorageKey) -> Self {
		key.as_str()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_every_key() {
		for key in StorageKey::all() {
			assert_eq!(key.as_str().parse::<StorageKey>(), Ok(key));
		}
		assert!("intents".parse::<StorageKey>().is_err());
	}
}
