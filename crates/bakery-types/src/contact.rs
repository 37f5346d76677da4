//! Messages submitted through the storefront contact form.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
	pub name: String,
	pub email: String,
	pub message: String,
}
