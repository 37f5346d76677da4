//! Signed bearer tokens.
//!
//! A token reads `v1.<user_id>.<expires_at>.<mac>` where `mac` is the hex SHA3-256 of
//! the secret followed by the unsigned prefix `v1.<user_id>.<expires_at>`.

use crate::AccountError;
use bakery_types::{Clock, SecretString, UserId};
use sha3::{Digest, Sha3_256};
use std::sync::Arc;

const VERSION: &str = "v1";

/// Issues and verifies bearer tokens.
pub struct TokenAuthority {
	secret: SecretString,
	ttl_seconds: u64,
	clock: Arc<dyn Clock>,
}

impl TokenAuthority {
	pub fn new(secret: SecretString, ttl_seconds: u64, clock: Arc<dyn Clock>) -> Self {
		Self {
			secret,
			ttl_seconds,
			clock,
		}
	}

	/// Mints a token for `user_id` that expires after the configured lifetime.
	pub fn issue(&self, user_id: UserId) -> String {
		let expires_at = self.clock.timestamp().saturating_add(self.ttl_seconds);
		let payload = format!("{}.{}.{}", VERSION, user_id, expires_at);
		let mac = self.mac(&payload);
		format!("{}.{}", payload, mac)
	}

	/// Checks the signature and expiry and returns the user the token was issued to.
	pub fn verify(&self, token: &str) -> Result<UserId, AccountError> {
		let (payload, mac) = token
			.rsplit_once('.')
			.ok_or_else(|| AccountError::InvalidToken("missing signature".into()))?;

		let mut parts = payload.split('.');
		let (Some(version), Some(user_id), Some(expires_at), None) =
			(parts.next(), parts.next(), parts.next(), parts.next())
		else {
			return Err(AccountError::InvalidToken("malformed token".into()));
		};
		if version != VERSION {
			return Err(AccountError::InvalidToken(format!(
				"unsupported version {}",
				version
			)));
		}

		if !constant_time_eq(self.mac(payload).as_bytes(), mac.as_bytes()) {
			return Err(AccountError::InvalidToken("signature mismatch".into()));
		}

		let user_id: UserId = user_id
			.parse()
			.map_err(|_| AccountError::InvalidToken("bad user id".into()))?;
		let expires_at: u64 = expires_at
			.parse()
			.map_err(|_| AccountError::InvalidToken("bad expiry".into()))?;
		if self.clock.timestamp() >= expires_at {
			return Err(AccountError::TokenExpired);
		}

		Ok(user_id)
	}

	fn mac(&self, payload: &str) -> String {
		let mut hasher = Sha3_256::new();
		hasher.update(self.secret.expose_bytes());
		hasher.update(payload.as_bytes());
		hex::encode(hasher.finalize())
	}
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
	if a.len() != b.len() {
		return false;
	}
	a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
