//! Contact form submissions.
//!
//! Messages are validated and handed to a [`NotificationSink`]. Delivery failures are
//! logged and never reported to the sender.

use async_trait::async_trait;
use bakery_types::{BakeryError, ContactMessage, ContactRequest, ContactResponse};
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;
use validator::ValidateEmail;

/// Longest accepted contact message body.
pub const MAX_MESSAGE_LEN: usize = 5_000;

#[derive(Debug, Error)]
pub enum NotificationError {
	#[error("Notification delivery failed: {0}")]
	Delivery(String),
}

/// Destination for contact form messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
	async fn submit(&self, message: &ContactMessage) -> Result<(), NotificationError>;
}

/// Writes contact messages to the log.
pub struct LogNotificationSink;

#[async_trait]
impl NotificationSink for LogNotificationSink {
	async fn submit(&self, message: &ContactMessage) -> Result<(), NotificationError> {
		tracing::info!(
			from = %message.email,
			name = %message.name,
			length = message.message.len(),
			"Contact message received"
		);
		Ok(())
	}
}

pub struct ContactService {
	sink: Arc<dyn NotificationSink>,
}

impl ContactService {
	pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
		Self { sink }
	}

	#[instrument(skip_all)]
	pub async fn submit(&self, request: ContactRequest) -> Result<ContactResponse, BakeryError> {
		let message = validate(request)?;
		if let Err(e) = self.sink.submit(&message).await {
			tracing::warn!(error = %e, "Failed to deliver contact message");
		}
		Ok(ContactResponse {
			message: "Thank you for your message! We will get back to you soon.".to_string(),
		})
	}
}

fn validate(request: ContactRequest) -> Result<ContactMessage, BakeryError> {
	let field = |value: Option<String>, name: &str| {
		value
			.map(|v| v.trim().to_string())
			.filter(|v| !v.is_empty())
			.ok_or_else(|| BakeryError::invalid_input(format!("{} is required", name)))
	};
	let name = field(request.name, "name")?;
	let email = field(request.email, "email")?;
	let message = field(request.message, "message")?;

	if !email.validate_email() {
		return Err(BakeryError::invalid_input(format!(
			"Invalid email address: {}",
			email
		)));
	}
	if message.chars().count() > MAX_MESSAGE_LEN {
		return Err(BakeryError::invalid_input(format!(
			"message must be at most {} characters",
			MAX_MESSAGE_LEN
		)));
	}
	Ok(ContactMessage {
		name,
		email,
		message,
	})
}
