//! Contact form endpoint.

use super::failed;
use bakery_core::BakeryEngine;
use bakery_types::{APIError, ContactRequest, ContactResponse};

/// Handles POST /api/contact.
pub async fn submit(
	engine: &BakeryEngine,
	request: ContactRequest,
) -> Result<ContactResponse, APIError> {
	engine
		.contact()
		.submit(request)
		.await
		.map_err(|e| failed("Contact submission", e))
}
