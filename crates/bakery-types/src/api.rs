//! Request and response types for the bakery HTTP API.
//!
//! Request bodies keep every field optional so that missing values are reported as
//! validation failures with a useful message instead of a deserialization error.

use crate::{
	AdminOrderView, BakeryError, Cake, CakeId, CustomizationId, Order, Page, UserSummary,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of `POST /orders`.
///
/// Any client-supplied total is ignored; only the fields below are read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOrderRequest {
	pub cake_id: Option<CakeId>,
	pub quantity: Option<i64>,
	pub customer_name: Option<String>,
	pub customer_email: Option<String>,
	pub customer_phone: Option<String>,
	/// `YYYY-MM-DD`.
	pub delivery_date: Option<String>,
	pub special_requests: Option<String>,
	#[serde(default, alias = "customizations")]
	pub selected_customizations: Vec<CustomizationId>,
}

/// Body of `PUT /admin/orders/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
	pub status: Option<String>,
}

/// Body of `POST /admin/cakes` and `PUT /admin/cakes/{id}`.
///
/// Creation needs every field except `image_url`. An update changes only the
/// fields present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CakeRequest {
	pub name: Option<String>,
	pub description: Option<String>,
	#[serde(alias = "unit_price")]
	pub price: Option<Decimal>,
	pub image_url: Option<String>,
}

/// Response of the admin cake create and update endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CakeChangeResponse {
	pub message: String,
	pub cake: Cake,
}

/// Body of `POST /contact`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactRequest {
	pub name: Option<String>,
	pub email: Option<String>,
	pub message: Option<String>,
}

/// Query string for paginated listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
	pub page: Option<u32>,
	pub per_page: Option<u32>,
	pub status: Option<String>,
}

/// Response of `POST /contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
	pub message: String,
}

/// Response of `PUT /admin/orders/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChangeResponse {
	pub message: String,
	pub order: Order,
}

/// Response of `GET /admin/orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminOrdersResponse {
	pub orders: Vec<AdminOrderView>,
	pub total: u64,
	pub pages: u64,
	pub current_page: u32,
}

impl From<Page<AdminOrderView>> for AdminOrdersResponse {
	fn from(page: Page<AdminOrderView>) -> Self {
		Self {
			orders: page.items,
			total: page.total,
			pages: page.pages,
			current_page: page.current_page,
		}
	}
}

/// Response of `GET /admin/users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUsersResponse {
	pub users: Vec<UserSummary>,
	pub total: u64,
	pub pages: u64,
	pub current_page: u32,
}

impl From<Page<UserSummary>> for AdminUsersResponse {
	fn from(page: Page<UserSummary>) -> Self {
		Self {
			users: page.items,
			total: page.total,
			pages: page.pages,
			current_page: page.current_page,
		}
	}
}

/// API error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Stable error code
	pub error: String,
	/// Human-readable description
	pub message: String,
	/// Additional error context
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<serde_json::Value>,
	/// Suggested retry delay in seconds
	#[serde(rename = "retryAfter", skip_serializing_if = "Option::is_none")]
	pub retry_after: Option<u64>,
}

/// Structured API error type with HTTP status mapping.
#[derive(Debug)]
pub enum APIError {
	/// Malformed request body or query (400)
	BadRequest { error_type: String, message: String },
	/// Missing or unverifiable credential (401)
	Unauthorized { error_type: String, message: String },
	/// Authenticated but not allowed (403)
	Forbidden { error_type: String, message: String },
	/// Entity not found (404)
	NotFound { error_type: String, message: String },
	/// Request body over the configured limit (413)
	PayloadTooLarge { error_type: String, message: String },
	/// State conflict, including rejected status transitions (409)
	Conflict {
		error_type: String,
		message: String,
		details: Option<serde_json::Value>,
	},
	/// Validation failures (422)
	UnprocessableEntity {
		error_type: String,
		message: String,
		details: Option<serde_json::Value>,
	},
	/// Store or collaborator unavailable (503)
	ServiceUnavailable {
		error_type: String,
		message: String,
		retry_after: Option<u64>,
	},
}

impl APIError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			APIError::BadRequest { .. } => 400,
			APIError::Unauthorized { .. } => 401,
			APIError::Forbidden { .. } => 403,
			APIError::NotFound { .. } => 404,
			APIError::PayloadTooLarge { .. } => 413,
			APIError::Conflict { .. } => 409,
			APIError::UnprocessableEntity { .. } => 422,
			APIError::ServiceUnavailable { .. } => 503,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		let (error, message, details, retry_after) = match self {
			APIError::BadRequest {
				error_type,
				message,
			}
			| APIError::Unauthorized {
				error_type,
				message,
			}
			| APIError::Forbidden {
				error_type,
				message,
			}
			| APIError::NotFound {
				error_type,
				message,
			}
			| APIError::PayloadTooLarge {
				error_type,
				message,
			} => (error_type, message, None, None),
			APIError::Conflict {
				error_type,
				message,
				details,
			}
			| APIError::UnprocessableEntity {
				error_type,
				message,
				details,
			} => (error_type, message, details.clone(), None),
			APIError::ServiceUnavailable {
				error_type,
				message,
				retry_after,
			} => (error_type, message, None, *retry_after),
		};
		ErrorResponse {
			error: error.clone(),
			message: message.clone(),
			details,
			retry_after,
		}
	}

	pub fn bad_request(message: impl Into<String>) -> Self {
		APIError::BadRequest {
			error_type: "BAD_REQUEST".to_string(),
			message: message.into(),
		}
	}

	pub fn payload_too_large(message: impl Into<String>) -> Self {
		APIError::PayloadTooLarge {
			error_type: "PAYLOAD_TOO_LARGE".to_string(),
			message: message.into(),
		}
	}
}

impl From<BakeryError> for APIError {
	fn from(err: BakeryError) -> Self {
		let error_type = err.code().to_string();
		let message = err.to_string();
		match err {
			BakeryError::InvalidInput(_) => APIError::UnprocessableEntity {
				error_type,
				message,
				details: None,
			},
			BakeryError::NotFound(_) => APIError::NotFound {
				error_type,
				message,
			},
			BakeryError::Unauthenticated => APIError::Unauthorized {
				error_type,
				message,
			},
			BakeryError::Forbidden(_) => APIError::Forbidden {
				error_type,
				message,
			},
			BakeryError::InvalidTransition { from, to } => APIError::Conflict {
				error_type,
				message,
				details: Some(serde_json::json!({ "from": from, "to": to })),
			},
			BakeryError::Conflict(_) => APIError::Conflict {
				error_type,
				message,
				details: None,
			},
			BakeryError::Unavailable(_) => APIError::ServiceUnavailable {
				error_type,
				message,
				retry_after: None,
			},
		}
	}
}

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let response = self.to_error_response();
		write!(f, "{} ({}): {}", response.error, self.status_code(), response.message)
	}
}

impl std::error::Error for APIError {}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for APIError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status = StatusCode::from_u16(self.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		(status, Json(self.to_error_response())).into_response()
	}
}
