//! Administrator endpoints.

use super::failed;
use bakery_core::BakeryEngine;
use bakery_types::{
	APIError, AdminOrdersResponse, AdminUsersResponse, BakeryError, Cake, CakeChangeResponse,
	CakeId, CakeRequest, DashboardStats, Identity, ListQuery, OrderId, StatusChangeResponse,
	UpdateStatusRequest,
};

/// Handles GET /api/admin/dashboard/stats.
pub async fn dashboard_stats(
	engine: &BakeryEngine,
	identity: &Identity,
) -> Result<DashboardStats, APIError> {
	engine
		.admin()
		.dashboard_stats(identity)
		.await
		.map_err(|e| failed("Dashboard stats", e))
}

/// Handles GET /api/admin/orders.
pub async fn list_orders(
	engine: &BakeryEngine,
	identity: &Identity,
	query: &ListQuery,
) -> Result<AdminOrdersResponse, APIError> {
	engine
		.admin()
		.list_orders(identity, query)
		.await
		.map(AdminOrdersResponse::from)
		.map_err(|e| failed("Admin order listing", e))
}

/// Handles PUT /api/admin/orders/{id}/status.
pub async fn update_status(
	engine: &BakeryEngine,
	identity: &Identity,
	id: OrderId,
	request: UpdateStatusRequest,
) -> Result<StatusChangeResponse, APIError> {
	identity
		.require_admin()
		.map_err(|e| failed("Status update", e))?;
	let status = request
		.status
		.as_deref()
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.ok_or_else(|| failed("Status update", BakeryError::invalid_input("Status is required")))?;

	let order = engine
		.lifecycle()
		.update_status(identity, id, status)
		.await
		.map_err(|e| failed("Status update", e))?;
	Ok(StatusChangeResponse {
		message: "Order status updated successfully".to_string(),
		order,
	})
}

/// Handles GET /api/admin/users.
pub async fn list_users(
	engine: &BakeryEngine,
	identity: &Identity,
	query: &ListQuery,
) -> Result<AdminUsersResponse, APIError> {
	engine
		.admin()
		.list_users(identity, query)
		.await
		.map(AdminUsersResponse::from)
		.map_err(|e| failed("User listing", e))
}

/// Handles GET /api/admin/cakes.
pub async fn list_cakes(engine: &BakeryEngine, identity: &Identity) -> Result<Vec<Cake>, APIError> {
	engine
		.catalog_service()
		.list_cakes_admin(identity)
		.await
		.map_err(|e| failed("Admin cake listing", e))
}

/// Handles POST /api/admin/cakes.
pub async fn create_cake(
	engine: &BakeryEngine,
	identity: &Identity,
	request: CakeRequest,
) -> Result<CakeChangeResponse, APIError> {
	let cake = engine
		.catalog_service()
		.create_cake(identity, request)
		.await
		.map_err(|e| failed("Cake creation", e))?;
	Ok(CakeChangeResponse {
		message: "Cake created successfully".to_string(),
		cake,
	})
}

/// Handles PUT /api/admin/cakes/{id}.
pub async fn update_cake(
	engine: &BakeryEngine,
	identity: &Identity,
	id: CakeId,
	request: CakeRequest,
) -> Result<CakeChangeResponse, APIError> {
	let cake = engine
		.catalog_service()
		.update_cake(identity, id, request)
		.await
		.map_err(|e| failed("Cake update", e))?;
	Ok(CakeChangeResponse {
		message: "Cake updated successfully".to_string(),
		cake,
	})
}

/// Handles DELETE /api/admin/cakes/{id}.
pub async fn delete_cake(
	engine: &BakeryEngine,
	identity: &Identity,
	id: CakeId,
) -> Result<serde_json::Value, APIError> {
	engine
		.catalog_service()
		.remove_cake(identity, id)
		.await
		.map_err(|e| failed("Cake deletion", e))?;
	Ok(serde_json::json!({ "message": "Cake deleted successfully" }))
}
