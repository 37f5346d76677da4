//! Order endpoints for customers.
//!
//! Creation is open to every caller; guests get an order without an owner. Reads
//! require a verified user and are limited to the caller's own orders unless the
//! caller is an administrator.

use super::failed;
use bakery_core::BakeryEngine;
use bakery_types::{APIError, CreateOrderRequest, Identity, Order, OrderId};

/// Handles POST /api/orders.
pub async fn create_order(
	engine: &BakeryEngine,
	identity: &Identity,
	request: CreateOrderRequest,
) -> Result<Order, APIError> {
	engine
		.lifecycle()
		.create_order(identity, request)
		.await
		.map_err(|e| failed("Order creation", e))
}

/// Handles GET /api/orders/{id}.
pub async fn get_order(
	engine: &BakeryEngine,
	identity: &Identity,
	id: OrderId,
) -> Result<Order, APIError> {
	engine
		.lifecycle()
		.get_order(identity, id)
		.await
		.map_err(|e| failed("Order retrieval", e))
}

/// Handles GET /api/orders/my-orders.
pub async fn my_orders(engine: &BakeryEngine, identity: &Identity) -> Result<Vec<Order>, APIError> {
	engine
		.lifecycle()
		.list_my_orders(identity)
		.await
		.map_err(|e| failed("Order listing", e))
}
