//! Order lifecycle handler.
//!
//! Validates order creation input, prices it, writes it through the repository, and
//! applies ownership and admin checks on reads and status changes.

use crate::locks::KeyedLocks;
use crate::repository::{OrderDraft, OrderRepository};
use crate::state::OrderStateMachine;
use bakery_catalog::{CatalogError, CatalogStore};
use bakery_pricing::PricingEngine;
use bakery_types::{
	BakeryError, CakeId, Clock, CreateOrderRequest, Identity, Order, OrderId, OrderStatus,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::instrument;
use validator::ValidateEmail;

/// Longest accepted customer name and email.
pub const MAX_NAME_LEN: usize = 100;
/// Longest accepted customer phone number.
pub const MAX_PHONE_LEN: usize = 20;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Creation input after field validation, before any catalog lookup.
struct ValidatedOrder {
	cake_id: u64,
	quantity: i64,
	customer_name: String,
	customer_email: String,
	customer_phone: String,
	delivery_date: NaiveDate,
	special_requests: Option<String>,
}

fn required(value: Option<&str>, field: &str) -> Result<String, BakeryError> {
	match value.map(str::trim) {
		Some(v) if !v.is_empty() => Ok(v.to_string()),
		_ => Err(BakeryError::invalid_input(format!("{} is required", field))),
	}
}

fn within(value: String, field: &str, max: usize) -> Result<String, BakeryError> {
	if value.chars().count() > max {
		return Err(BakeryError::invalid_input(format!(
			"{} must be at most {} characters",
			field, max
		)));
	}
	Ok(value)
}

/// Handler for order creation, retrieval and status changes.
pub struct OrderLifecycle {
	catalog: Arc<dyn CatalogStore>,
	pricing: Arc<PricingEngine>,
	orders: Arc<OrderRepository>,
	state_machine: Arc<OrderStateMachine>,
	/// Shared with cake removal so a cake cannot disappear under a new order.
	cake_locks: Arc<KeyedLocks<CakeId>>,
	clock: Arc<dyn Clock>,
}

impl OrderLifecycle {
	pub fn new(
		catalog: Arc<dyn CatalogStore>,
		pricing: Arc<PricingEngine>,
		orders: Arc<OrderRepository>,
		state_machine: Arc<OrderStateMachine>,
		cake_locks: Arc<KeyedLocks<CakeId>>,
		clock: Arc<dyn Clock>,
	) -> Self {
		Self {
			catalog,
			pricing,
			orders,
			state_machine,
			cake_locks,
			clock,
		}
	}

	fn validate(&self, input: &CreateOrderRequest) -> Result<ValidatedOrder, BakeryError> {
		let cake_id = input
			.cake_id
			.ok_or_else(|| BakeryError::invalid_input("cake_id is required"))?;
		let quantity = input
			.quantity
			.ok_or_else(|| BakeryError::invalid_input("quantity is required"))?;
		let customer_name = within(
			required(input.customer_name.as_deref(), "customer_name")?,
			"customer_name",
			MAX_NAME_LEN,
		)?;
		let customer_email = within(
			required(input.customer_email.as_deref(), "customer_email")?,
			"customer_email",
			MAX_NAME_LEN,
		)?;
		if !customer_email.validate_email() {
			return Err(BakeryError::invalid_input(format!(
				"Invalid email address: {}",
				customer_email
			)));
		}
		let customer_phone = within(
			required(input.customer_phone.as_deref(), "customer_phone")?,
			"customer_phone",
			MAX_PHONE_LEN,
		)?;

		let raw_date = required(input.delivery_date.as_deref(), "delivery_date")?;
		let delivery_date = NaiveDate::parse_from_str(&raw_date, DATE_FORMAT).map_err(|_| {
			BakeryError::invalid_input(format!(
				"Invalid delivery_date '{}', expected YYYY-MM-DD",
				raw_date
			))
		})?;
		let today = self.clock.today();
		if delivery_date <= today {
			return Err(BakeryError::invalid_input(format!(
				"delivery_date must be after {}",
				today
			)));
		}

		let special_requests = input
			.special_requests
			.as_deref()
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.map(str::to_string);

		Ok(ValidatedOrder {
			cake_id,
			quantity,
			customer_name,
			customer_email,
			customer_phone,
			delivery_date,
			special_requests,
		})
	}

	/// Creates an order owned by the caller, or a guest order for callers without a
	/// verified credential. Nothing is written unless every check passes.
	#[instrument(skip_all, fields(cake_id = ?input.cake_id))]
	pub async fn create_order(
		&self,
		identity: &Identity,
		input: CreateOrderRequest,
	) -> Result<Order, BakeryError> {
		let valid = self.validate(&input)?;

		let _cake_guard = self.cake_locks.lock(valid.cake_id).await;
		let cake = self
			.catalog
			.get_cake(valid.cake_id)
			.await?
			.ok_or(CatalogError::CakeNotFound(valid.cake_id))?;
		let priced = self
			.pricing
			.price(&cake, valid.quantity, &input.selected_customizations)
			.await?;

		let order = self
			.orders
			.insert(OrderDraft {
				owner_id: identity.user_id(),
				cake_id: cake.id,
				cake_name: cake.name,
				quantity: priced.quantity,
				selected_customizations: priced.customizations,
				customer_name: valid.customer_name,
				customer_email: valid.customer_email,
				customer_phone: valid.customer_phone,
				delivery_date: valid.delivery_date,
				special_requests: valid.special_requests,
				total_price: priced.total_price,
			})
			.await?;

		tracing::info!(
			order_id = %order.id,
			guest = order.is_guest(),
			total = %order.total_price,
			"Order created"
		);
		Ok(order)
	}

	/// Returns an order the caller may read.
	#[instrument(skip_all, fields(order_id = %id))]
	pub async fn get_order(&self, identity: &Identity, id: OrderId) -> Result<Order, BakeryError> {
		identity.require_user()?;
		let order = self
			.orders
			.get_by_id(id)
			.await?
			.ok_or_else(|| BakeryError::not_found(format!("Order {} not found", id)))?;
		if !identity.can_read(order.owner_id) {
			return Err(BakeryError::forbidden("Access denied"));
		}
		Ok(order)
	}

	/// All orders owned by the caller, newest first.
	#[instrument(skip_all)]
	pub async fn list_my_orders(&self, identity: &Identity) -> Result<Vec<Order>, BakeryError> {
		let user_id = identity.require_user()?;
		self.orders.all_by_owner(user_id).await
	}

	/// Changes an order's status. Admin only.
	#[instrument(skip_all, fields(order_id = %id, status = %status))]
	pub async fn update_status(
		&self,
		identity: &Identity,
		id: OrderId,
		status: &str,
	) -> Result<Order, BakeryError> {
		let admin_id = identity.require_admin()?;
		let new_status: OrderStatus = status.parse()?;
		let order = self
			.state_machine
			.transition_order_status(id, new_status)
			.await?;
		tracing::info!(order_id = %id, admin_id, status = %new_status, "Order status updated");
		Ok(order)
	}
}
