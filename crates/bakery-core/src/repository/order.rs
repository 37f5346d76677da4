//! Order repository.
//!
//! Orders are stored one record per key under `orders:<id>`. Listings are read from the
//! store on every call and sorted newest first, with the id as tie-break.

use crate::locks::KeyedLocks;
use bakery_storage::StorageService;
use bakery_types::{
	BakeryError, CakeId, Clock, Order, OrderCustomization, OrderId, OrderStatus, Page,
	PageRequest, StorageKey, UserId,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

/// A validated, priced order that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct OrderDraft {
	pub owner_id: Option<UserId>,
	pub cake_id: CakeId,
	pub cake_name: String,
	pub quantity: u32,
	pub selected_customizations: Vec<OrderCustomization>,
	pub customer_name: String,
	pub customer_email: String,
	pub customer_phone: String,
	pub delivery_date: NaiveDate,
	pub special_requests: Option<String>,
	pub total_price: Decimal,
}

pub struct OrderRepository {
	storage: Arc<StorageService>,
	clock: Arc<dyn Clock>,
	/// One lock per order id, taken for read-modify-write cycles.
	locks: KeyedLocks<OrderId>,
}

fn newest_first(a: &Order, b: &Order) -> Ordering {
	b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))
}

impl OrderRepository {
	pub fn new(storage: Arc<StorageService>, clock: Arc<dyn Clock>) -> Self {
		Self {
			storage,
			clock,
			locks: KeyedLocks::new(),
		}
	}

	/// Persists a new order in `pending` status and returns it with its id.
	pub async fn insert(&self, draft: OrderDraft) -> Result<Order, BakeryError> {
		let id = self.storage.next_id(StorageKey::Orders).await?;
		let now = self.clock.timestamp();
		let order = Order {
			id,
			owner_id: draft.owner_id,
			cake_id: draft.cake_id,
			cake_name: draft.cake_name,
			quantity: draft.quantity,
			selected_customizations: draft.selected_customizations,
			customer_name: draft.customer_name,
			customer_email: draft.customer_email,
			customer_phone: draft.customer_phone,
			delivery_date: draft.delivery_date,
			special_requests: draft.special_requests,
			total_price: draft.total_price,
			status: OrderStatus::Pending,
			created_at: now,
			updated_at: now,
		};
		self.storage
			.insert_new(StorageKey::Orders.as_str(), &id.to_string(), &order)
			.await?;
		Ok(order)
	}

	pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, BakeryError> {
		Ok(self
			.storage
			.retrieve_optional(StorageKey::Orders.as_str(), &id.to_string())
			.await?)
	}

	/// Every order, newest first.
	pub async fn all(&self) -> Result<Vec<Order>, BakeryError> {
		let mut orders: Vec<Order> = self
			.storage
			.retrieve_all(StorageKey::Orders.as_str())
			.await?;
		orders.sort_by(newest_first);
		Ok(orders)
	}

	/// Every order owned by `owner_id`, newest first.
	pub async fn all_by_owner(&self, owner_id: UserId) -> Result<Vec<Order>, BakeryError> {
		let mut orders = self.all().await?;
		orders.retain(|o| o.owner_id == Some(owner_id));
		Ok(orders)
	}

	pub async fn list_by_owner(
		&self,
		owner_id: UserId,
		page: PageRequest,
	) -> Result<Page<Order>, BakeryError> {
		Ok(page.paginate(self.all_by_owner(owner_id).await?))
	}

	/// Orders with the given status, or all orders when `status` is `None`.
	pub async fn list_by_status(
		&self,
		status: Option<OrderStatus>,
		page: PageRequest,
	) -> Result<Page<Order>, BakeryError> {
		let mut orders = self.all().await?;
		if let Some(status) = status {
			orders.retain(|o| o.status == status);
		}
		Ok(page.paginate(orders))
	}

	/// Order counts for every owner that has at least one order.
	pub async fn counts_by_owner(&self) -> Result<HashMap<UserId, u64>, BakeryError> {
		let mut counts = HashMap::new();
		for order in self.all().await? {
			if let Some(owner) = order.owner_id {
				*counts.entry(owner).or_insert(0) += 1;
			}
		}
		Ok(counts)
	}

	/// Changes an order's status under its per-order lock.
	///
	/// `check` sees the order as currently stored, after the lock is taken, and can veto
	/// the change. `updated_at` is refreshed on success.
	pub async fn update_status_with<F>(
		&self,
		id: OrderId,
		new_status: OrderStatus,
		check: F,
	) -> Result<Order, BakeryError>
	where
		F: FnOnce(&Order) -> Result<(), BakeryError>,
	{
		let _guard = self.locks.lock(id).await;

		let mut order = self
			.get_by_id(id)
			.await?
			.ok_or_else(|| BakeryError::not_found(format!("Order {} not found", id)))?;
		check(&order)?;

		order.status = new_status;
		order.updated_at = self.clock.timestamp();
		self.storage
			.update(StorageKey::Orders.as_str(), &id.to_string(), &order)
			.await?;
		Ok(order)
	}
}
