//! Order state machine implementation.
//!
//! Orders start `pending`. `pending` and `confirmed` may move to any status, including
//! themselves; `completed` and `cancelled` are terminal.

use crate::repository::OrderRepository;
use bakery_types::{BakeryError, Order, OrderId, OrderStatus};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Static transition table - each state maps to allowed next states
static TRANSITIONS: Lazy<HashMap<OrderStatus, HashSet<OrderStatus>>> = Lazy::new(|| {
	OrderStatus::all()
		.map(|from| {
			let next = if from.is_terminal() {
				HashSet::new()
			} else {
				OrderStatus::all().collect()
			};
			(from, next)
		})
		.collect()
});

/// Manages order state transitions and persistence
pub struct OrderStateMachine {
	orders: Arc<OrderRepository>,
}

impl OrderStateMachine {
	pub fn new(orders: Arc<OrderRepository>) -> Self {
		Self { orders }
	}

	/// Checks if a state transition is valid
	pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
		TRANSITIONS.get(&from).is_some_and(|next| next.contains(&to))
	}

	/// Transitions an order to a new status with validation.
	///
	/// The transition is checked against the stored status while the order's lock is
	/// held, so two racing updates cannot both leave a terminal state.
	pub async fn transition_order_status(
		&self,
		order_id: OrderId,
		new_status: OrderStatus,
	) -> Result<Order, BakeryError> {
		self.orders
			.update_status_with(order_id, new_status, |order| {
				if Self::is_valid_transition(order.status, new_status) {
					Ok(())
				} else {
					Err(BakeryError::InvalidTransition {
						from: order.status,
						to: new_status,
					})
				}
			})
			.await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::repository::OrderDraft;
	use bakery_storage::{implementations::memory::MemoryStorage, StorageService};
	use bakery_types::ManualClock;
	use chrono::{NaiveDate, TimeZone, Utc};
	use rust_decimal::dec;

	fn setup() -> (OrderStateMachine, Arc<OrderRepository>) {
		let clock = Arc::new(ManualClock::new(
			Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
		));
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		let orders = Arc::new(OrderRepository::new(storage, clock));
		(OrderStateMachine::new(orders.clone()), orders)
	}

	async fn pending_order(orders: &OrderRepository) -> Order {
		orders
			.insert(OrderDraft {
				owner_id: None,
				cake_id: 1,
				cake_name: "Vanilla Bliss".into(),
				quantity: 1,
				selected_customizations: vec![],
				customer_name: "Ann".into(),
				customer_email: "ann@example.com".into(),
				customer_phone: "555-0100".into(),
				delivery_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
				special_requests: None,
				total_price: dec!(40.00),
			})
			.await
			.unwrap()
	}

	#[test]
	fn test_transition_table() {
		use OrderStatus::*;
		for from in [Pending, Confirmed] {
			for to in OrderStatus::all() {
				assert!(OrderStateMachine::is_valid_transition(from, to));
			}
		}
		for from in [Completed, Cancelled] {
			for to in OrderStatus::all() {
				assert!(!OrderStateMachine::is_valid_transition(from, to));
			}
		}
	}

	#[tokio::test]
	async fn test_terminal_state_rejects_and_keeps_order() {
		let (machine, orders) = setup();
		let order = pending_order(&orders).await;
		let completed = machine
			.transition_order_status(order.id, OrderStatus::Completed)
			.await
			.unwrap();
		assert_eq!(completed.status, OrderStatus::Completed);

		let err = machine
			.transition_order_status(order.id, OrderStatus::Pending)
			.await
			.unwrap_err();
		assert_eq!(
			err,
			BakeryError::InvalidTransition {
				from: OrderStatus::Completed,
				to: OrderStatus::Pending,
			}
		);
		assert_eq!(orders.get_by_id(order.id).await.unwrap(), Some(completed));
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn test_concurrent_terminal_updates_serialize() {
		let (machine, orders) = setup();
		let machine = Arc::new(machine);
		let order_id = pending_order(&orders).await.id;

		let tasks: Vec<_> = [OrderStatus::Completed, OrderStatus::Cancelled]
			.into_iter()
			.cycle()
			.take(8)
			.map(|status| {
				let machine = machine.clone();
				tokio::spawn(async move { machine.transition_order_status(order_id, status).await })
			})
			.collect();

		let mut succeeded = Vec::new();
		for task in futures::future::join_all(tasks).await {
			if let Ok(order) = task.unwrap() {
				succeeded.push(order.status);
			}
		}
		assert_eq!(succeeded.len(), 1);
		let stored = orders.get_by_id(order_id).await.unwrap().unwrap();
		assert_eq!(stored.status, succeeded[0]);
	}
}
