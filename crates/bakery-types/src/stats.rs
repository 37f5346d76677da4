//! Aggregates shown on the administrator dashboard.

use crate::OrderStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order counts per status. Every status is always present, zero when unused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
	pub pending: u64,
	pub confirmed: u64,
	pub completed: u64,
	pub cancelled: u64,
}

impl StatusCounts {
	pub fn record(&mut self, status: OrderStatus) {
		*self.slot(status) += 1;
	}

	pub fn get(&self, status: OrderStatus) -> u64 {
		match status {
			OrderStatus::Pending => self.pending,
			OrderStatus::Confirmed => self.confirmed,
			OrderStatus::Completed => self.completed,
			OrderStatus::Cancelled => self.cancelled,
		}
	}

	pub fn total(&self) -> u64 {
		self.pending + self.confirmed + self.completed + self.cancelled
	}

	fn slot(&mut self, status: OrderStatus) -> &mut u64 {
		match status {
			OrderStatus::Pending => &mut self.pending,
			OrderStatus::Confirmed => &mut self.confirmed,
			OrderStatus::Completed => &mut self.completed,
			OrderStatus::Cancelled => &mut self.cancelled,
		}
	}
}

/// Snapshot of the store for the administrator dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
	pub total_users: u64,
	pub total_orders: u64,
	pub orders_by_status: StatusCounts,
	/// Orders created within the trailing window, inclusive.
	pub recent_orders: u64,
	/// Sum of totals over confirmed and completed orders.
	pub total_revenue: Decimal,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_counts_serialize_all_buckets() {
		let mut counts = StatusCounts::default();
		counts.record(OrderStatus::Pending);
		let json = serde_json::to_value(counts).unwrap();
		assert_eq!(json["pending"], 1);
		assert_eq!(json["confirmed"], 0);
		assert_eq!(json["completed"], 0);
		assert_eq!(json["cancelled"], 0);
	}
}
