//! Administrator aggregates and listings.
//!
//! Every operation requires an `Admin` identity. Aggregates are computed from the store
//! on each call.

use crate::repository::OrderRepository;
use bakery_account::UserDirectory;
use bakery_config::OrdersConfig;
use bakery_types::{
	AdminOrderView, BakeryError, Clock, DashboardStats, Identity, ListQuery, OrderStatus,
	Page, PageRequest, StatusCounts, UserId, UserSummary,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

const SECONDS_PER_DAY: u64 = 86_400;

pub struct AdminService {
	orders: Arc<OrderRepository>,
	users: Arc<dyn UserDirectory>,
	clock: Arc<dyn Clock>,
	config: OrdersConfig,
}

impl AdminService {
	pub fn new(
		orders: Arc<OrderRepository>,
		users: Arc<dyn UserDirectory>,
		clock: Arc<dyn Clock>,
		config: OrdersConfig,
	) -> Self {
		Self {
			orders,
			users,
			clock,
			config,
		}
	}

	/// Builds a page request from query parameters, clamping the page size.
	pub fn page_request(&self, query: &ListQuery) -> Result<PageRequest, BakeryError> {
		let size = query
			.per_page
			.unwrap_or(self.config.default_page_size)
			.min(self.config.max_page_size);
		PageRequest::new(query.page.unwrap_or(1), size)
	}

	#[instrument(skip_all)]
	pub async fn dashboard_stats(&self, identity: &Identity) -> Result<DashboardStats, BakeryError> {
		identity.require_admin()?;

		let orders = self.orders.all().await?;
		let window = u64::from(self.config.recent_window_days) * SECONDS_PER_DAY;
		let cutoff = self.clock.timestamp().saturating_sub(window);

		let mut by_status = StatusCounts::default();
		let mut recent_orders = 0;
		let mut total_revenue = Decimal::ZERO;
		for order in &orders {
			by_status.record(order.status);
			if order.created_at >= cutoff {
				recent_orders += 1;
			}
			if order.status.counts_as_revenue() {
				total_revenue += order.total_price;
			}
		}

		Ok(DashboardStats {
			total_users: self.users.count_users().await?,
			total_orders: orders.len() as u64,
			orders_by_status: by_status,
			recent_orders,
			total_revenue,
		})
	}

	/// Lists orders newest first, optionally filtered by status. Each row carries the
	/// owner's email, or a placeholder for guest orders and deleted users.
	#[instrument(skip_all, fields(status = ?query.status))]
	pub async fn list_orders(
		&self,
		identity: &Identity,
		query: &ListQuery,
	) -> Result<Page<AdminOrderView>, BakeryError> {
		identity.require_admin()?;
		let status = query
			.status
			.as_deref()
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.map(str::parse::<OrderStatus>)
			.transpose()?;
		let page = self.orders.list_by_status(status, self.page_request(query)?).await?;

		let mut emails: HashMap<UserId, String> = HashMap::new();
		for owner in page.items.iter().filter_map(|o| o.owner_id) {
			if emails.contains_key(&owner) {
				continue;
			}
			let label = match self.users.get_user(owner).await? {
				Some(user) => user.email,
				None => AdminOrderView::UNKNOWN_LABEL.to_string(),
			};
			emails.insert(owner, label);
		}

		Ok(page.map(|order| {
			let user_email = match order.owner_id {
				Some(owner) => emails
					.get(&owner)
					.cloned()
					.unwrap_or_else(|| AdminOrderView::UNKNOWN_LABEL.to_string()),
				None => AdminOrderView::GUEST_LABEL.to_string(),
			};
			AdminOrderView { order, user_email }
		}))
	}

	/// Lists users newest first with their order counts.
	#[instrument(skip_all)]
	pub async fn list_users(
		&self,
		identity: &Identity,
		query: &ListQuery,
	) -> Result<Page<UserSummary>, BakeryError> {
		identity.require_admin()?;
		let page = self.users.list_users(self.page_request(query)?).await?;
		let counts = self.orders.counts_by_owner().await?;
		Ok(page.map(|user| UserSummary {
			order_count: counts.get(&user.id).copied().unwrap_or(0),
			user,
		}))
	}
}
