//! Page requests and paged results.

use crate::BakeryError;
use serde::{Deserialize, Serialize};

/// A validated, 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
	page: u32,
	page_size: u32,
}

impl PageRequest {
	/// Builds a page request. `page` and `page_size` must both be at least 1.
	pub fn new(page: u32, page_size: u32) -> Result<Self, BakeryError> {
		if page == 0 {
			return Err(BakeryError::invalid_input("page must be at least 1"));
		}
		if page_size == 0 {
			return Err(BakeryError::invalid_input("page size must be at least 1"));
		}
		Ok(Self { page, page_size })
	}

	pub fn page(&self) -> u32 {
		self.page
	}

	pub fn page_size(&self) -> u32 {
		self.page_size
	}

	/// Number of items preceding this page.
	pub fn offset(&self) -> usize {
		(self.page as usize - 1).saturating_mul(self.page_size as usize)
	}

	/// Cuts this page out of an already sorted collection.
	pub fn paginate<T>(&self, sorted: Vec<T>) -> Page<T> {
		let total = sorted.len() as u64;
		let items = sorted
			.into_iter()
			.skip(self.offset())
			.take(self.page_size as usize)
			.collect();
		Page {
			items,
			total,
			pages: total.div_ceil(self.page_size as u64),
			current_page: self.page,
		}
	}
}

/// One page of a larger result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
	pub items: Vec<T>,
	/// Size of the whole result set, independent of the page size.
	pub total: u64,
	pub pages: u64,
	pub current_page: u32,
}

impl<T> Page<T> {
	pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
		Page {
			items: self.items.into_iter().map(f).collect(),
			total: self.total,
			pages: self.pages,
			current_page: self.current_page,
		}
	}
}
