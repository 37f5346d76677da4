//! Per-key async locks.
//!
//! Entries exist only while a guard is held or awaited; the last guard to be dropped
//! removes its entry.

use dashmap::DashMap;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

pub struct KeyedLocks<K: Eq + Hash + Copy> {
	locks: DashMap<K, Arc<Mutex<()>>>,
}

impl<K: Eq + Hash + Copy> Default for KeyedLocks<K> {
	fn default() -> Self {
		Self::new()
	}
}

impl<K: Eq + Hash + Copy> KeyedLocks<K> {
	pub fn new() -> Self {
		Self {
			locks: DashMap::new(),
		}
	}

	/// Waits for exclusive access to `key`.
	pub async fn lock(&self, key: K) -> KeyedGuard<'_, K> {
		let mutex = self.locks.entry(key).or_default().value().clone();
		let guard = mutex.lock_owned().await;
		KeyedGuard {
			locks: &self.locks,
			key,
			guard: Some(guard),
		}
	}

	/// Number of keys currently locked or awaited.
	pub fn len(&self) -> usize {
		self.locks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.locks.is_empty()
	}
}

/// Held access to one key. Dropping it releases the key.
pub struct KeyedGuard<'a, K: Eq + Hash + Copy> {
	locks: &'a DashMap<K, Arc<Mutex<()>>>,
	key: K,
	guard: Option<OwnedMutexGuard<()>>,
}

impl<K: Eq + Hash + Copy> Drop for KeyedGuard<'_, K> {
	fn drop(&mut self) {
		// Release first so the map holds the only reference when nobody is waiting
		self.guard.take();
		self.locks
			.remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
	}
}
