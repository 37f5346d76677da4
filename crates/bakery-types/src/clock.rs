//! Time source used for delivery-date checks, timestamps and token expiry.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::RwLock;

/// Source of the current server time.
pub trait Clock: Send + Sync {
	fn now(&self) -> DateTime<Utc>;

	/// The server's calendar date.
	fn today(&self) -> NaiveDate {
		self.now().date_naive()
	}

	/// Current time as unix seconds.
	fn timestamp(&self) -> u64 {
		self.now().timestamp().max(0) as u64
	}
}

/// Wall-clock time in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> DateTime<Utc> {
		Utc::now()
	}
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
	now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
	pub fn new(now: DateTime<Utc>) -> Self {
		Self {
			now: RwLock::new(now),
		}
	}

	/// A clock set to midday on the given date.
	pub fn at_date(date: NaiveDate) -> Self {
		let noon = date.and_hms_opt(12, 0, 0).unwrap_or_default().and_utc();
		Self::new(noon)
	}

	pub fn set(&self, now: DateTime<Utc>) {
		let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
		*guard = now;
	}

	pub fn advance(&self, by: Duration) {
		let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
		*guard += by;
	}
}

impl Clock for ManualClock {
	fn now(&self) -> DateTime<Utc> {
		*self.now.read().unwrap_or_else(|e| e.into_inner())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_manual_clock_advances() {
		let clock = ManualClock::at_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
		let before = clock.timestamp();
		clock.advance(Duration::days(1));
		assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
		assert_eq!(clock.timestamp() - before, 86_400);
	}
}
