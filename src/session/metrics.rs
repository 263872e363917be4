// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::_prelude::*;

/// Thread-safe counters for identity-provider requests issued by a session.
///
/// Cache hits never touch these counters; every increment of [`attempts`](Self::attempts)
/// corresponds to one network request.
#[derive(Debug, Default)]
pub struct RequestMetrics {
	attempts: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
}
impl RequestMetrics {
	/// Returns the total number of requests sent.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of requests that produced a credential.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of failed requests.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	/// Counts `request` as one attempt and records its outcome.
	pub(crate) async fn track<T, Fut>(&self, request: Fut) -> Result<T>
	where
		Fut: Future<Output = Result<T>>,
	{
		self.attempts.fetch_add(1, Ordering::Relaxed);

		let result = request.await;

		match &result {
			Ok(_) => self.success.fetch_add(1, Ordering::Relaxed),
			Err(_) => self.failure.fetch_add(1, Ordering::Relaxed),
		};

		result
	}
}
