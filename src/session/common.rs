//! Shared helpers for session accessors (single-flight guards, get-or-resolve caching).

// self
use crate::{
	_prelude::*,
	auth::CredentialName,
	gigya::GigyaClient,
	http::HttpTransport,
	session::Session,
};

impl<C> Session<C>
where
	C: ?Sized + HttpTransport,
{
	/// Returns the cached value of `name`, running `resolve` under `guard` on a miss.
	///
	/// `resolve` caches what it fetched and hands the value back; that value is returned even
	/// when the store refuses to keep it (an already expired JWT, a rotated login token). The
	/// cache is checked again once the guard is held, so callers that queued behind an
	/// in-flight resolution reuse its result instead of resolving a second time. A failed
	/// resolution caches nothing.
	pub(crate) async fn get_or_resolve<F, Fut>(
		&self,
		name: &'static str,
		guard: Arc<AsyncMutex<()>>,
		resolve: F,
	) -> Result<String>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<String>>,
	{
		if let Ok(value) = self.credentials.get_value(name) {
			return Ok(value);
		}

		let _singleflight = guard.lock().await;

		if let Ok(value) = self.credentials.get_value(name) {
			return Ok(value);
		}

		resolve().await
	}

	/// Builds a Gigya client for the resolved root URL and API key.
	pub(crate) async fn gigya_client(&self) -> Result<GigyaClient<'_, C>> {
		let root_url = self.gigya_root_url().await?;
		let api_key = self.gigya_api_key().await?;

		GigyaClient::new(self.http_client.as_ref(), &root_url, api_key)
	}
}

/// Returns (and creates on demand) the single-flight guard for a credential.
pub(crate) fn flow_guard<C>(session: &Session<C>, name: &'static str) -> Arc<AsyncMutex<()>>
where
	C: ?Sized + HttpTransport,
{
	let mut guards = session.flow_guards.lock();

	guards
		.entry(CredentialName::fixed(name))
		.or_insert_with(|| Arc::new(AsyncMutex::new(())))
		.clone()
}
