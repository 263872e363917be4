//! Session facade tying locale resolution and the Gigya handshake to one credential store.

/// Builder API for assembling sessions.
pub mod builder;

mod common;
mod locale;
mod login;
mod metrics;

pub use builder::*;
pub use login::{KAMEREON_API_KEY_HEADER, KAMEREON_JWT_HEADER};
pub use metrics::RequestMetrics;

// self
use crate::{
	_prelude::*,
	auth::CredentialName,
	http::HttpTransport,
	locale::{LocaleDatabase, LocaleDetails},
	store::CredentialStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Session specialized for the crate's default reqwest transport.
pub type ReqwestSession = Session<ReqwestHttpClient>;

/// One logical user session against the Gigya + Kamereon stack.
///
/// The session owns the credential store and resolves everything lazily: nothing is looked up
/// or fetched until an accessor asks for it, and every value is cached after the first
/// successful resolution. Concurrent accessors for the same credential share one in-flight
/// resolution through a per-name guard, so each network step runs at most once.
pub struct Session<C>
where
	C: ?Sized + HttpTransport,
{
	/// HTTP transport used for every identity-provider request.
	pub http_client: Arc<C>,
	/// Database consulted when only a locale string is known.
	pub locale_database: Arc<dyn LocaleDatabase>,
	/// Locale such as `fr_FR`, if supplied.
	pub locale: Option<String>,
	/// Country code, if supplied explicitly.
	pub country: Option<String>,
	/// Pre-resolved service keys and URLs, if supplied.
	pub locale_details: Option<LocaleDetails>,
	metrics: Arc<RequestMetrics>,
	credentials: CredentialStore,
	locale_guard: Arc<AsyncMutex<()>>,
	flow_guards: Arc<Mutex<HashMap<CredentialName, Arc<AsyncMutex<()>>>>>,
}
impl<C> Session<C>
where
	C: ?Sized + HttpTransport,
{
	/// Starts a builder around the provided transport.
	pub fn builder(http_client: Arc<C>) -> SessionBuilder<C> {
		SessionBuilder::new(http_client)
	}

	/// Returns the credential store backing this session.
	pub fn credentials(&self) -> &CredentialStore {
		&self.credentials
	}

	/// Returns the identity-provider request counters.
	pub fn metrics(&self) -> &RequestMetrics {
		&self.metrics
	}

	/// Forgets the account credentials while keeping the resolved locale values.
	pub fn logout(&self) {
		self.credentials.clear();
	}
}
#[cfg(feature = "reqwest")]
impl Session<ReqwestHttpClient> {
	/// Starts a builder backed by a default reqwest client.
	pub fn reqwest_builder() -> SessionBuilder<ReqwestHttpClient> {
		SessionBuilder::new(Arc::new(ReqwestHttpClient::default()))
	}
}
impl<C> Debug for Session<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session")
			.field("locale", &self.locale)
			.field("country", &self.country)
			.field("locale_details", &self.locale_details)
			.field("cached_credentials", &self.credentials.len())
			.finish()
	}
}
