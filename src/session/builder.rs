// self
use crate::{
	_prelude::*,
	error::ConfigError,
	http::HttpTransport,
	locale::{LocaleDatabase, LocaleDetails, MemoryLocaleDatabase},
	session::Session,
	store::CredentialStore,
};

/// Builder for [`Session`] values.
///
/// At least one of [`locale`](Self::locale), [`country`](Self::country), or
/// [`locale_details`](Self::locale_details) must be supplied; nothing else is validated until an
/// accessor needs it.
pub struct SessionBuilder<C>
where
	C: ?Sized + HttpTransport,
{
	/// Transport shared with the session.
	pub http_client: Arc<C>,
	/// Locale such as `fr_FR`.
	pub locale: Option<String>,
	/// Explicit country code.
	pub country: Option<String>,
	/// Pre-resolved service keys and URLs.
	pub locale_details: Option<LocaleDetails>,
	/// Store to reuse; a fresh one is created otherwise.
	pub credential_store: Option<CredentialStore>,
	/// Locale database; an empty [`MemoryLocaleDatabase`] is used otherwise.
	pub locale_database: Option<Arc<dyn LocaleDatabase>>,
}
impl<C> SessionBuilder<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a builder around `http_client` with no configuration sources.
	pub fn new(http_client: Arc<C>) -> Self {
		Self {
			http_client,
			locale: None,
			country: None,
			locale_details: None,
			credential_store: None,
			locale_database: None,
		}
	}

	/// Sets the locale.
	pub fn locale(mut self, locale: impl Into<String>) -> Self {
		self.locale = Some(locale.into());

		self
	}

	/// Sets the country code.
	pub fn country(mut self, country: impl Into<String>) -> Self {
		self.country = Some(country.into());

		self
	}

	/// Sets pre-resolved service keys and URLs.
	pub fn locale_details(mut self, details: LocaleDetails) -> Self {
		self.locale_details = Some(details);

		self
	}

	/// Reuses an existing credential store, e.g. one that already holds a login token.
	pub fn credential_store(mut self, store: CredentialStore) -> Self {
		self.credential_store = Some(store);

		self
	}

	/// Sets the database consulted for locale lookups.
	pub fn locale_database(mut self, database: Arc<dyn LocaleDatabase>) -> Self {
		self.locale_database = Some(database);

		self
	}

	/// Consumes the builder, producing a [`Session`].
	pub fn build(self) -> Result<Session<C>> {
		if self.locale.is_none() && self.country.is_none() && self.locale_details.is_none() {
			return Err(ConfigError::MissingLocaleSource.into());
		}

		let locale_database = self
			.locale_database
			.unwrap_or_else(|| Arc::new(MemoryLocaleDatabase::default()));

		Ok(Session {
			http_client: self.http_client,
			locale_database,
			locale: self.locale,
			country: self.country,
			locale_details: self.locale_details,
			metrics: Default::default(),
			credentials: self.credential_store.unwrap_or_default(),
			locale_guard: Default::default(),
			flow_guards: Default::default(),
		})
	}
}
impl<C> Debug for SessionBuilder<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionBuilder")
			.field("locale", &self.locale)
			.field("country", &self.country)
			.field("locale_details", &self.locale_details)
			.field("credential_store_set", &self.credential_store.is_some())
			.field("locale_database_set", &self.locale_database.is_some())
			.finish()
	}
}
