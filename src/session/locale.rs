//! Lazy locale resolution.
//!
//! Explicit construction values are cached first and always answer for themselves, whatever
//! the locale database says. A miss they cannot cover falls back to the locale: the database
//! supplies the service values (and its country), the locale suffix supplies `country`.
//! Values already cached are never overwritten. The database is consulted only when a locale is
//! configured, no explicit details were supplied, and a service value is still missing; a
//! failed lookup or a malformed locale only fails the credentials that actually depend on it.

// self
use crate::{
	_prelude::*,
	auth::{
		COUNTRY, Credential, CredentialName, GIGYA_API_KEY, GIGYA_ROOT_URL, KAMEREON_API_KEY,
		KAMEREON_ROOT_URL,
	},
	http::HttpTransport,
	locale::{self, LocaleDetails},
	obs::{self, FlowKind},
	session::Session,
};

const SERVICE_CREDENTIALS: [&str; 4] =
	[GIGYA_API_KEY, GIGYA_ROOT_URL, KAMEREON_API_KEY, KAMEREON_ROOT_URL];

impl<C> Session<C>
where
	C: ?Sized + HttpTransport,
{
	/// Returns the country code.
	pub async fn country(&self) -> Result<String> {
		self.resolve_locale_credential(COUNTRY).await
	}

	/// Returns the Gigya API key.
	pub async fn gigya_api_key(&self) -> Result<String> {
		self.resolve_locale_credential(GIGYA_API_KEY).await
	}

	/// Returns the Gigya root URL.
	pub async fn gigya_root_url(&self) -> Result<String> {
		self.resolve_locale_credential(GIGYA_ROOT_URL).await
	}

	/// Returns the Kamereon API key.
	pub async fn kamereon_api_key(&self) -> Result<String> {
		self.resolve_locale_credential(KAMEREON_API_KEY).await
	}

	/// Returns the Kamereon root URL.
	pub async fn kamereon_root_url(&self) -> Result<String> {
		self.resolve_locale_credential(KAMEREON_ROOT_URL).await
	}

	async fn resolve_locale_credential(&self, name: &'static str) -> Result<String> {
		self.get_or_resolve(name, self.locale_guard.clone(), || {
			obs::observe(FlowKind::Locale, name, self.populate_locale(name))
		})
		.await
	}

	async fn populate_locale(&self, name: &'static str) -> Result<String> {
		self.store_locale_values(self.country.clone(), self.locale_details.as_ref());

		match self.locale.as_deref() {
			Some(locale) if !self.credentials.has(name) =>
				self.populate_from_locale(locale, name).await?,
			_ => {},
		}

		self.credentials.get_value(name)
	}

	async fn populate_from_locale(&self, locale: &str, name: &'static str) -> Result<()> {
		let service_missing = SERVICE_CREDENTIALS.iter().any(|service| !self.credentials.has(service));

		if self.locale_details.is_none() && service_missing {
			match self.locale_database.lookup(locale).await {
				Ok(config) =>
					self.store_locale_values(Some(config.country), Some(&config.details)),
				// The locale suffix still answers `country`.
				Err(_) if name == COUNTRY => {},
				Err(e) => return Err(e),
			}
		}
		if name == COUNTRY && !self.credentials.has(COUNTRY) {
			let country = locale::country_from_locale(locale)?;

			self.store_locale_values(Some(country), None);
		}

		Ok(())
	}

	fn store_locale_values(&self, country: Option<String>, details: Option<&LocaleDetails>) {
		if let Some(country) = country {
			self.credentials.set_if_absent(CredentialName::fixed(COUNTRY), Credential::new(country));
		}
		if let Some(details) = details {
			for (name, value) in details.entries() {
				self.credentials.set_if_absent(CredentialName::fixed(name), Credential::new(value));
			}
		}
	}
}
