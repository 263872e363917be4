//! Locale configuration records and the database contract that supplies them.
//!
//! A locale such as `fr_FR` selects the Gigya and Kamereon API keys and root URLs that a
//! session talks to. [`LocaleDetails`] holds those four values; [`LocaleConfiguration`] adds
//! the country code, normally the region suffix of the locale.

pub mod memory;

pub use memory::MemoryLocaleDatabase;

// self
use crate::{
	_prelude::*,
	auth::{GIGYA_API_KEY, GIGYA_ROOT_URL, KAMEREON_API_KEY, KAMEREON_ROOT_URL},
	error::ConfigError,
};

/// Boxed future returned by [`LocaleDatabase::lookup`].
pub type LocaleFuture<'a> = Pin<Box<dyn Future<Output = Result<LocaleConfiguration>> + 'a + Send>>;

/// Source of per-locale configuration records.
pub trait LocaleDatabase
where
	Self: Send + Sync,
{
	/// Returns the configuration for `locale`, failing with
	/// [`ConfigError::UnknownLocale`] when the database has no record for it.
	fn lookup<'a>(&'a self, locale: &'a str) -> LocaleFuture<'a>;
}

/// API keys and root URLs of both services for one locale.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleDetails {
	/// Gigya API key.
	#[serde(rename = "gigya-api-key")]
	pub gigya_api_key: String,
	/// Gigya root URL, e.g. `https://accounts.eu1.gigya.com`.
	#[serde(rename = "gigya-root-url")]
	pub gigya_root_url: String,
	/// Kamereon API key.
	#[serde(rename = "kamereon-api-key")]
	pub kamereon_api_key: String,
	/// Kamereon root URL.
	#[serde(rename = "kamereon-root-url")]
	pub kamereon_root_url: String,
}
impl LocaleDetails {
	/// Creates a record from its four values.
	pub fn new(
		gigya_api_key: impl Into<String>,
		gigya_root_url: impl Into<String>,
		kamereon_api_key: impl Into<String>,
		kamereon_root_url: impl Into<String>,
	) -> Self {
		Self {
			gigya_api_key: gigya_api_key.into(),
			gigya_root_url: gigya_root_url.into(),
			kamereon_api_key: kamereon_api_key.into(),
			kamereon_root_url: kamereon_root_url.into(),
		}
	}

	/// Pairs every value with the credential name it is cached under.
	pub fn entries(&self) -> [(&'static str, &str); 4] {
		[
			(GIGYA_API_KEY, &self.gigya_api_key),
			(GIGYA_ROOT_URL, &self.gigya_root_url),
			(KAMEREON_API_KEY, &self.kamereon_api_key),
			(KAMEREON_ROOT_URL, &self.kamereon_root_url),
		]
	}
}
impl Debug for LocaleDetails {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LocaleDetails")
			.field("gigya_api_key", &"<redacted>")
			.field("gigya_root_url", &self.gigya_root_url)
			.field("kamereon_api_key", &"<redacted>")
			.field("kamereon_root_url", &self.kamereon_root_url)
			.finish()
	}
}

/// Complete configuration for one locale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleConfiguration {
	/// Upper-case country code.
	pub country: String,
	/// Service keys and root URLs.
	pub details: LocaleDetails,
}
impl LocaleConfiguration {
	/// Builds the configuration for `locale`, deriving the country from its region suffix.
	pub fn for_locale(locale: &str, details: LocaleDetails) -> Result<Self, ConfigError> {
		Ok(Self { country: country_from_locale(locale)?, details })
	}
}

/// Extracts the upper-case country code from a locale (`fr_FR` and `de-DE` both work).
pub fn country_from_locale(locale: &str) -> Result<String, ConfigError> {
	let invalid = || ConfigError::InvalidLocale { locale: locale.to_owned() };
	let (_, region) = locale.rsplit_once(['_', '-']).ok_or_else(invalid)?;

	if region.len() != 2 || !region.chars().all(|c| c.is_ascii_alphabetic()) {
		return Err(invalid());
	}

	Ok(region.to_ascii_uppercase())
}
