//! In-process [`LocaleDatabase`] backed by a locale → details table.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	locale::{LocaleConfiguration, LocaleDatabase, LocaleDetails, LocaleFuture},
};

type LocaleMap = Arc<RwLock<HashMap<String, LocaleDetails>>>;

/// Locale table kept in memory; load it from JSON or fill it with [`insert`](Self::insert).
#[derive(Clone, Debug, Default)]
pub struct MemoryLocaleDatabase(LocaleMap);
impl MemoryLocaleDatabase {
	/// Parses a JSON object mapping locale strings to [`LocaleDetails`].
	pub fn from_json(json: &str) -> Result<Self> {
		let de = &mut serde_json::Deserializer::from_str(json);
		let table: HashMap<String, LocaleDetails> = serde_path_to_error::deserialize(de)
			.map_err(|source| ConfigError::LocaleTable { source })?;

		Ok(Self(Arc::new(RwLock::new(table))))
	}

	/// Adds or replaces the record for `locale`.
	pub fn insert(&self, locale: impl Into<String>, details: LocaleDetails) {
		self.0.write().insert(locale.into(), details);
	}

	/// Returns `true` when a record exists for `locale`.
	pub fn contains(&self, locale: &str) -> bool {
		self.0.read().contains_key(locale)
	}

	fn lookup_now(map: &LocaleMap, locale: &str) -> Result<LocaleConfiguration> {
		let details = map
			.read()
			.get(locale)
			.cloned()
			.ok_or_else(|| ConfigError::UnknownLocale { locale: locale.to_owned() })?;

		Ok(LocaleConfiguration::for_locale(locale, details)?)
	}
}
impl LocaleDatabase for MemoryLocaleDatabase {
	fn lookup<'a>(&'a self, locale: &'a str) -> LocaleFuture<'a> {
		Box::pin(async move { Self::lookup_now(&self.0, locale) })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const TABLE: &str = r#"{
		"fr_FR": {
			"gigya-api-key": "fr-gigya-key",
			"gigya-root-url": "https://accounts.eu1.gigya.com",
			"kamereon-api-key": "fr-kamereon-key",
			"kamereon-root-url": "https://api-wired-prod-1-euw1.example.com"
		}
	}"#;

	#[tokio::test]
	async fn lookup_derives_country_from_locale() {
		let db = MemoryLocaleDatabase::from_json(TABLE).expect("Locale table should parse.");
		let config = db.lookup("fr_FR").await.expect("Known locale should resolve.");

		assert_eq!(config.country, "FR");
		assert_eq!(config.details.gigya_api_key, "fr-gigya-key");
	}

	#[tokio::test]
	async fn unknown_locale_is_a_config_error() {
		let db = MemoryLocaleDatabase::default();
		let err = db.lookup("it_IT").await.expect_err("Empty table should not resolve locales.");

		assert!(matches!(
			err,
			Error::Config(ConfigError::UnknownLocale { ref locale }) if locale == "it_IT"
		));
	}

	#[tokio::test]
	async fn inserted_records_are_visible_to_clones() {
		let db = MemoryLocaleDatabase::default();
		let handle = db.clone();

		db.insert("de_DE", LocaleDetails::new("k1", "https://g", "k2", "https://k"));

		assert!(handle.contains("de_DE"));
		assert_eq!(handle.lookup("de_DE").await.expect("Inserted locale resolves.").country, "DE");
	}

	#[test]
	fn malformed_tables_report_the_failing_path() {
		let err = MemoryLocaleDatabase::from_json(r#"{"fr_FR": {"gigya-api-key": 1}}"#)
			.expect_err("Numeric API keys must be rejected.");

		match err {
			Error::Config(ConfigError::LocaleTable { source }) =>
				assert_eq!(source.path().to_string(), "fr_FR.gigya-api-key"),
			other => panic!("Unexpected error: {other:?}"),
		}
	}
}
