//! Session-level error types shared across the store, resolver, and Gigya client.

// self
use crate::_prelude::*;

/// Session-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical session error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Required credential is absent and cannot be derived from the session configuration.
	#[error("Credential `{name}` not found in credential cache.")]
	CredentialNotFound {
		/// Name of the missing credential.
		name: String,
	},
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Identity provider answered with an error or an unusable body.
	#[error(transparent)]
	Upstream(#[from] UpstreamError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
}
impl Error {
	/// Builds a [`Error::CredentialNotFound`] for the provided credential name.
	pub fn not_found(name: impl Into<String>) -> Self {
		Self::CredentialNotFound { name: name.into() }
	}

	/// Returns the credential name when this is a not-found error.
	pub fn missing_credential(&self) -> Option<&str> {
		match self {
			Self::CredentialNotFound { name } => Some(name),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised by the session.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// None of locale, country, or locale details were supplied.
	#[error("Session requires at least one of locale, country, or locale details.")]
	MissingLocaleSource,
	/// Locale database has no record for the locale.
	#[error("Locale `{locale}` is not present in the locale database.")]
	UnknownLocale {
		/// Locale that failed the lookup.
		locale: String,
	},
	/// Locale string does not end with a region code.
	#[error("Locale `{locale}` does not carry a country code.")]
	InvalidLocale {
		/// Offending locale string.
		locale: String,
	},
	/// A cached root URL cannot be parsed.
	#[error("Credential `{name}` does not hold a valid URL.")]
	InvalidRootUrl {
		/// Credential that holds the URL.
		name: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Credential name failed validation.
	#[error(transparent)]
	InvalidCredentialName(#[from] crate::auth::IdentifierError),
	/// Locale table could not be parsed.
	#[error("Locale table is malformed.")]
	LocaleTable {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Failures reported by (or while reading from) the identity provider.
#[derive(Debug, ThisError)]
pub enum UpstreamError {
	/// Endpoint answered with a non-2xx status.
	#[error("Gigya endpoint `{endpoint}` returned HTTP {status}: {body}.")]
	Status {
		/// Endpoint name, e.g. `accounts.login`.
		endpoint: &'static str,
		/// HTTP status code.
		status: u16,
		/// Truncated response body.
		body: String,
	},
	/// Endpoint answered with a non-zero Gigya `errorCode`.
	#[error("Gigya endpoint `{endpoint}` returned error {code}: {details}.")]
	Gigya {
		/// Endpoint name.
		endpoint: &'static str,
		/// Gigya `errorCode`.
		code: i64,
		/// Gigya `errorDetails`, falling back to `errorMessage`.
		details: String,
	},
	/// Body is not the JSON document the endpoint promises.
	#[error("Gigya endpoint `{endpoint}` returned malformed JSON.")]
	ResponseParse {
		/// Endpoint name.
		endpoint: &'static str,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Body parsed but lacks the field carrying the credential.
	#[error("Gigya endpoint `{endpoint}` response is missing `{field}`.")]
	MissingField {
		/// Endpoint name.
		endpoint: &'static str,
		/// Dotted path of the absent field.
		field: &'static str,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the identity provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the identity provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn not_found_message_names_the_credential() {
		let err = Error::not_found("gigya-api-key");

		assert_eq!(err.to_string(), "Credential `gigya-api-key` not found in credential cache.");
		assert_eq!(err.missing_credential(), Some("gigya-api-key"));
	}

	#[test]
	fn upstream_errors_keep_gigya_details_verbatim() {
		let err: Error = UpstreamError::Gigya {
			endpoint: "accounts.login",
			code: 403042,
			details: "invalid loginID or password".into(),
		}
		.into();

		assert!(err.missing_credential().is_none());
		assert_eq!(
			err.to_string(),
			"Gigya endpoint `accounts.login` returned error 403042: invalid loginID or password."
		);
	}

	#[test]
	fn transport_error_exposes_source() {
		let io = std::io::Error::other("connection reset");
		let err: Error = TransportError::from(io).into();
		let source = StdError::source(&err)
			.expect("Transparent transport errors should expose the IO error as their source.");

		assert_eq!(source.to_string(), "connection reset");
	}
}
