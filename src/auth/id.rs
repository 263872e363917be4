//! Strongly typed credential names and the fixed names used by the session.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

/// Country code derived from the locale or supplied directly.
pub const COUNTRY: &str = "country";
/// Gigya API key for the configured locale.
pub const GIGYA_API_KEY: &str = "gigya-api-key";
/// Gigya root URL for the configured locale.
pub const GIGYA_ROOT_URL: &str = "gigya-root-url";
/// Kamereon API key for the configured locale.
pub const KAMEREON_API_KEY: &str = "kamereon-api-key";
/// Kamereon root URL for the configured locale.
pub const KAMEREON_ROOT_URL: &str = "kamereon-root-url";
/// Login token returned by `accounts.login`.
pub const GIGYA_LOGIN_TOKEN: &str = "gigya_login_token";
/// Person identifier returned by `accounts.getAccountInfo`.
pub const GIGYA_PERSON_ID: &str = "gigya_person_id";
/// JWT returned by `accounts.getJWT`.
pub const GIGYA_JWT: &str = "gigya_jwt";

/// Credentials that describe the locale rather than the logged-in account; they survive
/// [`CredentialStore::clear`](crate::store::CredentialStore::clear).
pub const PERMANENT_CREDENTIALS: [&str; 5] =
	[COUNTRY, GIGYA_API_KEY, GIGYA_ROOT_URL, KAMEREON_API_KEY, KAMEREON_ROOT_URL];

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when credential name validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The name was empty.
	#[error("Credential name cannot be empty.")]
	Empty,
	/// The name contains whitespace characters.
	#[error("Credential name `{name}` contains whitespace.")]
	ContainsWhitespace {
		/// Rejected name.
		name: String,
	},
	/// The name exceeded the allowed character count.
	#[error("Credential name exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Name under which a credential is cached.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CredentialName(String);
impl CredentialName {
	/// Creates a new name after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}

	/// Wraps one of the crate's fixed names, which are valid by construction.
	pub(crate) fn fixed(value: &'static str) -> Self {
		debug_assert!(validate_view(value).is_ok(), "fixed credential name `{value}` is invalid");

		Self(value.to_owned())
	}

	/// Returns `true` when the credential survives a logout.
	pub fn is_permanent(&self) -> bool {
		PERMANENT_CREDENTIALS.contains(&self.0.as_str())
	}
}
impl Deref for CredentialName {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for CredentialName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<CredentialName> for String {
	fn from(value: CredentialName) -> Self {
		value.0
	}
}
impl TryFrom<String> for CredentialName {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Borrow<str> for CredentialName {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for CredentialName {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "CredentialName({})", self.0)
	}
}
impl Display for CredentialName {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for CredentialName {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { name: view.to_owned() });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}
