//! Cached credential values and JWT expiry extraction.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::{_prelude::*, auth::Secret};

/// Value held by the credential store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
	/// Credential value; callers must avoid logging it.
	pub value: Secret,
	/// Instant after which the value is treated as absent.
	pub expires_at: Option<OffsetDateTime>,
}
impl Credential {
	/// Creates a credential that never expires.
	pub fn new(value: impl Into<String>) -> Self {
		Self { value: Secret::new(value), expires_at: None }
	}

	/// Creates a credential that expires at `instant`.
	pub fn with_expiry(value: impl Into<String>, instant: OffsetDateTime) -> Self {
		Self { value: Secret::new(value), expires_at: Some(instant) }
	}

	/// Creates a credential for a JWT, taking the expiry from its `exp` claim.
	///
	/// The signature is not verified. Tokens whose payload cannot be decoded, or that carry no
	/// `exp`, are cached without expiry.
	pub fn jwt(token: impl Into<String>) -> Self {
		let token = token.into();
		let expires_at = jwt_expiry(&token);

		Self { value: Secret::new(token), expires_at }
	}

	/// Returns the raw value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		self.value.expose()
	}

	/// Returns `true` if the credential has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expiry| instant >= expiry)
	}

	/// Returns `true` if the credential is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("value", &self.value)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

#[derive(Deserialize)]
struct JwtClaims {
	exp: Option<i64>,
}

fn jwt_expiry(token: &str) -> Option<OffsetDateTime> {
	let payload = token.split('.').nth(1)?;
	let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
	let claims: JwtClaims = serde_json::from_slice(&bytes).ok()?;

	OffsetDateTime::from_unix_timestamp(claims.exp?).ok()
}
