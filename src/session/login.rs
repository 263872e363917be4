//! Gigya handshake: login token, person id, and JWT.

// self
use crate::{
	_prelude::*,
	auth::{Credential, CredentialName, GIGYA_JWT, GIGYA_LOGIN_TOKEN, GIGYA_PERSON_ID},
	http::HttpTransport,
	obs::{self, FlowKind},
	session::{Session, common},
};

/// Header carrying the Kamereon API key.
pub const KAMEREON_API_KEY_HEADER: &str = "apikey";
/// Header carrying the Gigya JWT.
pub const KAMEREON_JWT_HEADER: &str = "x-gigya-id_token";

impl<C> Session<C>
where
	C: ?Sized + HttpTransport,
{
	/// Authenticates against Gigya and caches the resulting login token.
	///
	/// Sends exactly one `accounts.login` request. A token different from the cached one drops
	/// the person id and JWT derived from the previous token. On failure the store is left as
	/// it was.
	pub async fn login(&self, login_id: &str, password: &str) -> Result<()> {
		obs::observe(FlowKind::Login, GIGYA_LOGIN_TOKEN, self.fetch_login_token(login_id, password))
			.await
	}

	/// Returns the cached login token without contacting Gigya.
	pub fn login_token(&self) -> Result<String> {
		self.credentials.get_value(GIGYA_LOGIN_TOKEN)
	}

	/// Returns the Gigya person id, fetching it with the login token on a miss.
	pub async fn person_id(&self) -> Result<String> {
		let guard = common::flow_guard(self, GIGYA_PERSON_ID);

		self.get_or_resolve(GIGYA_PERSON_ID, guard, || {
			obs::observe(FlowKind::AccountInfo, GIGYA_PERSON_ID, self.fetch_person_id())
		})
		.await
	}

	/// Returns a live Gigya JWT, exchanging the login token for a new one on a miss.
	///
	/// The cached JWT expires with its `exp` claim, after which the next call fetches a fresh one.
	/// A token that is already expired on arrival is still returned, but never served from cache.
	pub async fn jwt(&self) -> Result<String> {
		let guard = common::flow_guard(self, GIGYA_JWT);

		self.get_or_resolve(GIGYA_JWT, guard, || {
			obs::observe(FlowKind::Jwt, GIGYA_JWT, self.fetch_jwt())
		})
		.await
	}

	/// Returns the headers Kamereon requires on vehicle-data requests.
	pub async fn kamereon_headers(&self) -> Result<[(&'static str, String); 2]> {
		let api_key = self.kamereon_api_key().await?;
		let jwt = self.jwt().await?;

		Ok([(KAMEREON_API_KEY_HEADER, api_key), (KAMEREON_JWT_HEADER, jwt)])
	}

	async fn fetch_login_token(&self, login_id: &str, password: &str) -> Result<()> {
		let guard = common::flow_guard(self, GIGYA_LOGIN_TOKEN);
		let _singleflight = guard.lock().await;
		let client = self.gigya_client().await?;
		let token = self.metrics.track(client.login(login_id, password)).await?;
		let previous = self.credentials.get_value(GIGYA_LOGIN_TOKEN).ok();

		if previous.as_deref() != Some(token.as_str()) {
			self.credentials.remove(GIGYA_PERSON_ID);
			self.credentials.remove(GIGYA_JWT);
		}

		self.credentials.set(CredentialName::fixed(GIGYA_LOGIN_TOKEN), Credential::new(token));

		Ok(())
	}

	async fn fetch_person_id(&self) -> Result<String> {
		let login_token = self.login_token()?;
		let client = self.gigya_client().await?;
		let person_id = self.metrics.track(client.person_id(&login_token)).await?;

		self.cache_for_login_token(&login_token, GIGYA_PERSON_ID, Credential::new(&person_id))
			.await;

		Ok(person_id)
	}

	async fn fetch_jwt(&self) -> Result<String> {
		let login_token = self.login_token()?;
		let client = self.gigya_client().await?;
		let jwt = self.metrics.track(client.jwt(&login_token)).await?;

		// Expiry follows the token's own `exp` claim.
		self.cache_for_login_token(&login_token, GIGYA_JWT, Credential::jwt(&jwt)).await;

		Ok(jwt)
	}

	/// Caches a credential derived from `login_token` unless a login rotated the token while
	/// it was being fetched.
	async fn cache_for_login_token(
		&self,
		login_token: &str,
		name: &'static str,
		credential: Credential,
	) {
		let guard = common::flow_guard(self, GIGYA_LOGIN_TOKEN);
		let _rotation = guard.lock().await;

		if self.login_token().ok().as_deref() == Some(login_token) {
			self.credentials.set(CredentialName::fixed(name), credential);
		}
	}
}
