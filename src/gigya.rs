//! Gigya wire client for the three handshake endpoints.
//!
//! Every endpoint takes a form-encoded POST and answers with a JSON document carrying
//! `errorCode` (0 on success), `errorDetails`, and `errorMessage` next to its payload. A
//! non-zero code is an upstream failure even when the HTTP status is 200.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::GIGYA_ROOT_URL,
	error::{ConfigError, UpstreamError},
	http::{HttpRequest, HttpTransport},
};

/// `accounts.login` endpoint name.
pub const LOGIN_ENDPOINT: &str = "accounts.login";
/// `accounts.getAccountInfo` endpoint name.
pub const ACCOUNT_INFO_ENDPOINT: &str = "accounts.getAccountInfo";
/// `accounts.getJWT` endpoint name.
pub const JWT_ENDPOINT: &str = "accounts.getJWT";
/// Claims requested from `accounts.getJWT`.
pub const JWT_FIELDS: &str = "data.personId,data.gigyaDataCenter";
/// Lifetime requested from `accounts.getJWT`, in seconds.
pub const JWT_EXPIRATION_SECS: u32 = 900;

const BODY_PREVIEW_LIMIT: usize = 256;

/// Borrowing client bound to one Gigya root URL and API key.
pub struct GigyaClient<'a, C>
where
	C: ?Sized + HttpTransport,
{
	http_client: &'a C,
	root_url: String,
	api_key: String,
}
impl<'a, C> GigyaClient<'a, C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a client, rejecting root URLs that do not parse.
	pub fn new(http_client: &'a C, root_url: &str, api_key: impl Into<String>) -> Result<Self> {
		Url::parse(root_url)
			.map_err(|source| ConfigError::InvalidRootUrl { name: GIGYA_ROOT_URL, source })?;

		let root_url = root_url.trim_end_matches('/').to_owned();

		Ok(Self { http_client, root_url, api_key: api_key.into() })
	}

	/// Authenticates `login_id`/`password`, returning the login token.
	pub async fn login(&self, login_id: &str, password: &str) -> Result<String> {
		let fields = [("loginID", login_id.to_owned()), ("password", password.to_owned())];
		let payload: LoginPayload = self.call(LOGIN_ENDPOINT, fields).await?;

		payload
			.session_info
			.and_then(|info| info.cookie_value)
			.filter(|value| !value.is_empty())
			.ok_or_else(|| missing_field(LOGIN_ENDPOINT, "sessionInfo.cookieValue"))
	}

	/// Fetches the person identifier of the account behind `login_token`.
	pub async fn person_id(&self, login_token: &str) -> Result<String> {
		let payload: AccountInfoPayload =
			self.call(ACCOUNT_INFO_ENDPOINT, [("oauth_token", login_token.to_owned())]).await?;

		payload
			.data
			.and_then(|data| data.person_id)
			.filter(|value| !value.is_empty())
			.ok_or_else(|| missing_field(ACCOUNT_INFO_ENDPOINT, "data.personId"))
	}

	/// Exchanges `login_token` for a signed JWT.
	pub async fn jwt(&self, login_token: &str) -> Result<String> {
		let payload: JwtPayload = self
			.call(
				JWT_ENDPOINT,
				[
					("oauth_token", login_token.to_owned()),
					("fields", JWT_FIELDS.to_owned()),
					("expiration", JWT_EXPIRATION_SECS.to_string()),
				],
			)
			.await?;

		payload
			.id_token
			.filter(|value| !value.is_empty())
			.ok_or_else(|| missing_field(JWT_ENDPOINT, "id_token"))
	}

	fn endpoint(&self, endpoint: &'static str) -> Result<Url> {
		Url::parse(&format!("{}/{endpoint}", self.root_url))
			.map_err(|source| ConfigError::InvalidRootUrl { name: GIGYA_ROOT_URL, source }.into())
	}

	async fn call<T, const N: usize>(
		&self,
		endpoint: &'static str,
		fields: [(&'static str, String); N],
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut request = HttpRequest::new(self.endpoint(endpoint)?).field("apiKey", &self.api_key);

		for (key, value) in fields {
			request = request.field(key, value);
		}

		let response = self.http_client.post(request).await?;

		if !response.is_success() {
			return Err(map_status_error(endpoint, response.status, &response.body));
		}

		let de = &mut serde_json::Deserializer::from_slice(&response.body);
		let envelope: GigyaEnvelope<T> = serde_path_to_error::deserialize(de)
			.map_err(|source| UpstreamError::ResponseParse { endpoint, source })?;

		envelope.status.into_result(endpoint)?;

		Ok(envelope.payload)
	}
}
impl<C> Debug for GigyaClient<'_, C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GigyaClient").field("root_url", &self.root_url).finish()
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GigyaStatus {
	#[serde(default)]
	error_code: i64,
	error_details: Option<String>,
	error_message: Option<String>,
}
impl GigyaStatus {
	fn into_result(self, endpoint: &'static str) -> Result<(), UpstreamError> {
		if self.error_code == 0 {
			return Ok(());
		}

		let details = self.error_details.or(self.error_message).unwrap_or_default();

		Err(UpstreamError::Gigya { endpoint, code: self.error_code, details })
	}
}

#[derive(Debug, Deserialize)]
struct GigyaEnvelope<T> {
	#[serde(flatten)]
	status: GigyaStatus,
	#[serde(flatten)]
	payload: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginPayload {
	session_info: Option<SessionInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionInfo {
	cookie_value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AccountInfoPayload {
	data: Option<AccountData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountData {
	person_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JwtPayload {
	id_token: Option<String>,
}

fn map_status_error(endpoint: &'static str, status: u16, body: &[u8]) -> Error {
	// Gigya sometimes pairs an HTTP error with its own error document; prefer that.
	match serde_json::from_slice::<GigyaStatus>(body).map(|gigya| gigya.into_result(endpoint)) {
		Ok(Err(e)) => e.into(),
		_ => UpstreamError::Status { endpoint, status, body: body_preview(body) }.into(),
	}
}

fn missing_field(endpoint: &'static str, field: &'static str) -> Error {
	UpstreamError::MissingField { endpoint, field }.into()
}

fn body_preview(body: &[u8]) -> String {
	String::from_utf8_lossy(body).chars().take(BODY_PREVIEW_LIMIT).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		error::TransportError,
		http::{HttpResponse, TransportFuture},
	};

	const ROOT: &str = "https://accounts.example.com";

	#[derive(Default)]
	struct ScriptedHttpClient {
		responses: Mutex<Vec<Result<HttpResponse, TransportError>>>,
		requests: Mutex<Vec<HttpRequest>>,
	}
	impl ScriptedHttpClient {
		fn replying(status: u16, body: &str) -> Self {
			let client = Self::default();
			let response = HttpResponse { status, body: body.as_bytes().to_vec() };

			client.responses.lock().push(Ok(response));

			client
		}

		fn failing(error: TransportError) -> Self {
			let client = Self::default();

			client.responses.lock().push(Err(error));

			client
		}

		fn last_request(&self) -> HttpRequest {
			self.requests.lock().last().cloned().expect("A request should have been recorded.")
		}
	}
	impl HttpTransport for ScriptedHttpClient {
		fn post(&self, request: HttpRequest) -> TransportFuture<'_> {
			self.requests.lock().push(request);

			let next = self.responses.lock().pop().expect("Scripted response should be queued.");

			Box::pin(async move { next })
		}
	}

	#[tokio::test]
	async fn login_posts_credentials_and_reads_cookie_value() {
		let http = ScriptedHttpClient::replying(
			200,
			r#"{"errorCode":0,"sessionInfo":{"cookieValue":"login-token"}}"#,
		);
		let client = GigyaClient::new(&http, "https://accounts.example.com/", "api-key")
			.expect("Root URL fixture should parse.");
		let token = client.login("user@example.com", "hunter2").await.expect("Login should succeed.");
		let request = http.last_request();

		assert_eq!(token, "login-token");
		assert_eq!(request.url.as_str(), "https://accounts.example.com/accounts.login");
		assert_eq!(request.get("apiKey"), Some("api-key"));
		assert_eq!(request.get("loginID"), Some("user@example.com"));
		assert_eq!(request.get("password"), Some("hunter2"));
	}

	#[tokio::test]
	async fn person_id_and_jwt_send_the_login_token() {
		let http = ScriptedHttpClient::replying(200, r#"{"errorCode":0,"data":{"personId":"p-1"}}"#);
		let client = GigyaClient::new(&http, ROOT, "api-key").expect("Root URL should parse.");

		assert_eq!(client.person_id("login-token").await.expect("Account info works."), "p-1");
		assert_eq!(http.last_request().get("oauth_token"), Some("login-token"));

		http.responses
			.lock()
			.push(Ok(HttpResponse { status: 200, body: br#"{"id_token":"jwt"}"#.to_vec() }));

		assert_eq!(client.jwt("login-token").await.expect("JWT exchange works."), "jwt");

		let request = http.last_request();

		assert_eq!(request.url.as_str(), "https://accounts.example.com/accounts.getJWT");
		assert_eq!(request.get("fields"), Some(JWT_FIELDS));
		assert_eq!(request.get("expiration"), Some("900"));
	}

	#[tokio::test]
	async fn non_zero_error_code_is_an_upstream_failure() {
		let http = ScriptedHttpClient::replying(
			200,
			r#"{"errorCode":403042,"errorDetails":"invalid loginID or password","errorMessage":"Invalid LoginID"}"#,
		);
		let client = GigyaClient::new(&http, ROOT, "api-key").expect("Root URL should parse.");
		let err = client.login("user", "wrong").await.expect_err("Gigya errors must surface.");

		assert!(matches!(
			err,
			Error::Upstream(UpstreamError::Gigya { code: 403042, ref details, .. })
				if details == "invalid loginID or password"
		));
	}

	#[tokio::test]
	async fn http_errors_keep_status_and_body_preview() {
		let http = ScriptedHttpClient::replying(502, "bad gateway");
		let client = GigyaClient::new(&http, ROOT, "api-key").expect("Root URL should parse.");
		let err = client.jwt("token").await.expect_err("HTTP 502 must surface.");

		assert!(matches!(
			err,
			Error::Upstream(UpstreamError::Status { status: 502, ref body, endpoint: JWT_ENDPOINT })
				if body == "bad gateway"
		));

		let http = ScriptedHttpClient::replying(
			401,
			r#"{"errorCode":403005,"errorMessage":"Unauthorized user"}"#,
		);
		let client = GigyaClient::new(&http, ROOT, "api-key").expect("Root URL should parse.");
		let err = client.person_id("token").await.expect_err("HTTP 401 must surface.");

		assert!(matches!(err, Error::Upstream(UpstreamError::Gigya { code: 403005, .. })));
	}

	#[tokio::test]
	async fn malformed_and_incomplete_bodies_are_rejected() {
		let http = ScriptedHttpClient::replying(200, "<html>");
		let client = GigyaClient::new(&http, ROOT, "api-key").expect("Root URL should parse.");
		let err = client.login("user", "pass").await.expect_err("HTML bodies must not parse.");

		assert!(matches!(err, Error::Upstream(UpstreamError::ResponseParse { .. })));

		let http = ScriptedHttpClient::replying(200, r#"{"errorCode":0,"sessionInfo":{}}"#);
		let client = GigyaClient::new(&http, ROOT, "api-key").expect("Root URL should parse.");
		let err = client.login("user", "pass").await.expect_err("Missing tokens must surface.");

		assert!(matches!(
			err,
			Error::Upstream(UpstreamError::MissingField { field: "sessionInfo.cookieValue", .. })
		));
	}

	#[tokio::test]
	async fn transport_failures_pass_through() {
		let http = ScriptedHttpClient::failing(TransportError::Io(std::io::Error::other("reset")));
		let client = GigyaClient::new(&http, ROOT, "api-key").expect("Root URL should parse.");
		let err = client.jwt("token").await.expect_err("Transport errors must surface.");

		assert!(matches!(err, Error::Transport(TransportError::Io(_))));
	}

	#[test]
	fn invalid_root_urls_are_config_errors() {
		let http = ScriptedHttpClient::default();
		let err = GigyaClient::new(&http, "not a url", "api-key")
			.expect_err("Unparseable root URLs must be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidRootUrl { .. })));
	}
}
