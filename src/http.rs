//! Transport primitives for identity-provider exchanges.
//!
//! The session only ever POSTs form-encoded bodies and reads back a status and a body, so
//! [`HttpTransport`] is that narrow. Bring a custom client by implementing the
//! trait; the reqwest-backed [`ReqwestHttpClient`] ships behind the default `reqwest` feature.

// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`HttpTransport::post`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Form-encoded POST request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
	/// Absolute endpoint URL.
	pub url: Url,
	/// Form fields, sent in order.
	pub form: Vec<(String, String)>,
}
impl HttpRequest {
	/// Creates a request with an empty form.
	pub fn new(url: Url) -> Self {
		Self { url, form: Vec::new() }
	}

	/// Appends a form field.
	pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.form.push((key.into(), value.into()));

		self
	}

	/// Returns the first value recorded for `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.form.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
	}
}

/// Raw response returned by a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Abstraction over HTTP stacks capable of executing identity-provider requests.
///
/// Implementations must be `Send + Sync + 'static` so one transport can back many sessions,
/// and the futures they return must be `Send` so session futures can hop executors. A
/// non-2xx status is not a transport error: return it as an [`HttpResponse`] and let the
/// session classify it.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and resolves to the status and body of the response.
	fn post(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that does not follow redirects, matching the identity provider's
	/// direct-response endpoints.
	pub fn try_new() -> Result<Self> {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(crate::error::ConfigError::http_client_build)?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	fn post(&self, request: HttpRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client.post(request.url).form(&request.form).send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(HttpResponse { status, body })
		})
	}
}
