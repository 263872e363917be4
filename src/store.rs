//! Thread-safe in-memory credential cache owned by a session.

// self
use crate::{
	_prelude::*,
	auth::{Credential, CredentialName},
};

type CredentialMap = Arc<RwLock<HashMap<CredentialName, Credential>>>;

/// Credential cache keyed by [`CredentialName`].
///
/// Clones share the same map, so a caller can keep a handle to the store it hands to a
/// session and inspect what the session cached. Expired credentials behave exactly like
/// absent ones and are evicted on lookup.
#[derive(Clone, Debug, Default)]
pub struct CredentialStore(CredentialMap);
impl CredentialStore {
	/// Returns the credential stored under `name`.
	pub fn get(&self, name: &str) -> Result<Credential> {
		Self::get_now(&self.0, name, OffsetDateTime::now_utc())
	}

	/// Returns the exposed value stored under `name`.
	pub fn get_value(&self, name: &str) -> Result<String> {
		self.get(name).map(|credential| credential.value.into_inner())
	}

	/// Stores or replaces the credential under `name`.
	pub fn set(&self, name: CredentialName, credential: Credential) {
		self.0.write().insert(name, credential);
	}

	/// Stores `credential` only when no live credential is held under `name`.
	///
	/// Returns `true` when the value was inserted.
	pub fn set_if_absent(&self, name: CredentialName, credential: Credential) -> bool {
		let now = OffsetDateTime::now_utc();
		let mut guard = self.0.write();

		match guard.get(&name) {
			Some(existing) if !existing.is_expired_at(now) => false,
			_ => {
				guard.insert(name, credential);

				true
			},
		}
	}

	/// Returns `true` when a live credential is held under `name`.
	pub fn has(&self, name: &str) -> bool {
		self.get(name).is_ok()
	}

	/// Removes the credential stored under `name`.
	pub fn remove(&self, name: &str) -> Option<Credential> {
		self.0.write().remove(name)
	}

	/// Drops every credential except the permanent, locale-derived ones.
	pub fn clear(&self) {
		self.0.write().retain(|name, _| name.is_permanent());
	}

	/// Returns the number of stored credentials, expired ones included.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn get_now(map: &CredentialMap, name: &str, now: OffsetDateTime) -> Result<Credential> {
		{
			let guard = map.read();

			match guard.get(name) {
				Some(credential) if !credential.is_expired_at(now) =>
					return Ok(credential.clone()),
				None => return Err(Error::not_found(name)),
				Some(_) => {},
			}
		}

		let mut guard = map.write();

		if guard.get(name).is_some_and(|credential| credential.is_expired_at(now)) {
			guard.remove(name);
		}

		Err(Error::not_found(name))
	}
}
