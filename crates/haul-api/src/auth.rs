//! Admin credential checking.
//!
//! Admin-only routes take the [`Admin`] extractor, which defers to whatever
//! [`AdminAuth`] implementation is installed in [`AppState`]. The shipped
//! implementation is [`BasicAuth`]: HTTP Basic credentials checked against
//! an argon2 password hash.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use haul_core::store::PickupStore;

use crate::{AppState, error::ApiError};

/// A pluggable check that a request carries admin credentials.
pub trait AdminAuth: Send + Sync {
  fn verify(&self, headers: &HeaderMap) -> Result<(), ApiError>;
}

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct BasicAuth {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

impl BasicAuth {
  fn accepts(&self, username: &str, password: &str) -> bool {
    if username != self.username {
      return false;
    }
    // A malformed configured hash rejects every login.
    PasswordHash::new(&self.password_hash).is_ok_and(|hash| {
      Argon2::default()
        .verify_password(password.as_bytes(), &hash)
        .is_ok()
    })
  }
}

impl AdminAuth for BasicAuth {
  fn verify(&self, headers: &HeaderMap) -> Result<(), ApiError> {
    match basic_credentials(headers) {
      Some((username, password)) if self.accepts(&username, &password) => Ok(()),
      _ => Err(ApiError::Unauthorized),
    }
  }
}

/// Decode `Authorization: Basic <base64(user:pass)>`.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
  let encoded = headers
    .get(axum::http::header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Basic ")?;
  let decoded = String::from_utf8(B64.decode(encoded).ok()?).ok()?;
  let (username, password) = decoded.split_once(':')?;
  Some((username.to_owned(), password.to_owned()))
}

/// Zero-size marker: present in the handler means the request was made by
/// an admin.
pub struct Admin;

impl<S> FromRequestParts<AppState<S>> for Admin
where
  S: PickupStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    state.admin.verify(&parts.headers)?;
    Ok(Admin)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, OnceLock};

  use axum::http::{HeaderValue, Request, header};
  use haul_store_sqlite::SqliteStore;

  use super::*;
  use crate::ClientConfig;

  const PASSWORD: &str = "pickup-day";

  /// One hash per test binary; argon2 is deliberately slow.
  fn hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| {
      use argon2::{PasswordHasher, password_hash::SaltString};
      use rand_core::OsRng;
      let salt = SaltString::generate(&mut OsRng);
      Argon2::default()
        .hash_password(PASSWORD.as_bytes(), &salt)
        .unwrap()
        .to_string()
    })
  }

  fn basic_auth() -> BasicAuth {
    BasicAuth { username: "dispatch".into(), password_hash: hash().into() }
  }

  fn authorization(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    h
  }

  fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn extract_admin(auth: BasicAuth, headers: HeaderMap) -> Result<Admin, ApiError> {
    let state = AppState {
      store:  Arc::new(SqliteStore::open_in_memory().await.unwrap()),
      admin:  Arc::new(auth),
      client: Arc::new(ClientConfig::default()),
    };
    let mut req = Request::builder().uri("/submissions").body(()).unwrap();
    *req.headers_mut() = headers;
    let (mut parts, ()) = req.into_parts();
    Admin::from_request_parts(&mut parts, &state).await
  }

  #[test]
  fn credentials_are_decoded_from_basic_header() {
    let headers = authorization(&basic("dispatch", "pa:ss"));
    assert_eq!(
      basic_credentials(&headers),
      Some(("dispatch".to_owned(), "pa:ss".to_owned()))
    );
    assert_eq!(basic_credentials(&authorization("Bearer abc")), None);
    assert_eq!(basic_credentials(&authorization("Basic !!!")), None);
    assert_eq!(basic_credentials(&HeaderMap::new()), None);
  }

  #[tokio::test]
  async fn extractor_admits_configured_admin() {
    let headers = authorization(&basic("dispatch", PASSWORD));
    assert!(extract_admin(basic_auth(), headers).await.is_ok());
  }

  #[tokio::test]
  async fn extractor_rejects_other_credentials() {
    for headers in [
      authorization(&basic("dispatch", "wrong")),
      authorization(&basic("admin", PASSWORD)),
      HeaderMap::new(),
    ] {
      assert!(matches!(
        extract_admin(basic_auth(), headers).await,
        Err(ApiError::Unauthorized)
      ));
    }
  }

  #[tokio::test]
  async fn unparseable_configured_hash_locks_everyone_out() {
    let auth = BasicAuth {
      username:      "dispatch".into(),
      password_hash: "not-a-phc-string".into(),
    };
    let headers = authorization(&basic("dispatch", PASSWORD));
    assert!(matches!(
      extract_admin(auth, headers).await,
      Err(ApiError::Unauthorized)
    ));
  }
}
