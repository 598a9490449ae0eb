//! HTTP Basic-auth middleware.
//!
//! Verifies credentials against the configured user list and installs the
//! resulting [`AuthenticatedUser`] extension the API handlers extract. The
//! username is the opaque user id records are partitioned by.

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::{Request, State},
  http::{HeaderMap, StatusCode, header},
  middleware::Next,
  response::{IntoResponse, Response},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use homecal_api::auth::AuthenticatedUser;

use crate::settings::UserCredential;

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub users: Vec<UserCredential>,
}

/// Verify a Basic authorization header. Returns the authenticated username.
pub fn verify_basic(headers: &HeaderMap, auth: &AuthConfig) -> Option<String> {
  let header_val = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
  let encoded = header_val.strip_prefix("Basic ")?;
  let decoded = B64.decode(encoded).ok()?;
  let creds = std::str::from_utf8(&decoded).ok()?;
  let (username, password) = creds.split_once(':')?;

  let cred = auth.users.iter().find(|u| u.username == username)?;
  let parsed_hash = PasswordHash::new(&cred.password_hash).ok()?;
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .ok()?;

  Some(username.to_string())
}

/// Middleware: reject unauthenticated requests, tag the rest with their
/// verified identity.
pub async fn require_basic_auth(
  State(auth): State<Arc<AuthConfig>>,
  mut req: Request,
  next: Next,
) -> Response {
  match verify_basic(req.headers(), &auth) {
    Some(user) => {
      req.extensions_mut().insert(AuthenticatedUser(user));
      next.run(req).await
    }
    None => (
      StatusCode::UNAUTHORIZED,
      [(header::WWW_AUTHENTICATE, "Basic realm=\"homecal\"")],
      "unauthorized",
    )
      .into_response(),
  }
}

#[cfg(test)]
mod tests {
  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use rand_core::OsRng;

  use super::*;

  fn make_auth(username: &str, password: &str) -> AuthConfig {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();
    AuthConfig {
      users: vec![UserCredential {
        username:      username.to_string(),
        password_hash: hash,
      }],
    }
  }

  fn basic(user: &str, pass: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let encoded = B64.encode(format!("{user}:{pass}"));
    headers.insert(
      header::AUTHORIZATION,
      format!("Basic {encoded}").parse().unwrap(),
    );
    headers
  }

  #[test]
  fn correct_credentials() {
    let auth = make_auth("alice", "secret");
    assert_eq!(
      verify_basic(&basic("alice", "secret"), &auth),
      Some("alice".to_string())
    );
  }

  #[test]
  fn wrong_password() {
    let auth = make_auth("alice", "secret");
    assert_eq!(verify_basic(&basic("alice", "wrong"), &auth), None);
  }

  #[test]
  fn unknown_user() {
    let auth = make_auth("alice", "secret");
    assert_eq!(verify_basic(&basic("mallory", "secret"), &auth), None);
  }

  #[test]
  fn missing_header() {
    let auth = make_auth("alice", "secret");
    assert_eq!(verify_basic(&HeaderMap::new(), &auth), None);
  }

  #[test]
  fn invalid_base64() {
    let auth = make_auth("alice", "secret");
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, "Basic !!!not-base64!!!".parse().unwrap());
    assert_eq!(verify_basic(&headers, &auth), None);
  }
}
