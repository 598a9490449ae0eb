//! Identity extraction for API handlers.
//!
//! The API does not verify credentials itself; the transport layer does,
//! and records the outcome as an [`AuthenticatedUser`] request extension.
//! Handlers take a [`CurrentUser`] argument, which rejects with 401 when the
//! extension is missing. Identity is therefore an unavoidable, explicit
//! parameter of every operation — never inferred.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;

/// Opaque authenticated-user identifier, installed by the transport layer
/// after credential verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

/// Extractor: the verified identity of the caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<AuthenticatedUser>()
      .map(|u| Self(u.0.clone()))
      .ok_or(ApiError::Unauthorized)
  }
}

#[cfg(test)]
mod tests {
  use axum::http::Request;

  use super::*;

  async fn extract(req: Request<axum::body::Body>) -> Result<CurrentUser, ApiError> {
    let (mut parts, _) = req.into_parts();
    CurrentUser::from_request_parts(&mut parts, &()).await
  }

  #[tokio::test]
  async fn present_extension_yields_the_user() {
    let mut req = Request::builder().body(axum::body::Body::empty()).unwrap();
    req
      .extensions_mut()
      .insert(AuthenticatedUser("alice".to_string()));
    let user = extract(req).await.unwrap();
    assert_eq!(user.0, "alice");
  }

  #[tokio::test]
  async fn missing_extension_is_unauthorized() {
    let req = Request::builder().body(axum::body::Body::empty()).unwrap();
    assert!(matches!(extract(req).await, Err(ApiError::Unauthorized)));
  }
}
