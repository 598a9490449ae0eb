//! Runtime server configuration, deserialised from `config.toml`.

use std::path::PathBuf;

use serde::Deserialize;

/// One account allowed to sign in. The username doubles as the opaque user
/// id that records are scoped by.
#[derive(Debug, Clone, Deserialize)]
pub struct UserCredential {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  #[serde(default)]
  pub users:      Vec<UserCredential>,
}
