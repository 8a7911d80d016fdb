//! Credential Store Use Case - Registered Users
//!
//! Keeps the list of registered users under the `"users"` key. The
//! list is read fresh for every operation; writes hold an async mutex
//! across the read-modify-write so two registrations for the same email
//! cannot both succeed.
//!
//! Passwords are stored as Argon2 PHC strings and checked with the
//! Argon2 verifier.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

use crate::domain::ids::IdGenerator;
use crate::domain::user::UserRecord;
use crate::error::AuthError;
use crate::ports::clock::Clock;
use crate::ports::kv_store::{KeyValueStore, keys, read_json, write_json};

/// User credential store backed by a key-value store.
pub struct CredentialStore<S: KeyValueStore> {
  store: Arc<S>,
  clock: Arc<dyn Clock>,
  ids: IdGenerator,
  /// Serializes read-modify-write cycles on the user list.
  write_lock: Mutex<()>,
}

impl<S: KeyValueStore> CredentialStore<S> {
  pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
    Self {
      store,
      clock,
      ids: IdGenerator::new(),
      write_lock: Mutex::new(()),
    }
  }

  /// All registered users; empty when none are stored.
  pub async fn all_users(&self) -> Result<Vec<UserRecord>, AuthError> {
    let users = read_json::<Vec<UserRecord>, _>(self.store.as_ref(), keys::USERS)
      .await
      .map_err(|e| {
        error!(error = %e, "Failed to get users");
        AuthError::from(e)
      })?;
    Ok(users.unwrap_or_default())
  }

  /// Register a new user.
  ///
  /// Returns `Ok(None)` when a user with the same email (ignoring case)
  /// already exists.
  #[instrument(skip(self, name, password))]
  pub async fn create_user(
    &self,
    name: &str,
    email: &str,
    password: &str,
  ) -> Result<Option<UserRecord>, AuthError> {
    let _guard = self.write_lock.lock().await;

    let mut users = self.all_users().await?;
    if users.iter().any(|u| u.has_email(email)) {
      info!("Email already registered");
      return Ok(None);
    }

    users.iter().for_each(|u| self.ids.observe(&u.id));
    let user = UserRecord {
      id: self.ids.next_id(self.clock.now_millis()),
      name: name.to_string(),
      email: email.to_string(),
      password_hash: hash_password(password)?,
    };

    users.push(user.clone());
    self.save(&users).await?;

    info!(user_id = %user.id, "User created");
    Ok(Some(user))
  }

  /// Find a user by email, ignoring case.
  pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
    Ok(self.all_users().await?.into_iter().find(|u| u.has_email(email)))
  }

  /// Return the user whose email matches (ignoring case) and whose
  /// password verifies, if any.
  #[instrument(skip(self, password))]
  pub async fn verify_credentials(
    &self,
    email: &str,
    password: &str,
  ) -> Result<Option<UserRecord>, AuthError> {
    Ok(
      self
        .all_users()
        .await?
        .into_iter()
        .find(|u| u.has_email(email) && password_matches(password, &u.password_hash)),
    )
  }

  /// Delete the user with `id`. Returns whether one was removed.
  #[instrument(skip(self))]
  pub async fn delete_user_by_id(&self, id: &str) -> Result<bool, AuthError> {
    let _guard = self.write_lock.lock().await;

    let users = self.all_users().await?;
    let remaining: Vec<UserRecord> = users.iter().filter(|u| u.id != id).cloned().collect();
    if remaining.len() == users.len() {
      return Ok(false);
    }

    self.save(&remaining).await?;
    info!("User deleted");
    Ok(true)
  }

  async fn save(&self, users: &[UserRecord]) -> Result<(), AuthError> {
    write_json(self.store.as_ref(), keys::USERS, users)
      .await
      .map_err(|e| {
        error!(error = %e, "Failed to save users");
        AuthError::from(e)
      })
  }
}

/// Hash `password` with a fresh random salt.
fn hash_password(password: &str) -> Result<String, AuthError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Check `password` against a stored PHC string. Unparseable hashes
/// never match.
fn password_matches(password: &str, stored: &str) -> bool {
  PasswordHash::new(stored).is_ok_and(|parsed| {
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .is_ok()
  })
}
