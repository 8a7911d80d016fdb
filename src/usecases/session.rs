//! Session Manager Use Case - Login, Registration and Logout
//!
//! Sits on top of the credential store and keeps the logged-in user's
//! password-free snapshot under `"currentUser"`. The snapshot is a copy;
//! later changes to the credential store do not reach it.
//!
//! Biometric login is modelled only by its stored flag: the device
//! prompt is the caller's job, after which `resume_session` hands back
//! the remembered user.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::domain::user::SafeUser;
use crate::error::AuthError;
use crate::ports::kv_store::{KeyValueStore, keys, read_json, write_json};
use crate::usecases::credentials::CredentialStore;

const ENABLED: &str = "true";

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
  /// Credentials verified; the session is now persisted.
  Success(SafeUser),
  /// The email is registered but the password did not match.
  WrongPassword,
  /// No account uses this email.
  NotRegistered,
}

/// Result of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
  /// Account created and logged in.
  Registered(SafeUser),
  /// The email is already taken.
  AlreadyExists,
}

/// Tracks who is logged in.
pub struct SessionManager<S: KeyValueStore> {
  store: Arc<S>,
  credentials: Arc<CredentialStore<S>>,
}

impl<S: KeyValueStore> SessionManager<S> {
  pub fn new(store: Arc<S>, credentials: Arc<CredentialStore<S>>) -> Self {
    Self { store, credentials }
  }

  /// Log in with email and password.
  #[instrument(skip(self, password))]
  pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
    if self.credentials.find_user_by_email(email).await?.is_none() {
      info!("Login for unregistered email");
      return Ok(LoginOutcome::NotRegistered);
    }

    match self.credentials.verify_credentials(email, password).await? {
      Some(user) => {
        let safe = user.to_safe();
        write_json(self.store.as_ref(), keys::CURRENT_USER, &safe).await?;
        info!(user_id = %safe.id, "Logged in");
        Ok(LoginOutcome::Success(safe))
      }
      None => {
        warn!("Login rejected: wrong password");
        Ok(LoginOutcome::WrongPassword)
      }
    }
  }

  /// Create an account and log it in.
  #[instrument(skip(self, name, password))]
  pub async fn register(
    &self,
    name: &str,
    email: &str,
    password: &str,
  ) -> Result<RegisterOutcome, AuthError> {
    let Some(user) = self.credentials.create_user(name, email, password).await? else {
      return Ok(RegisterOutcome::AlreadyExists);
    };

    let safe = user.to_safe();
    write_json(self.store.as_ref(), keys::CURRENT_USER, &safe).await?;
    info!(user_id = %safe.id, "Registered and logged in");
    Ok(RegisterOutcome::Registered(safe))
  }

  /// Forget the current user and disable biometric login.
  #[instrument(skip(self))]
  pub async fn logout(&self) -> Result<(), AuthError> {
    self.store.remove(keys::CURRENT_USER).await?;
    self.store.remove(keys::BIOMETRIC_ENABLED).await?;
    info!("Logged out");
    Ok(())
  }

  /// The persisted snapshot of the logged-in user, if any.
  pub async fn current_user(&self) -> Result<Option<SafeUser>, AuthError> {
    Ok(read_json(self.store.as_ref(), keys::CURRENT_USER).await?)
  }

  /// Turn on biometric login (after the device prompt succeeded).
  pub async fn enable_biometric(&self) -> Result<(), AuthError> {
    self.store.set(keys::BIOMETRIC_ENABLED, ENABLED).await?;
    info!("Biometric login enabled");
    Ok(())
  }

  /// Whether biometric login is on. Anything but `"true"` means off.
  pub async fn is_biometric_enabled(&self) -> Result<bool, AuthError> {
    Ok(self.store.get(keys::BIOMETRIC_ENABLED).await?.as_deref() == Some(ENABLED))
  }

  /// Restore the remembered user after a successful biometric prompt.
  ///
  /// Returns `None` when biometric login is off or nobody is remembered.
  pub async fn resume_session(&self) -> Result<Option<SafeUser>, AuthError> {
    if !self.is_biometric_enabled().await? {
      return Ok(None);
    }
    self.current_user().await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::adapters::{FixedClock, MemoryStore};
  use chrono::NaiveDate;

  fn session() -> (Arc<MemoryStore>, SessionManager<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
    let credentials = Arc::new(CredentialStore::new(Arc::clone(&store), clock));
    (Arc::clone(&store), SessionManager::new(store, credentials))
  }

  #[tokio::test]
  async fn test_register_then_login() {
    let (_, session) = session();

    let RegisterOutcome::Registered(user) =
      session.register("Asha", "asha@example.com", "pw").await.unwrap()
    else {
      panic!("expected registration");
    };
    assert_eq!(session.current_user().await.unwrap(), Some(user.clone()));

    session.logout().await.unwrap();
    assert_eq!(session.current_user().await.unwrap(), None);

    assert_eq!(
      session.login("ASHA@example.com", "pw").await.unwrap(),
      LoginOutcome::Success(user.clone())
    );
    assert_eq!(session.current_user().await.unwrap(), Some(user));
  }

  #[tokio::test]
  async fn test_register_existing_email() {
    let (_, session) = session();
    session.register("A", "a@example.com", "pw").await.unwrap();
    assert_eq!(
      session.register("B", "A@example.com", "pw").await.unwrap(),
      RegisterOutcome::AlreadyExists
    );
  }

  #[tokio::test]
  async fn test_login_distinguishes_failures() {
    let (_, session) = session();
    session.register("A", "a@example.com", "pw").await.unwrap();
    session.logout().await.unwrap();

    assert_eq!(
      session.login("b@example.com", "pw").await.unwrap(),
      LoginOutcome::NotRegistered
    );
    assert_eq!(
      session.login("a@example.com", "wrong").await.unwrap(),
      LoginOutcome::WrongPassword
    );
    assert_eq!(session.current_user().await.unwrap(), None);
  }

  #[tokio::test]
  async fn test_current_user_has_no_password() {
    let (store, session) = session();
    session.register("A", "a@example.com", "pw").await.unwrap();

    let raw = store.get(keys::CURRENT_USER).await.unwrap().unwrap();
    assert!(!raw.contains("password"));
  }

  #[tokio::test]
  async fn test_biometric_flag_and_resume() {
    let (store, session) = session();
    session.register("A", "a@example.com", "pw").await.unwrap();

    assert!(!session.is_biometric_enabled().await.unwrap());
    assert_eq!(session.resume_session().await.unwrap(), None);

    session.enable_biometric().await.unwrap();
    assert_eq!(
      store.get(keys::BIOMETRIC_ENABLED).await.unwrap().as_deref(),
      Some("true")
    );
    assert!(session.resume_session().await.unwrap().is_some());

    session.logout().await.unwrap();
    assert!(!session.is_biometric_enabled().await.unwrap());
    assert_eq!(session.resume_session().await.unwrap(), None);
  }

  #[tokio::test]
  async fn test_non_literal_flag_is_disabled() {
    let (store, session) = session();
    store.set(keys::BIOMETRIC_ENABLED, "yes").await.unwrap();
    assert!(!session.is_biometric_enabled().await.unwrap());
  }
}
