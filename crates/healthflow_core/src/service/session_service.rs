//! Local account and session service.
//!
//! # Responsibility
//! - Register the single on-device profile and open sessions for it.
//! - Edit profile fields and track onboarding state.
//!
//! # Invariants
//! - New credentials are stored hashed; a legacy plaintext credential is
//!   upgraded to a hash after the first successful login.
//! - Logout clears session flags only.
//! - Emails and passwords never appear in log lines.

use crate::clock::member_since_label;
use crate::model::profile::Profile;
use crate::policy::session::{launch_route, register, LaunchRoute, ValidationError};
use crate::service::credential::{hash_password, is_hashed, verify_password, CredentialError};
use crate::store::keys;
use crate::store::kv_store::{KeyValueStore, PersistenceError, StoreResult};
use crate::store::record_store::RecordStore;
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum SessionError {
    Validation(ValidationError),
    Credential(CredentialError),
    Persistence(PersistenceError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Credential(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Credential(err) => Some(err),
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<ValidationError> for SessionError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<CredentialError> for SessionError {
    fn from(value: CredentialError) -> Self {
        Self::Credential(value)
    }
}

impl From<PersistenceError> for SessionError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

pub struct SessionService<S: KeyValueStore> {
    store: RecordStore<S>,
}

impl<S: KeyValueStore> SessionService<S> {
    pub fn new(kv: S) -> Self {
        Self {
            store: RecordStore::new(kv),
        }
    }

    /// Checks credentials against the stored profile.
    ///
    /// Returns `Ok(false)` for empty input or a mismatch; storage is only
    /// touched on success.
    pub fn login(&self, email: &str, password: &str, remember_me: bool) -> StoreResult<bool> {
        let (email, password) = (email.trim(), password.trim());
        if email.is_empty() || password.is_empty() {
            info!("event=login module=service status=rejected reason=empty_field");
            return Ok(false);
        }

        let stored_credential = self.store.user_credential()?;
        let matched =
            email == self.store.user_email()? && verify_password(password, &stored_credential);
        if !matched {
            info!("event=login module=service status=rejected reason=mismatch");
            return Ok(false);
        }

        if !is_hashed(&stored_credential) {
            match hash_password(password) {
                Ok(hashed) => {
                    self.store.set_user_credential(&hashed)?;
                    info!("event=credential_upgrade module=service status=ok");
                }
                Err(_) => {
                    warn!(
                        "event=credential_upgrade module=service status=error error_code=hash_failed"
                    );
                }
            }
        }
        self.store.start_session(email, remember_me)?;
        info!(
            "event=login module=service status=ok remember_me={}",
            remember_me
        );
        Ok(true)
    }

    /// Creates the local profile and opens a session for it.
    pub fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        remember_me: bool,
        today: NaiveDate,
    ) -> Result<Profile, SessionError> {
        let registration = register(name, email, password)?;
        let credential = hash_password(&registration.password)?;

        self.store.kv().put_many(&[
            (keys::USER_NAME, registration.name.clone()),
            (keys::USER_EMAIL, registration.email.clone()),
            (keys::USER_PASSWORD, credential),
            (keys::MEMBER_SINCE, member_since_label(today)),
            (keys::IS_LOGGED_IN, true.to_string()),
            (keys::ACTIVE_USER_EMAIL, registration.email.clone()),
            (keys::REMEMBER_ME, remember_me.to_string()),
        ])?;
        info!("event=register module=service status=ok");

        Ok(self.profile(today)?)
    }

    pub fn logout(&self) -> StoreResult<()> {
        self.store.clear_session()?;
        info!("event=logout module=service status=ok");
        Ok(())
    }

    pub fn is_logged_in(&self) -> StoreResult<bool> {
        self.store.is_logged_in()
    }

    pub fn profile(&self, today: NaiveDate) -> StoreResult<Profile> {
        Ok(Profile {
            name: self.store.user_name()?,
            email: self.store.user_email()?,
            credential: self.store.user_credential()?,
            avatar: self.store.user_avatar()?,
            member_since: self.store.member_since(today)?,
        })
    }

    /// Updates display name and email; the name must not be blank.
    pub fn update_profile(
        &self,
        name: &str,
        email: &str,
        today: NaiveDate,
    ) -> Result<Profile, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::Validation(ValidationError::EmptyField));
        }
        self.store.kv().put_many(&[
            (keys::USER_NAME, name.to_string()),
            (keys::USER_EMAIL, email.trim().to_string()),
        ])?;
        info!("event=profile_update module=service status=ok");
        Ok(self.profile(today)?)
    }

    pub fn set_avatar(&self, emoji: &str) -> StoreResult<()> {
        self.store.set_user_avatar(emoji)
    }

    pub fn complete_onboarding(&self) -> StoreResult<()> {
        self.store.set_onboarding_completed(true)
    }

    /// Consumes the first-launch flag.
    pub fn take_first_launch(&self) -> StoreResult<bool> {
        self.store.take_first_launch()
    }

    pub fn launch_route(&self) -> StoreResult<LaunchRoute> {
        Ok(launch_route(
            self.store.onboarding_completed()?,
            self.store.is_logged_in()?,
        ))
    }
}
