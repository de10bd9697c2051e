//! End-user auth facade.
//!
//! # Responsibility
//! - Gate end-user login on roster membership, approval status, and the
//!   stored per-profile credential hash, in that order.
//! - Register new accounts as `pending` without establishing a session.
//!
//! # Invariants
//! - A signup never sets the live end-user; the approval gate blocks
//!   login until an admin acts.
//! - Raw credentials are hashed before storage and never logged.

use crate::credential::{hash_credential, verify_credential};
use crate::model::user::{EndUser, UserProfile, UserStatus};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::service::{AccessError, AccessResult};
use crate::store::SessionStore;
use log::{info, warn};

/// Auth operation group.
pub struct AuthService<'a> {
    store: &'a SessionStore,
}

impl<'a> AuthService<'a> {
    pub fn new(store: &'a SessionStore) -> Self {
        Self { store }
    }

    /// Authenticates one end-user and sets the live session.
    ///
    /// Check order is part of the contract: unknown email is `NotFound`,
    /// an unapproved account is `PendingApproval` (never `NotFound`), and
    /// only then is the credential verified.
    pub fn login(&self, email: &str, credential: &str) -> AccessResult<EndUser> {
        let conn = self.store.conn();
        let users = SqliteUserRepository::try_new(&conn)?;

        let profile = users
            .find_by_email(email)?
            .ok_or_else(|| AccessError::NotFound {
                entity: "user",
                key: email.to_string(),
            })?;

        if profile.status != UserStatus::Approved {
            warn!(
                "event=login module=auth status=denied reason=pending_approval user_id={}",
                profile.id
            );
            return Err(AccessError::PendingApproval(profile.email));
        }

        let stored = users
            .credential_hash_by_email(email)?
            .ok_or_else(|| AccessError::NotFound {
                entity: "user",
                key: email.to_string(),
            })?;
        if !verify_credential(credential, &stored) {
            warn!(
                "event=login module=auth status=denied reason=invalid_credential user_id={}",
                profile.id
            );
            return Err(AccessError::InvalidCredential);
        }
        drop(conn);

        let user = profile.identity();
        self.store.set_current_user(Some(user.clone()));
        info!("event=login module=auth status=ok user_id={}", user.id);
        Ok(user)
    }

    /// Registers a new `pending` account and returns its identity view.
    pub fn signup(
        &self,
        email: &str,
        credential: &str,
        full_name: Option<&str>,
    ) -> AccessResult<EndUser> {
        let conn = self.store.conn();
        let users = SqliteUserRepository::try_new(&conn)?;

        if users.find_by_email(email)?.is_some() {
            return Err(AccessError::AlreadyRegistered(email.to_string()));
        }

        let profile = UserProfile::new(
            email,
            full_name.map(str::to_string),
            UserStatus::Pending,
            self.store.now_ms(),
        );
        users.insert_profile(&profile, &hash_credential(credential))?;

        info!(
            "event=signup module=auth status=ok user_id={} profile_status=pending",
            profile.id
        );
        Ok(profile.identity())
    }

    /// Clears the live end-user session unconditionally.
    pub fn logout(&self) {
        self.store.set_current_user(None);
        info!("event=logout module=auth status=ok");
    }

    /// Returns the live end-user session, if any. Never fails.
    pub fn current_user(&self) -> Option<EndUser> {
        self.store.current_user()
    }
}
