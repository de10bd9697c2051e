//! Admin facade.
//!
//! # Responsibility
//! - Gate the roster management operations behind the admin session.
//! - Drive the approval workflow: approve, reject, direct-create, delete.
//!
//! # Invariants
//! - The admin session is independent of the end-user session.
//! - Direct-created profiles bypass the pending gate (status `approved`)
//!   but still honor email uniqueness.
//! - Profile deletion cascades to the profile's notes.

use crate::credential::hash_credential;
use crate::model::user::{AdminSession, UserId, UserProfile, UserStatus};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::service::{require_admin, AccessError, AccessResult};
use crate::store::SessionStore;
use log::{info, warn};

/// Admin operation group.
pub struct AdminService<'a> {
    store: &'a SessionStore,
}

impl<'a> AdminService<'a> {
    pub fn new(store: &'a SessionStore) -> Self {
        Self { store }
    }

    /// Authenticates the configured admin account and sets the live admin
    /// session.
    pub fn admin_login(&self, email: &str, credential: &str) -> AccessResult<AdminSession> {
        if !self.store.verify_admin(email, credential) {
            warn!("event=admin_login module=admin status=denied reason=invalid_credential");
            return Err(AccessError::InvalidCredential);
        }

        let admin = self.store.admin_identity().clone();
        self.store.set_current_admin(Some(admin.clone()));
        info!(
            "event=admin_login module=admin status=ok admin_id={}",
            admin.id
        );
        Ok(admin)
    }

    /// Clears the live admin session unconditionally.
    pub fn admin_logout(&self) {
        self.store.set_current_admin(None);
        info!("event=admin_logout module=admin status=ok");
    }

    /// Returns the live admin session, if any. Never fails.
    pub fn current_admin(&self) -> Option<AdminSession> {
        self.store.current_admin()
    }

    /// Returns the full roster newest-first.
    pub fn list_all_users(&self) -> AccessResult<Vec<UserProfile>> {
        require_admin(self.store)?;
        let conn = self.store.conn();
        let users = SqliteUserRepository::try_new(&conn)?;
        Ok(users.list_all()?)
    }

    /// Approves one roster entry. Re-approving is accepted.
    pub fn approve_user(&self, user_id: UserId) -> AccessResult<()> {
        self.set_status(user_id, UserStatus::Approved)
    }

    /// Rejects one roster entry. Re-rejecting is accepted.
    pub fn reject_user(&self, user_id: UserId) -> AccessResult<()> {
        self.set_status(user_id, UserStatus::Rejected)
    }

    /// Creates one pre-approved roster entry, bypassing the pending gate.
    pub fn create_user_direct(
        &self,
        email: &str,
        full_name: Option<&str>,
        credential: &str,
    ) -> AccessResult<UserProfile> {
        require_admin(self.store)?;
        let conn = self.store.conn();
        let users = SqliteUserRepository::try_new(&conn)?;

        if users.find_by_email(email)?.is_some() {
            return Err(AccessError::AlreadyRegistered(email.to_string()));
        }

        let profile = UserProfile::new(
            email,
            full_name.map(str::to_string),
            UserStatus::Approved,
            self.store.now_ms(),
        );
        users.insert_profile(&profile, &hash_credential(credential))?;

        info!(
            "event=user_create_direct module=admin status=ok user_id={} profile_status=approved",
            profile.id
        );
        Ok(profile)
    }

    /// Hashes and persists a new credential for one roster entry.
    pub fn change_user_password(&self, user_id: UserId, new_credential: &str) -> AccessResult<()> {
        require_admin(self.store)?;
        let conn = self.store.conn();
        let users = SqliteUserRepository::try_new(&conn)?;

        users.set_credential_hash(user_id, &hash_credential(new_credential))?;
        info!("event=user_password_change module=admin status=ok user_id={user_id}");
        Ok(())
    }

    /// Removes one roster entry and its notes. Idempotent: absence is not
    /// an error.
    pub fn delete_user(&self, user_id: UserId) -> AccessResult<()> {
        require_admin(self.store)?;
        let conn = self.store.conn();
        let users = SqliteUserRepository::try_new(&conn)?;

        let removed = users.delete_profile(user_id)?;
        info!(
            "event=user_delete module=admin status=ok user_id={user_id} removed={removed}"
        );
        Ok(())
    }

    fn set_status(&self, user_id: UserId, status: UserStatus) -> AccessResult<()> {
        require_admin(self.store)?;
        let conn = self.store.conn();
        let users = SqliteUserRepository::try_new(&conn)?;

        users.set_status(user_id, status)?;
        info!(
            "event=user_status_change module=admin status=ok user_id={user_id} profile_status={status:?}"
        );
        Ok(())
    }
}
