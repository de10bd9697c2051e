//! Profile facade.
//!
//! # Responsibility
//! - Expose the session owner's roster profile for read/update.
//! - Rotate the session owner's stored credential hash.
//!
//! # Invariants
//! - Every operation authorizes by identity match: a requested id other
//!   than the session identity is rejected, never silently substituted.
//! - Display-name updates are mirrored onto the live session identity.

use crate::credential::hash_credential;
use crate::model::user::{EndUser, UserId};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::service::{require_user_matching, AccessError, AccessResult};
use crate::store::SessionStore;
use log::info;

/// Partial-update request for the session owner's profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    /// New display name; unset leaves the stored value.
    pub full_name: Option<String>,
}

/// Profile operation group.
pub struct ProfileService<'a> {
    store: &'a SessionStore,
}

impl<'a> ProfileService<'a> {
    pub fn new(store: &'a SessionStore) -> Self {
        Self { store }
    }

    /// Returns the roster-derived view of the session owner's profile.
    pub fn get_profile(&self, user_id: UserId) -> AccessResult<EndUser> {
        require_user_matching(self.store, user_id)?;
        let conn = self.store.conn();
        let users = SqliteUserRepository::try_new(&conn)?;

        users
            .find_by_id(user_id)?
            .map(|profile| profile.identity())
            .ok_or_else(|| AccessError::NotFound {
                entity: "user",
                key: user_id.to_string(),
            })
    }

    /// Applies the patch to the roster row and the live session identity.
    pub fn update_profile(&self, user_id: UserId, patch: &ProfilePatch) -> AccessResult<EndUser> {
        require_user_matching(self.store, user_id)?;
        let conn = self.store.conn();
        let users = SqliteUserRepository::try_new(&conn)?;

        if let Some(full_name) = &patch.full_name {
            users.set_full_name(user_id, Some(full_name.as_str()))?;
        }

        let updated = users
            .find_by_id(user_id)?
            .ok_or_else(|| AccessError::NotFound {
                entity: "user",
                key: user_id.to_string(),
            })?;
        drop(conn);

        let identity = updated.identity();
        self.store.set_current_user(Some(identity.clone()));
        info!(
            "event=profile_update module=profile status=ok user_id={user_id} version={}",
            updated.version
        );
        Ok(identity)
    }

    /// Hashes and persists a new credential for the session owner.
    ///
    /// A subsequent `login` verifies against the new credential.
    pub fn change_password(&self, user_id: UserId, new_credential: &str) -> AccessResult<()> {
        require_user_matching(self.store, user_id)?;
        let conn = self.store.conn();
        let users = SqliteUserRepository::try_new(&conn)?;

        users.set_credential_hash(user_id, &hash_credential(new_credential))?;
        info!("event=password_change module=profile status=ok user_id={user_id}");
        Ok(())
    }
}
