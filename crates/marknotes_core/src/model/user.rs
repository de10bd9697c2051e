//! Roster profile and session identity models.
//!
//! # Responsibility
//! - Define the roster record (`UserProfile`) and the live session
//!   identities (`EndUser`, `AdminSession`) derived from it.
//!
//! # Invariants
//! - `id` is stable and never reused for another profile.
//! - `email` is unique across the roster (enforced by storage).
//! - The stored credential hash is not part of any read model here.

use crate::model::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for roster profiles and session identities.
pub type UserId = Uuid;

/// Approval workflow state for a roster profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Created via signup, waiting for an admin decision.
    Pending,
    /// Allowed to log in.
    Approved,
    /// Explicitly turned away by an admin.
    Rejected,
}

/// Live end-user session identity.
///
/// Also serves as the reduced identity view returned by `signup` and
/// `get_profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndUser {
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
}

/// Live admin session identity. Independent of [`EndUser`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
}

/// Roster record for one registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable profile id.
    pub id: UserId,
    /// Unique login email.
    pub email: String,
    /// Optional display name.
    pub full_name: Option<String>,
    /// Approval workflow state.
    pub status: UserStatus,
    /// Creation timestamp in epoch milliseconds.
    pub created_at: i64,
    /// Mutation counter, bumped by storage on every write.
    pub version: i64,
}

impl UserProfile {
    /// Creates a profile with a generated stable id and version 1.
    pub fn new(
        email: impl Into<String>,
        full_name: Option<String>,
        status: UserStatus,
        created_at: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            full_name,
            status,
            created_at,
            version: 1,
        }
    }

    /// Derives the session/view identity for this profile.
    pub fn identity(&self) -> EndUser {
        EndUser {
            id: self.id,
            email: self.email.clone(),
            full_name: self.full_name.clone(),
        }
    }

    /// Presence checks run before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() {
            return Err(ValidationError::BlankEmail);
        }
        Ok(())
    }
}
