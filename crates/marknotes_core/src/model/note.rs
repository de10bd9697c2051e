//! Note domain model.
//!
//! # Responsibility
//! - Define the note record and its variant-specific fields.
//! - Provide the expiry check used by lazy read-time enforcement.
//!
//! # Invariants
//! - `self_destruct_at` is set if and only if `kind` is `SelfDestructing`.
//! - `encrypted_content`/`password_hash` are set only when `kind` is
//!   `Protected`; once a password hash is present, `encrypted_content` is
//!   the authoritative payload and plaintext `content` is advisory.

use crate::model::user::UserId;
use crate::model::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for notes.
pub type NoteId = Uuid;

/// Behavior variant for a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    /// Plain markdown note.
    Normal,
    /// Carries an encrypted payload guarded by a caller-supplied hash.
    Protected,
    /// Carries an absolute expiry; absent from reads once past it.
    SelfDestructing,
}

/// Canonical note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Stable note id.
    pub id: NoteId,
    /// Owning profile id; every read path is scoped by it.
    pub owner_id: UserId,
    pub title: String,
    /// Markdown-flavored body.
    pub content: String,
    /// Serialized as `note_type` to match the external schema naming.
    #[serde(rename = "note_type")]
    pub kind: NoteKind,
    /// Authoritative payload for protected notes once a password is set.
    pub encrypted_content: Option<String>,
    /// Caller-supplied password hash slot for protected notes.
    pub password_hash: Option<String>,
    /// Absolute expiry in epoch milliseconds for self-destructing notes.
    pub self_destruct_at: Option<i64>,
    /// Derived plain-text projection for list views.
    pub preview_text: Option<String>,
    /// Creation timestamp in epoch milliseconds.
    pub created_at: i64,
    /// Last mutation timestamp, strictly greater than `created_at` after
    /// any update.
    pub updated_at: i64,
    /// Mutation counter used for optimistic concurrency checks.
    pub version: i64,
}

impl Note {
    /// Creates a bare note with a generated id and version 1.
    ///
    /// Variant-specific fields start unset; the notes service fills them in
    /// before persistence.
    pub fn new(
        owner_id: UserId,
        title: impl Into<String>,
        kind: NoteKind,
        created_at: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: title.into(),
            content: String::new(),
            kind,
            encrypted_content: None,
            password_hash: None,
            self_destruct_at: None,
            preview_text: None,
            created_at,
            updated_at: created_at,
            version: 1,
        }
    }

    /// Returns whether this note is past its expiry at `now_ms`.
    ///
    /// Always `false` for non-self-destructing notes.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        match (self.kind, self.self_destruct_at) {
            (NoteKind::SelfDestructing, Some(expiry)) => expiry <= now_ms,
            _ => false,
        }
    }

    /// Presence and variant-consistency checks run before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankTitle(self.id));
        }
        match self.kind {
            NoteKind::SelfDestructing => {
                if self.self_destruct_at.is_none() {
                    return Err(ValidationError::MissingExpiry(self.id));
                }
            }
            _ => {
                if self.self_destruct_at.is_some() {
                    return Err(ValidationError::UnexpectedExpiry(self.id));
                }
            }
        }
        if self.kind != NoteKind::Protected
            && (self.encrypted_content.is_some() || self.password_hash.is_some())
        {
            return Err(ValidationError::UnexpectedProtectedFields(self.id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Note, NoteKind};
    use crate::model::ValidationError;
    use uuid::Uuid;

    #[test]
    fn expiry_check_only_applies_to_self_destructing_notes() {
        let owner = Uuid::new_v4();
        let normal = Note::new(owner, "plain", NoteKind::Normal, 1_000);
        assert!(!normal.is_expired(i64::MAX));

        let mut burning = Note::new(owner, "burning", NoteKind::SelfDestructing, 1_000);
        burning.self_destruct_at = Some(2_000);
        assert!(!burning.is_expired(1_999));
        assert!(burning.is_expired(2_000));
    }

    #[test]
    fn validate_enforces_variant_field_consistency() {
        let owner = Uuid::new_v4();

        let blank = Note::new(owner, "  ", NoteKind::Normal, 0);
        assert_eq!(blank.validate(), Err(ValidationError::BlankTitle(blank.id)));

        let missing = Note::new(owner, "burning", NoteKind::SelfDestructing, 0);
        assert_eq!(
            missing.validate(),
            Err(ValidationError::MissingExpiry(missing.id))
        );

        let mut stray = Note::new(owner, "plain", NoteKind::Normal, 0);
        stray.encrypted_content = Some("blob".to_string());
        assert_eq!(
            stray.validate(),
            Err(ValidationError::UnexpectedProtectedFields(stray.id))
        );
    }
}
