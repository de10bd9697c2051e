//! Domain model for the session store.
//!
//! # Responsibility
//! - Define the canonical records held by the store: roster profiles,
//!   live session identities, and notes.
//! - Provide presence/consistency validation run before every write.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - Timestamps are Unix epoch milliseconds issued by the store clock.

pub mod note;
pub mod user;

use crate::model::note::NoteId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure raised by model-level presence/consistency checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Profile email is blank after trim.
    BlankEmail,
    /// Note title is blank after trim.
    BlankTitle(NoteId),
    /// Self-destructing note is missing its expiry.
    MissingExpiry(NoteId),
    /// Expiry set on a note that is not self-destructing.
    UnexpectedExpiry(NoteId),
    /// Encrypted payload or password hash set on a non-protected note.
    UnexpectedProtectedFields(NoteId),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankEmail => write!(f, "profile email must not be blank"),
            Self::BlankTitle(id) => write!(f, "note title must not be blank: {id}"),
            Self::MissingExpiry(id) => {
                write!(f, "self-destructing note has no expiry: {id}")
            }
            Self::UnexpectedExpiry(id) => {
                write!(f, "expiry is only valid on self-destructing notes: {id}")
            }
            Self::UnexpectedProtectedFields(id) => {
                write!(f, "encrypted fields are only valid on protected notes: {id}")
            }
        }
    }
}

impl Error for ValidationError {}
