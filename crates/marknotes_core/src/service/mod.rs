//! Access facade: the four operation groups over the session store.
//!
//! # Responsibility
//! - Enforce the coarse authorization gates in front of the store.
//! - Map layer errors into the facade error taxonomy.
//!
//! # Invariants
//! - Every operation returns a success value or a typed error; nothing is
//!   logged-and-swallowed, nothing is retried.
//! - Gate order is stable: session gates run before any store read.

pub mod admin_service;
pub mod auth_service;
pub mod note_service;
pub mod profile_service;

use crate::model::user::{AdminSession, EndUser, UserId};
use crate::repo::RepoError;
use crate::search::fts::SearchError;
use crate::store::SessionStore;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AccessResult<T> = Result<T, AccessError>;

/// Facade-level error taxonomy.
///
/// The first seven variants are the operation contract; `Repo` and
/// `Search` wrap transport failures from the layers underneath.
#[derive(Debug)]
pub enum AccessError {
    /// No record matches the requested identity within the caller's scope.
    NotFound { entity: &'static str, key: String },
    /// Signup/create target email already exists in the roster.
    AlreadyRegistered(String),
    /// Roster entry exists but has not been approved.
    PendingApproval(String),
    /// Login pair does not verify.
    InvalidCredential,
    /// Operation requires a live end-user session.
    Unauthenticated,
    /// Operation requires a live admin session, or addresses another
    /// user's data.
    Unauthorized,
    /// Optimistic-concurrency token was stale.
    Conflict { expected: i64, actual: i64 },
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Search-layer failure.
    Search(SearchError),
}

impl Display for AccessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::AlreadyRegistered(email) => write!(f, "email already registered: {email}"),
            Self::PendingApproval(email) => {
                write!(f, "account pending approval from admin: {email}")
            }
            Self::InvalidCredential => write!(f, "invalid credentials"),
            Self::Unauthenticated => write!(f, "no authenticated user session"),
            Self::Unauthorized => write!(f, "operation not permitted for this session"),
            Self::Conflict { expected, actual } => {
                write!(f, "version conflict: expected {expected}, actual {actual}")
            }
            Self::Repo(err) => write!(f, "{err}"),
            Self::Search(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AccessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Search(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AccessError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound {
                entity,
                key: id.to_string(),
            },
            RepoError::StaleVersion {
                expected, actual, ..
            } => Self::Conflict { expected, actual },
            other => Self::Repo(other),
        }
    }
}

impl From<SearchError> for AccessError {
    fn from(value: SearchError) -> Self {
        Self::Search(value)
    }
}

/// Gate: a live end-user session must exist.
pub(crate) fn require_user(store: &SessionStore) -> AccessResult<EndUser> {
    store.current_user().ok_or(AccessError::Unauthenticated)
}

/// Gate: a live end-user session must exist and match the addressed user.
pub(crate) fn require_user_matching(
    store: &SessionStore,
    user_id: UserId,
) -> AccessResult<EndUser> {
    let session = require_user(store)?;
    if session.id != user_id {
        return Err(AccessError::Unauthorized);
    }
    Ok(session)
}

/// Gate: a live admin session must exist.
pub(crate) fn require_admin(store: &SessionStore) -> AccessResult<AdminSession> {
    store.current_admin().ok_or(AccessError::Unauthorized)
}
