//! Core session store and access facade for MarkNotes.
//! This crate is the single source of truth for business invariants.

pub mod clock;
pub mod config;
pub mod credential;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod store;

pub use config::{SeedAccount, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteId, NoteKind};
pub use model::user::{AdminSession, EndUser, UserId, UserProfile, UserStatus};
pub use model::ValidationError;
pub use repo::note_repo::{NotePatch, NoteRepository, SqliteNoteRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use search::fts::{search_notes, SearchError, SearchHit, SearchQuery};
pub use service::admin_service::AdminService;
pub use service::auth_service::AuthService;
pub use service::note_service::{derive_preview, NoteService, SELF_DESTRUCT_TTL_MS};
pub use service::profile_service::{ProfilePatch, ProfileService};
pub use service::{AccessError, AccessResult};
pub use store::SessionStore;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
