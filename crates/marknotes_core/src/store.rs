//! Session store: single source of truth for one process.
//!
//! # Responsibility
//! - Own the in-memory database holding the roster and the notes.
//! - Own the live end-user and admin session slots.
//! - Seed the demo state at open.
//!
//! # Invariants
//! - At most one live end-user and at most one live admin session.
//! - The store is explicitly constructed and injected; there are no
//!   ambient globals, so each test can own an isolated instance.
//! - Facade operations hold the connection lock for their whole
//!   check-then-mutate step, so concurrent callers observe a consistent
//!   sequence.

use crate::clock::Clock;
use crate::config::StoreConfig;
use crate::credential::{hash_credential, verify_credential};
use crate::db::open_store_db;
use crate::model::note::{Note, NoteKind};
use crate::model::user::{AdminSession, EndUser, UserProfile, UserStatus};
use crate::repo::note_repo::{NoteRepository, SqliteNoteRepository};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::repo::RepoResult;
use crate::service::note_service::derive_preview;
use log::info;
use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

const WELCOME_TITLE: &str = "Welcome to MarkNotes";
const WELCOME_BODY: &str = "# Welcome!\n\nStart typing your markdown notes here.";
const PROTECTED_TITLE: &str = "My Protected Note";
const PROTECTED_SEED_PAYLOAD: &str = "demo-ciphertext";

/// Process-wide mutable state behind the access facade.
pub struct SessionStore {
    conn: Mutex<Connection>,
    current_user: Mutex<Option<EndUser>>,
    current_admin: Mutex<Option<AdminSession>>,
    clock: Clock,
    admin_identity: AdminSession,
    admin_credential_hash: String,
}

impl SessionStore {
    /// Opens a store seeded with the demo state: one approved roster
    /// profile (whose identity pre-fills the live end-user slot), an empty
    /// admin slot, and two notes owned by the demo user.
    pub fn open(config: StoreConfig) -> RepoResult<Self> {
        let conn = open_store_db()?;
        let clock = Clock::new();

        let demo_identity = seed_demo_state(&conn, &clock, &config)?;

        let admin_identity = AdminSession {
            id: Uuid::new_v4(),
            email: config.admin.email.clone(),
            full_name: config.admin.full_name.clone(),
        };
        let admin_credential_hash = hash_credential(&config.admin.credential);

        info!(
            "event=store_open module=store status=ok demo_user_id={}",
            demo_identity.id
        );

        Ok(Self {
            conn: Mutex::new(conn),
            current_user: Mutex::new(Some(demo_identity)),
            current_admin: Mutex::new(None),
            clock,
            admin_identity,
            admin_credential_hash,
        })
    }

    /// Opens a store configured from `MARKNOTES_*` environment variables.
    pub fn open_from_env() -> RepoResult<Self> {
        Self::open(StoreConfig::from_env())
    }

    /// Acquires the connection for one facade operation.
    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issues the next store timestamp.
    pub(crate) fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Returns the live end-user session, if any.
    pub fn current_user(&self) -> Option<EndUser> {
        self.current_user
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the live admin session, if any.
    pub fn current_admin(&self) -> Option<AdminSession> {
        self.current_admin
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set_current_user(&self, user: Option<EndUser>) {
        *self
            .current_user
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = user;
    }

    pub(crate) fn set_current_admin(&self, admin: Option<AdminSession>) {
        *self
            .current_admin
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = admin;
    }

    /// The fixed admin identity minted from config at open.
    pub(crate) fn admin_identity(&self) -> &AdminSession {
        &self.admin_identity
    }

    /// Checks a login pair against the configured admin account.
    pub(crate) fn verify_admin(&self, email: &str, credential: &str) -> bool {
        self.admin_identity.email.eq_ignore_ascii_case(email.trim())
            && verify_credential(credential, &self.admin_credential_hash)
    }
}

fn seed_demo_state(
    conn: &Connection,
    clock: &Clock,
    config: &StoreConfig,
) -> RepoResult<EndUser> {
    let users = SqliteUserRepository::try_new(conn)?;
    let profile = UserProfile::new(
        config.demo_user.email.clone(),
        Some(config.demo_user.full_name.clone()),
        UserStatus::Approved,
        clock.now_ms(),
    );
    users.insert_profile(&profile, &hash_credential(&config.demo_user.credential))?;

    let notes = SqliteNoteRepository::try_new(conn)?;

    let mut welcome = Note::new(profile.id, WELCOME_TITLE, NoteKind::Normal, clock.now_ms());
    welcome.content = WELCOME_BODY.to_string();
    welcome.preview_text = derive_preview(&welcome.content);
    notes.insert_note(&welcome)?;

    let mut protected = Note::new(
        profile.id,
        PROTECTED_TITLE,
        NoteKind::Protected,
        clock.now_ms(),
    );
    protected.encrypted_content = Some(PROTECTED_SEED_PAYLOAD.to_string());
    protected.password_hash = Some(hash_credential(&config.demo_user.credential));
    notes.insert_note(&protected)?;

    Ok(profile.identity())
}
