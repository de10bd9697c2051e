//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide owner-scoped note CRUD on top of the `notes` table.
//! - Enforce expiry lazily: expired self-destructing notes are invisible
//!   to every read and can be purged in bulk.
//!
//! # Invariants
//! - Every query is constrained to one `owner_uuid`.
//! - Full-row updates are conditional on the row `version`; a lost check
//!   surfaces as `StaleVersion`, never as a silent overwrite.
//! - Variant-specific writes only address rows of that variant.

use crate::model::note::{Note, NoteId, NoteKind};
use crate::model::user::UserId;
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const NOTE_SELECT_SQL: &str = "SELECT
    uuid,
    owner_uuid,
    title,
    content,
    note_type,
    encrypted_content,
    password_hash,
    self_destruct_at,
    preview_text,
    created_at,
    updated_at,
    version
FROM notes";

const NOTE_COLUMNS: &[&str] = &[
    "uuid",
    "owner_uuid",
    "title",
    "content",
    "note_type",
    "encrypted_content",
    "password_hash",
    "self_destruct_at",
    "preview_text",
    "created_at",
    "updated_at",
    "version",
];

/// Partial-update request for one note.
///
/// Unset fields keep their stored value. `expected_version` is an optional
/// optimistic-concurrency token; when present and stale the update is
/// rejected with a conflict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub encrypted_content: Option<String>,
    pub expected_version: Option<i64>,
}

/// Repository interface for owner-scoped note operations.
pub trait NoteRepository {
    /// Inserts one note; returns the stable id.
    fn insert_note(&self, note: &Note) -> RepoResult<NoteId>;
    /// Gets one live note by id within the owner scope.
    fn get_note(&self, owner_id: UserId, note_id: NoteId, now_ms: i64)
        -> RepoResult<Option<Note>>;
    /// Lists the owner's live notes newest-first.
    fn list_notes(&self, owner_id: UserId, now_ms: i64) -> RepoResult<Vec<Note>>;
    /// Writes the full row conditional on `note.version`; storage bumps the
    /// version by one.
    fn update_note(&self, note: &Note) -> RepoResult<()>;
    /// Stores a password hash on one live protected note.
    fn set_password_hash(
        &self,
        owner_id: UserId,
        note_id: NoteId,
        password_hash: &str,
        now_ms: i64,
    ) -> RepoResult<()>;
    /// Overwrites the expiry on one live self-destructing note.
    fn set_self_destruct(
        &self,
        owner_id: UserId,
        note_id: NoteId,
        expiry_ms: i64,
        now_ms: i64,
    ) -> RepoResult<()>;
    /// Removes one note. Returns whether a row was removed; absence is not
    /// an error.
    fn delete_note(&self, owner_id: UserId, note_id: NoteId) -> RepoResult<bool>;
    /// Hard-deletes the owner's expired self-destructing notes; returns the
    /// purge count.
    fn purge_expired(&self, owner_id: UserId, now_ms: i64) -> RepoResult<usize>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "notes", NOTE_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_note(&self, note: &Note) -> RepoResult<NoteId> {
        note.validate()?;

        self.conn.execute(
            "INSERT INTO notes (
                uuid,
                owner_uuid,
                title,
                content,
                note_type,
                encrypted_content,
                password_hash,
                self_destruct_at,
                preview_text,
                created_at,
                updated_at,
                version
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
            params![
                note.id.to_string(),
                note.owner_id.to_string(),
                note.title.as_str(),
                note.content.as_str(),
                kind_to_db(note.kind),
                note.encrypted_content.as_deref(),
                note.password_hash.as_deref(),
                note.self_destruct_at,
                note.preview_text.as_deref(),
                note.created_at,
                note.updated_at,
                note.version,
            ],
        )?;

        Ok(note.id)
    }

    fn get_note(
        &self,
        owner_id: UserId,
        note_id: NoteId,
        now_ms: i64,
    ) -> RepoResult<Option<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE uuid = ?1
               AND owner_uuid = ?2
               AND (self_destruct_at IS NULL OR self_destruct_at > ?3);"
        ))?;
        let mut rows = stmt.query(params![
            note_id.to_string(),
            owner_id.to_string(),
            now_ms
        ])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn list_notes(&self, owner_id: UserId, now_ms: i64) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE owner_uuid = ?1
               AND (self_destruct_at IS NULL OR self_destruct_at > ?2)
             ORDER BY created_at DESC, uuid ASC;"
        ))?;
        let mut rows = stmt.query(params![owner_id.to_string(), now_ms])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn update_note(&self, note: &Note) -> RepoResult<()> {
        note.validate()?;

        let changed = self.conn.execute(
            "UPDATE notes
             SET
                title = ?4,
                content = ?5,
                encrypted_content = ?6,
                password_hash = ?7,
                self_destruct_at = ?8,
                preview_text = ?9,
                updated_at = ?10,
                version = version + 1
             WHERE uuid = ?1
               AND owner_uuid = ?2
               AND version = ?3;",
            params![
                note.id.to_string(),
                note.owner_id.to_string(),
                note.version,
                note.title.as_str(),
                note.content.as_str(),
                note.encrypted_content.as_deref(),
                note.password_hash.as_deref(),
                note.self_destruct_at,
                note.preview_text.as_deref(),
                note.updated_at,
            ],
        )?;

        if changed == 0 {
            return Err(self.classify_missed_write(note));
        }
        Ok(())
    }

    fn set_password_hash(
        &self,
        owner_id: UserId,
        note_id: NoteId,
        password_hash: &str,
        now_ms: i64,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET password_hash = ?3, updated_at = ?4, version = version + 1
             WHERE uuid = ?1
               AND owner_uuid = ?2
               AND note_type = 'protected';",
            params![
                note_id.to_string(),
                owner_id.to_string(),
                password_hash,
                now_ms
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "note",
                id: note_id,
            });
        }
        Ok(())
    }

    fn set_self_destruct(
        &self,
        owner_id: UserId,
        note_id: NoteId,
        expiry_ms: i64,
        now_ms: i64,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET self_destruct_at = ?3, updated_at = ?4, version = version + 1
             WHERE uuid = ?1
               AND owner_uuid = ?2
               AND note_type = 'self_destructing'
               AND (self_destruct_at IS NULL OR self_destruct_at > ?4);",
            params![
                note_id.to_string(),
                owner_id.to_string(),
                expiry_ms,
                now_ms
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "note",
                id: note_id,
            });
        }
        Ok(())
    }

    fn delete_note(&self, owner_id: UserId, note_id: NoteId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM notes WHERE uuid = ?1 AND owner_uuid = ?2;",
            params![note_id.to_string(), owner_id.to_string()],
        )?;
        Ok(changed > 0)
    }

    fn purge_expired(&self, owner_id: UserId, now_ms: i64) -> RepoResult<usize> {
        let purged = self.conn.execute(
            "DELETE FROM notes
             WHERE owner_uuid = ?1
               AND self_destruct_at IS NOT NULL
               AND self_destruct_at <= ?2;",
            params![owner_id.to_string(), now_ms],
        )?;
        Ok(purged)
    }
}

impl SqliteNoteRepository<'_> {
    /// Distinguishes a vanished row from a lost version check after a
    /// conditional update matched nothing.
    fn classify_missed_write(&self, note: &Note) -> RepoError {
        let lookup = self.conn.query_row(
            "SELECT version FROM notes WHERE uuid = ?1 AND owner_uuid = ?2;",
            params![note.id.to_string(), note.owner_id.to_string()],
            |row| row.get::<_, i64>(0),
        );
        match lookup {
            Ok(actual) => RepoError::StaleVersion {
                entity: "note",
                id: note.id,
                expected: note.version,
                actual,
            },
            Err(rusqlite::Error::QueryReturnedNoRows) => RepoError::NotFound {
                entity: "note",
                id: note.id,
            },
            Err(err) => err.into(),
        }
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "notes.uuid")?;
    let owner_text: String = row.get("owner_uuid")?;
    let owner_id = parse_uuid(&owner_text, "notes.owner_uuid")?;

    let kind_text: String = row.get("note_type")?;
    let kind = parse_kind(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid note type `{kind_text}` in notes.note_type"))
    })?;

    let note = Note {
        id,
        owner_id,
        title: row.get("title")?,
        content: row.get("content")?,
        kind,
        encrypted_content: row.get("encrypted_content")?,
        password_hash: row.get("password_hash")?,
        self_destruct_at: row.get("self_destruct_at")?,
        preview_text: row.get("preview_text")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        version: row.get("version")?,
    };
    note.validate()?;
    Ok(note)
}

fn kind_to_db(kind: NoteKind) -> &'static str {
    match kind {
        NoteKind::Normal => "normal",
        NoteKind::Protected => "protected",
        NoteKind::SelfDestructing => "self_destructing",
    }
}

fn parse_kind(value: &str) -> Option<NoteKind> {
    match value {
        "normal" => Some(NoteKind::Normal),
        "protected" => Some(NoteKind::Protected),
        "self_destructing" => Some(NoteKind::SelfDestructing),
        _ => None,
    }
}
