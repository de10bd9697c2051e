//! Notes facade.
//!
//! # Responsibility
//! - Provide owner-scoped note create/list/update/delete plus the
//!   protected-password and self-destruct operations.
//! - Derive the plain-text preview projection from markdown content.
//!
//! # Invariants
//! - Every operation requires a live end-user session; notes resolve only
//!   within that session's owner scope.
//! - A self-destructing note is created with expiry exactly 24 hours
//!   after its creation timestamp.
//! - Expired notes are purged before listing and invisible to every read.

use crate::model::note::{Note, NoteId, NoteKind};
use crate::model::user::UserId;
use crate::repo::note_repo::{NotePatch, NoteRepository, SqliteNoteRepository};
use crate::search::fts::{search_notes, SearchHit, SearchQuery};
use crate::service::{require_user, require_user_matching, AccessError, AccessResult};
use crate::store::SessionStore;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;

/// Lifetime of a freshly created self-destructing note.
pub const SELF_DESTRUCT_TTL_MS: i64 = 24 * 60 * 60 * 1000;

const PREVIEW_MAX_CHARS: usize = 120;

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\([^)]*\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("valid link regex"));
static MARKDOWN_NOISE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[#>*_`~\-\[\]()!]+|\s+").expect("valid noise regex"));

/// Notes operation group.
pub struct NoteService<'a> {
    store: &'a SessionStore,
}

impl<'a> NoteService<'a> {
    pub fn new(store: &'a SessionStore) -> Self {
        Self { store }
    }

    /// Lists the owner's live notes newest-first.
    ///
    /// Purges expired self-destructing notes first, so an expired note is
    /// gone rather than merely hidden.
    pub fn list_notes(&self, owner_id: UserId) -> AccessResult<Vec<Note>> {
        let user = require_user_matching(self.store, owner_id)?;
        let now = self.store.now_ms();
        let conn = self.store.conn();
        let notes = SqliteNoteRepository::try_new(&conn)?;

        let purged = notes.purge_expired(user.id, now)?;
        if purged > 0 {
            info!(
                "event=notes_purge module=notes status=ok user_id={} count={purged}",
                user.id
            );
        }

        Ok(notes.list_notes(user.id, now)?)
    }

    /// Creates one note with variant defaults and returns it.
    pub fn create_note(
        &self,
        owner_id: UserId,
        title: &str,
        kind: NoteKind,
    ) -> AccessResult<Note> {
        let user = require_user_matching(self.store, owner_id)?;
        let created_at = self.store.now_ms();

        let mut note = Note::new(user.id, title, kind, created_at);
        match kind {
            NoteKind::SelfDestructing => {
                note.self_destruct_at = Some(created_at + SELF_DESTRUCT_TTL_MS);
            }
            NoteKind::Protected => {
                note.encrypted_content = Some(String::new());
            }
            NoteKind::Normal => {}
        }
        note.preview_text = derive_preview(&note.content);

        let conn = self.store.conn();
        let notes = SqliteNoteRepository::try_new(&conn)?;
        notes.insert_note(&note)?;

        info!(
            "event=note_create module=notes status=ok user_id={} note_id={}",
            user.id, note.id
        );
        Ok(note)
    }

    /// Merges the provided fields into one note and returns the result.
    ///
    /// `NotFound` when the note is absent, expired, or foreign; `Conflict`
    /// when the patch carries a stale expected version.
    pub fn update_note(&self, note_id: NoteId, patch: &NotePatch) -> AccessResult<Note> {
        let user = require_user(self.store)?;
        let now = self.store.now_ms();
        let conn = self.store.conn();
        let notes = SqliteNoteRepository::try_new(&conn)?;

        let mut note =
            notes
                .get_note(user.id, note_id, now)?
                .ok_or_else(|| AccessError::NotFound {
                    entity: "note",
                    key: note_id.to_string(),
                })?;

        if let Some(expected) = patch.expected_version {
            if expected != note.version {
                return Err(AccessError::Conflict {
                    expected,
                    actual: note.version,
                });
            }
        }

        if let Some(title) = &patch.title {
            note.title = title.clone();
        }
        if let Some(content) = &patch.content {
            note.content = content.clone();
        }
        if let Some(blob) = &patch.encrypted_content {
            note.encrypted_content = Some(blob.clone());
        }
        note.preview_text = derive_preview(&note.content);
        note.updated_at = now;

        notes.update_note(&note)?;
        note.version += 1;

        info!(
            "event=note_update module=notes status=ok user_id={} note_id={} version={}",
            user.id, note.id, note.version
        );
        Ok(note)
    }

    /// Removes one note. Idempotent: absence is not an error.
    pub fn delete_note(&self, note_id: NoteId) -> AccessResult<()> {
        let user = require_user(self.store)?;
        let conn = self.store.conn();
        let notes = SqliteNoteRepository::try_new(&conn)?;

        let removed = notes.delete_note(user.id, note_id)?;
        info!(
            "event=note_delete module=notes status=ok user_id={} note_id={note_id} removed={removed}",
            user.id
        );
        Ok(())
    }

    /// Stores a caller-supplied password hash on one protected note.
    pub fn set_protected_password(
        &self,
        note_id: NoteId,
        password_hash: &str,
    ) -> AccessResult<()> {
        let user = require_user(self.store)?;
        let now = self.store.now_ms();
        let conn = self.store.conn();
        let notes = SqliteNoteRepository::try_new(&conn)?;

        notes.set_password_hash(user.id, note_id, password_hash, now)?;
        info!(
            "event=note_protect module=notes status=ok user_id={} note_id={note_id}",
            user.id
        );
        Ok(())
    }

    /// Overwrites the expiry on one self-destructing note.
    pub fn update_self_destruct(&self, note_id: NoteId, expiry_ms: i64) -> AccessResult<()> {
        let user = require_user(self.store)?;
        let now = self.store.now_ms();
        let conn = self.store.conn();
        let notes = SqliteNoteRepository::try_new(&conn)?;

        notes.set_self_destruct(user.id, note_id, expiry_ms, now)?;
        info!(
            "event=note_self_destruct module=notes status=ok user_id={} note_id={note_id}",
            user.id
        );
        Ok(())
    }

    /// Keyword search over the session owner's live notes.
    pub fn search_notes(&self, query: &SearchQuery) -> AccessResult<Vec<SearchHit>> {
        let user = require_user(self.store)?;
        let now = self.store.now_ms();
        let conn = self.store.conn();
        Ok(search_notes(&conn, user.id, now, query)?)
    }
}

/// Derives the plain-text list preview from markdown content.
///
/// Images are dropped, links keep their text, markdown punctuation and
/// whitespace runs collapse to single spaces, and the result is capped at
/// 120 characters. Blank content yields no preview.
pub fn derive_preview(content: &str) -> Option<String> {
    let without_images = MARKDOWN_IMAGE_RE.replace_all(content, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let flattened = MARKDOWN_NOISE_RE.replace_all(&without_links, " ");

    let trimmed = flattened.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(PREVIEW_MAX_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::derive_preview;

    #[test]
    fn preview_drops_images_and_keeps_link_text() {
        let preview = derive_preview("![cover](cover.png) see [the docs](https://example.com)");
        assert_eq!(preview.as_deref(), Some("see the docs"));
    }

    #[test]
    fn preview_flattens_markdown_noise_and_caps_length() {
        let source = format!("# Heading\n\n- item one\n- item two\n\n{}", "x".repeat(300));
        let preview = derive_preview(&source).unwrap();
        assert!(!preview.contains('#'));
        assert!(!preview.contains('\n'));
        assert!(preview.starts_with("Heading item one item two"));
        assert!(preview.chars().count() <= 120);
    }

    #[test]
    fn blank_content_has_no_preview() {
        assert!(derive_preview("").is_none());
        assert!(derive_preview("  \n\t").is_none());
    }
}
