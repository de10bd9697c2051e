use marknotes_core::{
    AccessError, AdminService, AuthService, NoteKind, NotePatch, NoteService, SessionStore,
    StoreConfig, SELF_DESTRUCT_TTL_MS,
};
use uuid::Uuid;

#[test]
fn seeded_notes_list_newest_first() {
    let store = open_store();
    let user = store.current_user().unwrap();
    let notes = NoteService::new(&store);

    let listed = notes.list_notes(user.id).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].title, "My Protected Note");
    assert_eq!(listed[0].kind, NoteKind::Protected);
    assert_eq!(listed[1].title, "Welcome to MarkNotes");
    assert_eq!(listed[1].kind, NoteKind::Normal);
}

#[test]
fn listing_requires_a_live_session() {
    let store = open_store();
    let user = store.current_user().unwrap();
    AuthService::new(&store).logout();

    let err = NoteService::new(&store).list_notes(user.id).unwrap_err();
    assert!(matches!(err, AccessError::Unauthenticated));
}

#[test]
fn listing_another_owner_is_unauthorized() {
    let store = open_store();
    let err = NoteService::new(&store)
        .list_notes(Uuid::new_v4())
        .unwrap_err();
    assert!(matches!(err, AccessError::Unauthorized));
}

#[test]
fn create_note_applies_variant_defaults() {
    let store = open_store();
    let user = store.current_user().unwrap();
    let notes = NoteService::new(&store);

    let normal = notes
        .create_note(user.id, "Groceries", NoteKind::Normal)
        .unwrap();
    assert_eq!(normal.content, "");
    assert_eq!(normal.version, 1);
    assert_eq!(normal.created_at, normal.updated_at);
    assert!(normal.encrypted_content.is_none());
    assert!(normal.self_destruct_at.is_none());

    let protected = notes
        .create_note(user.id, "Secrets", NoteKind::Protected)
        .unwrap();
    assert_eq!(protected.encrypted_content.as_deref(), Some(""));
    assert!(protected.password_hash.is_none());
}

#[test]
fn self_destructing_note_expires_exactly_24_hours_after_creation() {
    let store = open_store();
    let user = store.current_user().unwrap();

    let note = NoteService::new(&store)
        .create_note(user.id, "Burn after reading", NoteKind::SelfDestructing)
        .unwrap();
    assert_eq!(
        note.self_destruct_at,
        Some(note.created_at + SELF_DESTRUCT_TTL_MS)
    );
}

#[test]
fn update_note_merges_fields_and_refreshes_timestamps() {
    let store = open_store();
    let user = store.current_user().unwrap();
    let notes = NoteService::new(&store);

    let created = notes
        .create_note(user.id, "Draft", NoteKind::Normal)
        .unwrap();

    let patch = NotePatch {
        title: Some("T2".to_string()),
        content: Some("# Final\n\nbody".to_string()),
        ..NotePatch::default()
    };
    let updated = notes.update_note(created.id, &patch).unwrap();
    assert_eq!(updated.title, "T2");
    assert_eq!(updated.content, "# Final\n\nbody");
    assert!(updated.updated_at > updated.created_at);
    assert_eq!(updated.version, 2);
    assert_eq!(updated.preview_text.as_deref(), Some("Final body"));

    let listed = notes.list_notes(user.id).unwrap();
    let entry = listed.iter().find(|n| n.id == created.id).unwrap();
    assert_eq!(entry.title, "T2");
    assert!(entry.updated_at > entry.created_at);
}

#[test]
fn update_missing_note_returns_not_found() {
    let store = open_store();
    let err = NoteService::new(&store)
        .update_note(Uuid::new_v4(), &NotePatch::default())
        .unwrap_err();
    assert!(matches!(err, AccessError::NotFound { entity: "note", .. }));
}

#[test]
fn delete_note_is_idempotent() {
    let store = open_store();
    let user = store.current_user().unwrap();
    let notes = NoteService::new(&store);

    let note = notes
        .create_note(user.id, "Scratch", NoteKind::Normal)
        .unwrap();
    assert_eq!(notes.list_notes(user.id).unwrap().len(), 3);

    notes.delete_note(note.id).unwrap();
    notes.delete_note(note.id).unwrap();
    assert_eq!(notes.list_notes(user.id).unwrap().len(), 2);
}

#[test]
fn notes_are_invisible_across_owners() {
    let store = open_store();
    let demo = store.current_user().unwrap();
    let notes = NoteService::new(&store);
    let auth = AuthService::new(&store);
    let admin = AdminService::new(&store);

    let demo_note = notes
        .create_note(demo.id, "Private", NoteKind::Normal)
        .unwrap();

    admin.admin_login("admin@example.com", "admin123").unwrap();
    let other = admin
        .create_user_direct("other@x.com", Some("Other"), "pw-other")
        .unwrap();
    auth.login("other@x.com", "pw-other").unwrap();

    assert!(NoteService::new(&store)
        .list_notes(other.id)
        .unwrap()
        .is_empty());

    let err = notes
        .update_note(demo_note.id, &NotePatch::default())
        .unwrap_err();
    assert!(matches!(err, AccessError::NotFound { entity: "note", .. }));
}

fn open_store() -> SessionStore {
    SessionStore::open(StoreConfig::default()).unwrap()
}
