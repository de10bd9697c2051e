use marknotes_core::{
    AccessError, AdminService, AuthService, NoteKind, NotePatch, NoteService, SearchError,
    SearchQuery, SessionStore, StoreConfig,
};

#[test]
fn search_requires_a_live_session() {
    let store = open_store();
    AuthService::new(&store).logout();

    let err = NoteService::new(&store)
        .search_notes(&SearchQuery::new("welcome"))
        .unwrap_err();
    assert!(matches!(err, AccessError::Unauthenticated));
}

#[test]
fn seeded_welcome_note_is_searchable() {
    let store = open_store();
    let notes = NoteService::new(&store);

    let hits = notes.search_notes(&SearchQuery::new("welcome")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Welcome to MarkNotes");
    assert!(hits[0].snippet.contains("Welcome"));
}

#[test]
fn blank_query_returns_no_hits() {
    let store = open_store();
    let hits = NoteService::new(&store)
        .search_notes(&SearchQuery::new("   "))
        .unwrap();
    assert!(hits.is_empty());
}

#[test]
fn search_matches_updated_body_text() {
    let store = open_store();
    let user = store.current_user().unwrap();
    let notes = NoteService::new(&store);

    let note = notes
        .create_note(user.id, "Trip plan", NoteKind::Normal)
        .unwrap();
    let patch = NotePatch {
        content: Some("pack the ukulele".to_string()),
        ..NotePatch::default()
    };
    notes.update_note(note.id, &patch).unwrap();

    let hits = notes.search_notes(&SearchQuery::new("ukulele")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].note_id, note.id);
}

#[test]
fn search_is_scoped_to_the_session_owner() {
    let store = open_store();
    let admin = AdminService::new(&store);
    let auth = AuthService::new(&store);

    admin.admin_login("admin@example.com", "admin123").unwrap();
    admin
        .create_user_direct("other@x.com", None, "pw-other")
        .unwrap();
    auth.login("other@x.com", "pw-other").unwrap();

    let hits = NoteService::new(&store)
        .search_notes(&SearchQuery::new("welcome"))
        .unwrap();
    assert!(hits.is_empty());
}

#[test]
fn expired_notes_are_excluded_from_results() {
    let store = open_store();
    let user = store.current_user().unwrap();
    let notes = NoteService::new(&store);

    let note = notes
        .create_note(user.id, "Ephemeral reminder", NoteKind::SelfDestructing)
        .unwrap();
    assert_eq!(
        notes
            .search_notes(&SearchQuery::new("ephemeral"))
            .unwrap()
            .len(),
        1
    );

    notes.update_self_destruct(note.id, 1).unwrap();
    assert!(notes
        .search_notes(&SearchQuery::new("ephemeral"))
        .unwrap()
        .is_empty());
}

#[test]
fn invalid_raw_syntax_surfaces_as_invalid_query() {
    let store = open_store();
    let mut query = SearchQuery::new("AND (");
    query.raw_fts_syntax = true;

    let err = NoteService::new(&store).search_notes(&query).unwrap_err();
    assert!(matches!(
        err,
        AccessError::Search(SearchError::InvalidQuery { .. })
    ));
}

#[test]
fn escaped_mode_requires_all_terms() {
    let store = open_store();
    let hits = NoteService::new(&store)
        .search_notes(&SearchQuery::new("welcome nothingmatches"))
        .unwrap();
    // Escaped terms are AND-joined; one unmatched term empties the result.
    assert!(hits.is_empty());
}

fn open_store() -> SessionStore {
    SessionStore::open(StoreConfig::default()).unwrap()
}
