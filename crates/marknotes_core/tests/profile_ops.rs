use marknotes_core::{
    AccessError, AdminService, AuthService, ProfilePatch, ProfileService, SessionStore,
    StoreConfig,
};
use uuid::Uuid;

#[test]
fn profile_operations_require_a_live_session() {
    let store = open_store();
    let user = store.current_user().unwrap();
    AuthService::new(&store).logout();

    let profile = ProfileService::new(&store);
    assert!(matches!(
        profile.get_profile(user.id).unwrap_err(),
        AccessError::Unauthenticated
    ));
    assert!(matches!(
        profile
            .update_profile(user.id, &ProfilePatch::default())
            .unwrap_err(),
        AccessError::Unauthenticated
    ));
    assert!(matches!(
        profile.change_password(user.id, "x").unwrap_err(),
        AccessError::Unauthenticated
    ));
}

#[test]
fn addressing_another_identity_is_unauthorized() {
    let store = open_store();
    let profile = ProfileService::new(&store);
    let foreign = Uuid::new_v4();

    assert!(matches!(
        profile.get_profile(foreign).unwrap_err(),
        AccessError::Unauthorized
    ));
    assert!(matches!(
        profile
            .update_profile(foreign, &ProfilePatch::default())
            .unwrap_err(),
        AccessError::Unauthorized
    ));
    assert!(matches!(
        profile.change_password(foreign, "x").unwrap_err(),
        AccessError::Unauthorized
    ));
}

#[test]
fn get_profile_returns_the_roster_view() {
    let store = open_store();
    let user = store.current_user().unwrap();

    let view = ProfileService::new(&store).get_profile(user.id).unwrap();
    assert_eq!(view.id, user.id);
    assert_eq!(view.email, "user@example.com");
    assert_eq!(view.full_name.as_deref(), Some("John Doe"));
}

#[test]
fn update_profile_changes_roster_row_and_live_session() {
    let store = open_store();
    let user = store.current_user().unwrap();
    let profile = ProfileService::new(&store);

    let patch = ProfilePatch {
        full_name: Some("Johnny D".to_string()),
    };
    let updated = profile.update_profile(user.id, &patch).unwrap();
    assert_eq!(updated.full_name.as_deref(), Some("Johnny D"));
    assert_eq!(
        store.current_user().unwrap().full_name.as_deref(),
        Some("Johnny D")
    );

    let admin = AdminService::new(&store);
    admin.admin_login("admin@example.com", "admin123").unwrap();
    let roster = admin.list_all_users().unwrap();
    let entry = roster.iter().find(|p| p.id == user.id).unwrap();
    assert_eq!(entry.full_name.as_deref(), Some("Johnny D"));
    assert!(entry.version > 1);
}

#[test]
fn empty_patch_leaves_profile_unchanged() {
    let store = open_store();
    let user = store.current_user().unwrap();

    let view = ProfileService::new(&store)
        .update_profile(user.id, &ProfilePatch::default())
        .unwrap();
    assert_eq!(view.full_name.as_deref(), Some("John Doe"));
}

#[test]
fn changed_password_takes_effect_at_next_login() {
    let store = open_store();
    let user = store.current_user().unwrap();
    let auth = AuthService::new(&store);

    ProfileService::new(&store)
        .change_password(user.id, "rotated-credential")
        .unwrap();
    auth.logout();

    let err = auth.login("user@example.com", "password123").unwrap_err();
    assert!(matches!(err, AccessError::InvalidCredential));
    let logged_in = auth
        .login("user@example.com", "rotated-credential")
        .unwrap();
    assert_eq!(logged_in.id, user.id);
}

#[test]
fn deleted_roster_row_surfaces_as_not_found() {
    let store = open_store();
    let user = store.current_user().unwrap();

    let admin = AdminService::new(&store);
    admin.admin_login("admin@example.com", "admin123").unwrap();
    admin.delete_user(user.id).unwrap();

    let err = ProfileService::new(&store).get_profile(user.id).unwrap_err();
    assert!(matches!(err, AccessError::NotFound { entity: "user", .. }));
}

fn open_store() -> SessionStore {
    SessionStore::open(StoreConfig::default()).unwrap()
}
