use marknotes_core::{
    AccessError, AdminService, AuthService, SessionStore, StoreConfig, UserStatus,
};

#[test]
fn login_with_unknown_email_returns_not_found() {
    let store = open_store();
    let auth = AuthService::new(&store);

    let err = auth.login("ghost@example.com", "whatever").unwrap_err();
    assert!(matches!(err, AccessError::NotFound { entity: "user", .. }));
}

#[test]
fn seeded_demo_login_succeeds_and_sets_session() {
    let store = open_store();
    let auth = AuthService::new(&store);
    auth.logout();
    assert!(auth.current_user().is_none());

    let user = auth.login("user@example.com", "password123").unwrap();
    assert_eq!(user.email, "user@example.com");
    assert_eq!(user.full_name.as_deref(), Some("John Doe"));
    assert_eq!(auth.current_user().unwrap().id, user.id);
}

#[test]
fn login_with_wrong_credential_returns_invalid_credential() {
    let store = open_store();
    let auth = AuthService::new(&store);

    let err = auth.login("user@example.com", "password124").unwrap_err();
    assert!(matches!(err, AccessError::InvalidCredential));
}

#[test]
fn signup_then_login_returns_pending_approval_not_not_found() {
    let store = open_store();
    let auth = AuthService::new(&store);

    auth.signup("new@x.com", "hunter2", Some("New User")).unwrap();

    let err = auth.login("new@x.com", "hunter2").unwrap_err();
    assert!(matches!(err, AccessError::PendingApproval(email) if email == "new@x.com"));
}

#[test]
fn signup_with_existing_email_returns_already_registered() {
    let store = open_store();
    let auth = AuthService::new(&store);

    let err = auth
        .signup("user@example.com", "whatever", None)
        .unwrap_err();
    assert!(matches!(err, AccessError::AlreadyRegistered(email) if email == "user@example.com"));
}

#[test]
fn signup_returns_identity_without_establishing_session() {
    let store = open_store();
    let auth = AuthService::new(&store);
    auth.logout();

    let identity = auth
        .signup("new@x.com", "hunter2", Some("New User"))
        .unwrap();
    assert_eq!(identity.email, "new@x.com");
    assert_eq!(identity.full_name.as_deref(), Some("New User"));
    assert!(auth.current_user().is_none());
}

#[test]
fn logout_clears_session_and_is_repeatable() {
    let store = open_store();
    let auth = AuthService::new(&store);
    assert!(auth.current_user().is_some());

    auth.logout();
    auth.logout();
    assert!(auth.current_user().is_none());
}

#[test]
fn approved_signup_can_login_with_its_own_credential() {
    let store = open_store();
    let auth = AuthService::new(&store);
    let admin = AdminService::new(&store);

    let identity = auth
        .signup("new@x.com", "hunter2", Some("New User"))
        .unwrap();

    admin.admin_login("admin@example.com", "admin123").unwrap();
    admin.approve_user(identity.id).unwrap();

    let user = auth.login("new@x.com", "hunter2").unwrap();
    assert_eq!(user.id, identity.id);

    let roster = admin.list_all_users().unwrap();
    let entry = roster.iter().find(|p| p.id == identity.id).unwrap();
    assert_eq!(entry.status, UserStatus::Approved);
}

#[test]
fn rejected_account_still_cannot_login() {
    let store = open_store();
    let auth = AuthService::new(&store);
    let admin = AdminService::new(&store);

    let identity = auth.signup("new@x.com", "hunter2", None).unwrap();
    admin.admin_login("admin@example.com", "admin123").unwrap();
    admin.reject_user(identity.id).unwrap();

    let err = auth.login("new@x.com", "hunter2").unwrap_err();
    assert!(matches!(err, AccessError::PendingApproval(_)));
}

#[test]
fn stores_are_isolated_instances() {
    let first = open_store();
    let second = open_store();

    AuthService::new(&first)
        .signup("only-here@x.com", "hunter2", None)
        .unwrap();

    let err = AuthService::new(&second)
        .login("only-here@x.com", "hunter2")
        .unwrap_err();
    assert!(matches!(err, AccessError::NotFound { .. }));
}

fn open_store() -> SessionStore {
    SessionStore::open(StoreConfig::default()).unwrap()
}
