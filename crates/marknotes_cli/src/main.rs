//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `marknotes_core` wiring:
//!   open a seeded store, run one demo login, list the seeded notes.
//! - Keep output deterministic for quick local sanity checks.

use marknotes_core::{AuthService, NoteService, SessionStore, StoreConfig};

fn main() {
    println!("marknotes_core ping={}", marknotes_core::ping());
    println!("marknotes_core version={}", marknotes_core::core_version());

    let config = StoreConfig::from_env();
    let demo_email = config.demo_user.email.clone();
    let demo_credential = config.demo_user.credential.clone();

    let store = match SessionStore::open(config) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("store open failed: {err}");
            std::process::exit(1);
        }
    };

    let auth = AuthService::new(&store);
    let user = match auth.login(&demo_email, &demo_credential) {
        Ok(user) => user,
        Err(err) => {
            eprintln!("demo login failed: {err}");
            std::process::exit(1);
        }
    };
    println!("demo login ok user_id={}", user.id);

    match NoteService::new(&store).list_notes(user.id) {
        Ok(notes) => {
            println!("seeded notes={}", notes.len());
            for note in notes {
                println!("  {} [{:?}] {}", note.id, note.kind, note.title);
            }
        }
        Err(err) => {
            eprintln!("note listing failed: {err}");
            std::process::exit(1);
        }
    }
}
