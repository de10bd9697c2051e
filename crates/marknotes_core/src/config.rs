//! Store configuration.
//!
//! # Responsibility
//! - Carry the seeded demo account and the admin account for one store
//!   instance.
//! - Let deployments override the fixed demo pairs through environment
//!   variables so credentials are not baked-in literals.
//!
//! # Invariants
//! - Raw credentials exist only inside the config; the store hashes them
//!   at open time and never logs them.

use std::env;

/// One seeded account: identity plus the raw credential accepted for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedAccount {
    pub email: String,
    pub full_name: String,
    pub credential: String,
}

/// Configuration for one session store instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Pre-approved roster account whose identity seeds the live session.
    pub demo_user: SeedAccount,
    /// The single admin account accepted by `admin_login`.
    pub admin: SeedAccount,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            demo_user: SeedAccount {
                email: "user@example.com".to_string(),
                full_name: "John Doe".to_string(),
                credential: "password123".to_string(),
            },
            admin: SeedAccount {
                email: "admin@example.com".to_string(),
                full_name: "Admin User".to_string(),
                credential: "admin123".to_string(),
            },
        }
    }
}

impl StoreConfig {
    /// Builds a config from `MARKNOTES_*` environment variables, falling
    /// back to the demo defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            demo_user: SeedAccount {
                email: env_or("MARKNOTES_DEMO_EMAIL", &defaults.demo_user.email),
                full_name: env_or("MARKNOTES_DEMO_NAME", &defaults.demo_user.full_name),
                credential: env_or("MARKNOTES_DEMO_CREDENTIAL", &defaults.demo_user.credential),
            },
            admin: SeedAccount {
                email: env_or("MARKNOTES_ADMIN_EMAIL", &defaults.admin.email),
                full_name: env_or("MARKNOTES_ADMIN_NAME", &defaults.admin.full_name),
                credential: env_or("MARKNOTES_ADMIN_CREDENTIAL", &defaults.admin.credential),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}
