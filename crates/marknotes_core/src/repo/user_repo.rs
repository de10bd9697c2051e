//! Roster repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide roster CRUD on top of the `user_profiles` table.
//! - Keep the stored credential hash out of every profile read model.
//!
//! # Invariants
//! - Email uniqueness is enforced case-insensitively by storage.
//! - Every mutation bumps the row `version`.
//! - Roster listings are newest-first for display.

use crate::model::user::{UserId, UserProfile, UserStatus};
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const PROFILE_SELECT_SQL: &str = "SELECT
    uuid,
    email,
    full_name,
    status,
    created_at,
    version
FROM user_profiles";

const PROFILE_COLUMNS: &[&str] = &[
    "uuid",
    "email",
    "full_name",
    "status",
    "credential_hash",
    "created_at",
    "version",
];

/// Repository interface for roster operations.
pub trait UserRepository {
    /// Inserts one profile with its credential hash; returns the stable id.
    fn insert_profile(&self, profile: &UserProfile, credential_hash: &str) -> RepoResult<UserId>;
    /// Finds one profile by email (case-insensitive).
    fn find_by_email(&self, email: &str) -> RepoResult<Option<UserProfile>>;
    /// Finds one profile by stable id.
    fn find_by_id(&self, id: UserId) -> RepoResult<Option<UserProfile>>;
    /// Lists the full roster newest-first.
    fn list_all(&self) -> RepoResult<Vec<UserProfile>>;
    /// Sets the approval status. `NotFound` when the id is absent.
    fn set_status(&self, id: UserId, status: UserStatus) -> RepoResult<()>;
    /// Overwrites the display name. `NotFound` when the id is absent.
    fn set_full_name(&self, id: UserId, full_name: Option<&str>) -> RepoResult<()>;
    /// Overwrites the stored credential hash. `NotFound` when the id is
    /// absent.
    fn set_credential_hash(&self, id: UserId, credential_hash: &str) -> RepoResult<()>;
    /// Returns the stored credential hash for a login email.
    fn credential_hash_by_email(&self, email: &str) -> RepoResult<Option<String>>;
    /// Removes one profile. Returns whether a row was removed; absence is
    /// not an error.
    fn delete_profile(&self, id: UserId) -> RepoResult<bool>;
}

/// SQLite-backed roster repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "user_profiles", PROFILE_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn insert_profile(&self, profile: &UserProfile, credential_hash: &str) -> RepoResult<UserId> {
        profile.validate()?;

        self.conn.execute(
            "INSERT INTO user_profiles (
                uuid,
                email,
                full_name,
                status,
                credential_hash,
                created_at,
                version
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                profile.id.to_string(),
                profile.email.as_str(),
                profile.full_name.as_deref(),
                status_to_db(profile.status),
                credential_hash,
                profile.created_at,
                profile.version,
            ],
        )?;

        Ok(profile.id)
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<UserProfile>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROFILE_SELECT_SQL} WHERE email = ?1;"))?;
        let mut rows = stmt.query([email])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_profile_row(row)?));
        }
        Ok(None)
    }

    fn find_by_id(&self, id: UserId) -> RepoResult<Option<UserProfile>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROFILE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_profile_row(row)?));
        }
        Ok(None)
    }

    fn list_all(&self) -> RepoResult<Vec<UserProfile>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROFILE_SELECT_SQL} ORDER BY created_at DESC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut profiles = Vec::new();
        while let Some(row) = rows.next()? {
            profiles.push(parse_profile_row(row)?);
        }
        Ok(profiles)
    }

    fn set_status(&self, id: UserId, status: UserStatus) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE user_profiles
             SET status = ?2, version = version + 1
             WHERE uuid = ?1;",
            params![id.to_string(), status_to_db(status)],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "user", id });
        }
        Ok(())
    }

    fn set_full_name(&self, id: UserId, full_name: Option<&str>) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE user_profiles
             SET full_name = ?2, version = version + 1
             WHERE uuid = ?1;",
            params![id.to_string(), full_name],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "user", id });
        }
        Ok(())
    }

    fn set_credential_hash(&self, id: UserId, credential_hash: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE user_profiles
             SET credential_hash = ?2, version = version + 1
             WHERE uuid = ?1;",
            params![id.to_string(), credential_hash],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "user", id });
        }
        Ok(())
    }

    fn credential_hash_by_email(&self, email: &str) -> RepoResult<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT credential_hash FROM user_profiles WHERE email = ?1;")?;
        let mut rows = stmt.query([email])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(row.get(0)?));
        }
        Ok(None)
    }

    fn delete_profile(&self, id: UserId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM user_profiles WHERE uuid = ?1;",
            [id.to_string()],
        )?;
        Ok(changed > 0)
    }
}

fn parse_profile_row(row: &Row<'_>) -> RepoResult<UserProfile> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "user_profiles.uuid")?;

    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in user_profiles.status"
        ))
    })?;

    let profile = UserProfile {
        id,
        email: row.get("email")?,
        full_name: row.get("full_name")?,
        status,
        created_at: row.get("created_at")?,
        version: row.get("version")?,
    };
    profile.validate()?;
    Ok(profile)
}

fn status_to_db(status: UserStatus) -> &'static str {
    match status {
        UserStatus::Pending => "pending",
        UserStatus::Approved => "approved",
        UserStatus::Rejected => "rejected",
    }
}

fn parse_status(value: &str) -> Option<UserStatus> {
    match value {
        "pending" => Some(UserStatus::Pending),
        "approved" => Some(UserStatus::Approved),
        "rejected" => Some(UserStatus::Rejected),
        _ => None,
    }
}
