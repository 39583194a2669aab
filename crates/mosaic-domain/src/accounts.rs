//! Account service — registration, login, co-member discovery.

use mosaic_auth::{hash_password, verify_password};
use mosaic_db::repositories::UserRepo;
use mosaic_db::rows::UserRow;
use rusqlite::Connection;
use tracing::info;

use crate::errors::{DomainError, Result};

/// Account service with business logic and validation.
pub struct AccountService;

impl AccountService {
    /// Register a new user with a hashed password.
    pub fn register(conn: &Connection, username: &str, password: &str) -> Result<UserRow> {
        let username = username.trim();
        if username.is_empty() {
            return Err(DomainError::validation("username must not be empty"));
        }
        if password.is_empty() {
            return Err(DomainError::validation("password must not be empty"));
        }
        if UserRepo::get_by_username(conn, username)?.is_some() {
            return Err(DomainError::validation(format!(
                "username {username} is already taken"
            )));
        }

        let user = UserRepo::create(conn, username, &hash_password(password))?;
        info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Check credentials and return the user.
    ///
    /// Wrong username and wrong password produce the same error, so the
    /// response does not reveal which usernames exist.
    pub fn authenticate(conn: &Connection, username: &str, password: &str) -> Result<UserRow> {
        let rejected = || DomainError::Unauthorized("invalid username or password".to_string());

        let user = UserRepo::get_by_username(conn, username)?.ok_or_else(rejected)?;
        if !verify_password(password, &user.password_hash) {
            return Err(rejected());
        }
        Ok(user)
    }

    /// Users who share at least one board with the requester, excluding
    /// the requester, ordered by username.
    pub fn shareable_users(conn: &Connection, user_id: &str) -> Result<Vec<UserRow>> {
        Ok(UserRepo::sharing_board_with(conn, user_id)?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use mosaic_db::migrations::run_migrations;
    use mosaic_db::repositories::BoardRepo;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")
            .unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn register_then_authenticate() {
        let conn = setup();
        let user = AccountService::register(&conn, "alice", "hunter2").unwrap();
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "hunter2");

        let authed = AccountService::authenticate(&conn, "alice", "hunter2").unwrap();
        assert_eq!(authed.id, user.id);
    }

    #[test]
    fn register_rejects_empty_fields() {
        let conn = setup();
        assert!(matches!(
            AccountService::register(&conn, "", "pw"),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            AccountService::register(&conn, "   ", "pw"),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            AccountService::register(&conn, "bob", ""),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn register_rejects_duplicate_username() {
        let conn = setup();
        AccountService::register(&conn, "alice", "pw").unwrap();
        assert!(matches!(
            AccountService::register(&conn, "alice", "other"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn authenticate_uses_one_message_for_both_failures() {
        let conn = setup();
        AccountService::register(&conn, "alice", "pw").unwrap();

        let wrong_user = AccountService::authenticate(&conn, "nobody", "pw").unwrap_err();
        let wrong_pass = AccountService::authenticate(&conn, "alice", "bad").unwrap_err();
        assert_eq!(wrong_user.to_string(), wrong_pass.to_string());
        assert!(matches!(wrong_user, DomainError::Unauthorized(_)));
    }

    #[test]
    fn shareable_users_are_co_members_only() {
        let conn = setup();
        let me = AccountService::register(&conn, "me", "pw").unwrap();
        let friend = AccountService::register(&conn, "friend", "pw").unwrap();
        let stranger = AccountService::register(&conn, "stranger", "pw").unwrap();

        let board = BoardRepo::create(&conn, "B").unwrap();
        BoardRepo::add_member(&conn, &board.id, &me.id).unwrap();
        BoardRepo::add_member(&conn, &board.id, &friend.id).unwrap();

        let users = AccountService::shareable_users(&conn, &me.id).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, friend.id);
        assert!(users.iter().all(|u| u.id != stranger.id && u.id != me.id));
    }
}
