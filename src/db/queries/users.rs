use crate::models::User;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

const SELECT_USER: &str =
    "SELECT id, username, email, google_id, google_name, google_picture FROM users";

fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        google_id: row.get(3)?,
        google_name: row.get(4)?,
        google_picture: row.get(5)?,
    })
}

/// Profile details returned by Google's userinfo endpoint.
#[derive(Debug, Clone)]
pub struct GoogleProfile {
    pub google_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

pub fn get_user(conn: &Connection, id: i64) -> rusqlite::Result<Option<User>> {
    conn.query_row(&format!("{SELECT_USER} WHERE id = ?"), [id], row_to_user)
        .optional()
}

pub fn find_by_username(conn: &Connection, username: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        &format!("{SELECT_USER} WHERE username = ?"),
        [username],
        row_to_user,
    )
    .optional()
}

/// The stored Argon2 hash for `username`, if the account has a password.
pub fn password_hash(conn: &Connection, username: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT password_hash FROM users WHERE username = ?",
        [username],
        |row| row.get::<_, Option<String>>(0),
    )
    .optional()
    .map(Option::flatten)
}

pub fn create_user(
    conn: &Connection,
    username: &str,
    email: Option<&str>,
    password_hash: &str,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO users (username, email, password_hash) VALUES (?, ?, ?)",
        params![username, email, password_hash],
    )?;
    let id = conn.last_insert_rowid();
    info!(user_id = id, username = %username, "Registered user");
    Ok(id)
}

fn find_by_google_id(conn: &Connection, google_id: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        &format!("{SELECT_USER} WHERE google_id = ?"),
        [google_id],
        row_to_user,
    )
    .optional()
}

/// Find the user linked to a Google account, creating one on first sign-in.
///
/// Accounts are matched by Google subject only. The new account takes the
/// Google email as its username when that name is free and `google_<sub>`
/// otherwise; it is never merged into an existing password account.
pub fn upsert_google_user(conn: &Connection, profile: &GoogleProfile) -> rusqlite::Result<User> {
    conn.execute(
        "UPDATE users SET google_name = ?, google_picture = ? WHERE google_id = ?",
        params![profile.name, profile.picture, profile.google_id],
    )?;
    if let Some(user) = find_by_google_id(conn, &profile.google_id)? {
        return Ok(user);
    }

    let fallback = format!("google_{}", profile.google_id);
    let username = match profile.email.as_deref() {
        Some(email) if find_by_username(conn, email)?.is_none() => email.to_string(),
        _ => fallback,
    };

    conn.execute(
        "INSERT INTO users (username, email, google_id, google_name, google_picture)
         VALUES (?, ?, ?, ?, ?)",
        params![
            username,
            profile.email,
            profile.google_id,
            profile.name,
            profile.picture
        ],
    )?;
    let id = conn.last_insert_rowid();
    info!(user_id = id, username = %username, "Created user from Google sign-in");

    conn.query_row(&format!("{SELECT_USER} WHERE id = ?"), [id], row_to_user)
}
