//! SQL DDL for initializing the account storage.

/// SQLite schema:
/// - `username` TEXT PRIMARY KEY (uniqueness is enforced by the store)
/// - `password` TEXT, plaintext or a hex digest depending on the scheme
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY,
    password TEXT
);
"#;
