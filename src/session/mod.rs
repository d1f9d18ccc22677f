//! Session key/value storage.
//!
//! Holds the bearer token and the flat permission list the backend handed
//! out for the current user. Values are plain strings; structured values are
//! stored as JSON.

mod storage;

pub use storage::{MemorySessionStore, SessionStore, SqliteSessionStore};

/// Key holding the bearer token
pub const TOKEN_KEY: &str = "token";

/// Key holding the permission list (JSON array of strings)
pub const PERMISSIONS_KEY: &str = "permissions";
