//! Board storage constants and path resolution.

use std::path::PathBuf;

/// Namespace key of the single persisted board blob.
pub const STORAGE_KEY: &str = "roles_board_v1";
/// Suggested file name for exported board documents.
pub const EXPORT_FILE_NAME: &str = "roles-board.json";
/// Default SQLite file name for the blob store.
pub const DB_FILE_NAME: &str = "roles_board.sqlite3";
/// Environment variable overriding the database path.
pub const DB_PATH_ENV: &str = "ROLES_BOARD_DB_PATH";

/// Resolves the board database path.
///
/// Precedence: explicit override, then `ROLES_BOARD_DB_PATH`, then
/// `<temp dir>/roles_board.sqlite3`. Blank values are ignored.
pub fn resolve_db_path(override_path: Option<&str>) -> PathBuf {
    let env_value = std::env::var(DB_PATH_ENV).ok();
    pick_db_path(override_path, env_value.as_deref())
}

fn pick_db_path(override_path: Option<&str>, env_value: Option<&str>) -> PathBuf {
    [override_path, env_value]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(DB_FILE_NAME))
}
