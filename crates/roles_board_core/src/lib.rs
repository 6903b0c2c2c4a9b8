//! Board state engine for the roles board.
//! This crate is the single source of truth for board invariants.

pub mod codec;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use codec::document::{DecodedDocument, FormatError, ImportSummary};
pub use config::{resolve_db_path, DB_FILE_NAME, EXPORT_FILE_NAME, STORAGE_KEY};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::Category;
pub use model::role::{Role, RoleId, ValidationError};
pub use repo::blob_repo::{BlobStore, PersistenceError, RepoResult, SqliteBlobStore};
pub use repo::board_repo::{BlobBoardRepository, BoardRepository, LoadedBoard};
pub use repo::memory::MemoryBlobStore;
pub use service::board_service::{BoardError, BoardResult, Column, RoleBoard};
pub use service::intent::{BoardIntent, IntentOutcome};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
