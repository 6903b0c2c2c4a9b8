//! Board persistence adapter.
//!
//! # Responsibility
//! - Load the board snapshot from the blob store, recovering from absent or
//!   unusable data by seeding example roles.
//! - Save whole snapshots as a single blob write.
//!
//! # Invariants
//! - `load` never returns an error and never returns an illegal category.
//! - Seed data is persisted only when the blob store answered the read;
//!   otherwise the outcome is flagged so callers hold back later writes.

use crate::codec::document::{decode_document, encode_compact};
use crate::config::STORAGE_KEY;
use crate::model::role::{seed_roles, Role};
use crate::repo::blob_repo::{BlobStore, RepoResult};
use log::{error, info, warn};

/// Roles read at startup, plus whether storage actually answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedBoard {
    pub roles: Vec<Role>,
    /// False when the read failed and `roles` is an in-memory seed that
    /// must not replace whatever storage still holds.
    pub storage_read: bool,
}

impl LoadedBoard {
    fn read(roles: Vec<Role>) -> Self {
        Self {
            roles,
            storage_read: true,
        }
    }
}

/// Persistence contract consumed by the board engine.
pub trait BoardRepository {
    fn load(&self) -> LoadedBoard;
    fn save(&self, roles: &[Role]) -> RepoResult<()>;
}

/// Board repository storing the snapshot as one JSON blob.
pub struct BlobBoardRepository<S: BlobStore> {
    store: S,
    key: String,
}

impl<S: BlobStore> BlobBoardRepository<S> {
    /// Uses the default `roles_board_v1` key.
    pub fn new(store: S) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    fn seed_and_persist(&self, reason: &'static str) -> Vec<Role> {
        let seed = seed_roles();
        match self.save(&seed) {
            Ok(()) => info!(
                "event=board_load module=repo status=seeded reason={reason} count={}",
                seed.len()
            ),
            Err(err) => warn!(
                "event=board_load module=repo status=seeded reason={reason} persisted=false error={err}"
            ),
        }
        seed
    }
}

impl<S: BlobStore> BoardRepository for BlobBoardRepository<S> {
    fn load(&self) -> LoadedBoard {
        let raw = match self.store.read_blob(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return LoadedBoard::read(self.seed_and_persist("absent")),
            Err(err) => {
                error!(
                    "event=board_load module=repo status=error error_code=blob_read_failed key={} error={err}",
                    self.key
                );
                return LoadedBoard {
                    roles: seed_roles(),
                    storage_read: false,
                };
            }
        };

        let decoded = match decode_document(&raw) {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!(
                    "event=board_load module=repo status=recovering error_code=blob_unparsable key={} error={err}",
                    self.key
                );
                return LoadedBoard::read(self.seed_and_persist("unparsable"));
            }
        };

        if decoded.summary.coerced() > 0 {
            warn!(
                "event=board_load module=repo status=normalized generated_ids={} reassigned_ids={} defaulted_categories={}",
                decoded.summary.generated_ids,
                decoded.summary.reassigned_duplicate_ids,
                decoded.summary.defaulted_categories
            );
            if let Err(err) = self.save(&decoded.roles) {
                warn!("event=board_load module=repo status=unsaved error={err}");
            }
        }

        info!(
            "event=board_load module=repo status=ok count={}",
            decoded.roles.len()
        );
        LoadedBoard::read(decoded.roles)
    }

    fn save(&self, roles: &[Role]) -> RepoResult<()> {
        let payload = encode_compact(roles)?;
        self.store.write_blob(&self.key, &payload)
    }
}
