//! Board entity store.
//!
//! # Responsibility
//! - Own the canonical ordered role sequence and every mutation on it.
//! - Flush the whole snapshot through the persistence adapter after each
//!   applied mutation (write-through).
//! - Project the sequence into category columns for rendering.
//!
//! # Invariants
//! - Role ids are pairwise distinct; lookups resolve the first match.
//! - Every role category is legal at all times.
//! - Created and renamed names are trimmed and non-empty.
//! - A failed flush keeps the in-memory change and marks the board unsaved.
//! - After a failed startup read nothing is written until `retry_save`
//!   confirms the overwrite or `reload` reads storage successfully.

use crate::codec::document::{decode_document, encode_document, FormatError, ImportSummary};
use crate::model::category::Category;
use crate::model::role::{normalize_name, Role, ValidationError};
use crate::repo::blob_repo::PersistenceError;
use crate::repo::board_repo::BoardRepository;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type BoardResult<T> = Result<T, BoardError>;

/// Error taxonomy surfaced to board callers.
#[derive(Debug)]
pub enum BoardError {
    Validation(ValidationError),
    NotFound(String),
    Format(FormatError),
    /// The mutation was applied in memory but could not be saved.
    Persistence(PersistenceError),
    ImportRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "role not found: {id}"),
            Self::Format(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "changes not saved: {err}"),
            Self::ImportRead { path, source } => {
                write!(f, "failed to read import file `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Format(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::ImportRead { source, .. } => Some(source),
        }
    }
}

impl From<ValidationError> for BoardError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<FormatError> for BoardError {
    fn from(value: FormatError) -> Self {
        Self::Format(value)
    }
}

impl From<PersistenceError> for BoardError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

/// One rendered column: a category and its roles in store order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column<'a> {
    pub category: Category,
    pub roles: Vec<&'a Role>,
}

/// In-memory board backed by a persistence adapter.
pub struct RoleBoard<R: BoardRepository> {
    repo: R,
    roles: Vec<Role>,
    revision: u64,
    unsaved: bool,
    storage_unread: bool,
}

impl<R: BoardRepository> RoleBoard<R> {
    /// Loads the board through `repo` (seeding on first run).
    ///
    /// When storage cannot be read the board starts from seed data in
    /// memory, reports unsaved changes and refuses to write.
    pub fn open(repo: R) -> Self {
        let loaded = repo.load();
        if loaded.storage_read {
            info!(
                "event=board_open module=board status=ok count={}",
                loaded.roles.len()
            );
        } else {
            warn!(
                "event=board_open module=board status=guarded reason=storage_unread count={}",
                loaded.roles.len()
            );
        }
        Self {
            repo,
            roles: loaded.roles,
            revision: 0,
            unsaved: !loaded.storage_read,
            storage_unread: !loaded.storage_read,
        }
    }

    /// Current ordered role sequence, newest first.
    pub fn snapshot(&self) -> &[Role] {
        &self.roles
    }

    pub fn get(&self, id: &str) -> Option<&Role> {
        self.roles.iter().find(|role| role.id.as_str() == id)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Counter bumped by every applied mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether memory is ahead of storage.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Whether writes are held back because storage was unreadable at open.
    pub fn is_storage_unread(&self) -> bool {
        self.storage_unread
    }

    /// Groups roles by category in column order, preserving store order
    /// inside each column.
    pub fn columns(&self) -> Vec<Column<'_>> {
        Category::ALL
            .into_iter()
            .map(|category| Column {
                category,
                roles: self
                    .roles
                    .iter()
                    .filter(|role| role.category == category)
                    .collect(),
            })
            .collect()
    }

    /// Adds a role at the head of the sequence.
    ///
    /// # Errors
    /// - `Validation(EmptyName)` for blank names; nothing is stored.
    /// - `Persistence` when the flush fails; the role stays on the board.
    pub fn create(&mut self, name: &str, category: Category) -> BoardResult<Role> {
        let role = Role::new(name, category)?;
        self.roles.insert(0, role.clone());
        self.commit("role_create", role.id.as_str())?;
        Ok(role)
    }

    /// Renames a role.
    ///
    /// Blank input or an unchanged name is treated as a cancelled edit.
    pub fn rename(&mut self, id: &str, new_name: &str) -> BoardResult<()> {
        let role = self.find_mut(id)?;
        let name = match normalize_name(new_name) {
            Ok(name) if name != role.name => name,
            _ => {
                debug!("event=role_rename module=board status=skipped role_id={id}");
                return Ok(());
            }
        };
        role.name = name;
        self.commit("role_rename", id)
    }

    /// Moves a known role to `category`.
    pub fn set_category(&mut self, id: &str, category: Category) -> BoardResult<()> {
        let role = self.find_mut(id)?;
        if role.category == category {
            return Ok(());
        }
        role.category = category;
        self.commit("role_set_category", id)
    }

    /// Applies a drop of role `id` onto the `category` column.
    ///
    /// Drops of unknown (stale) ids are ignored without error.
    pub fn relocate(&mut self, id: &str, category: Category) -> BoardResult<()> {
        if self.get(id).is_none() {
            debug!("event=role_relocate module=board status=ignored reason=unknown_id");
            return Ok(());
        }
        self.set_category(id, category)
    }

    pub fn set_checked(&mut self, id: &str, value: bool) -> BoardResult<()> {
        let role = self.find_mut(id)?;
        if role.checked == value {
            return Ok(());
        }
        role.checked = value;
        self.commit("role_set_checked", id)
    }

    /// Flips `checked` and returns the new value.
    pub fn toggle(&mut self, id: &str) -> BoardResult<bool> {
        let role = self.find_mut(id)?;
        role.checked = !role.checked;
        let checked = role.checked;
        self.commit("role_toggle", id)?;
        Ok(checked)
    }

    /// Removes a role. Unknown ids are a no-op.
    ///
    /// Confirmation is the caller's job; this deletes unconditionally.
    pub fn delete(&mut self, id: &str) -> BoardResult<()> {
        match self.position(id) {
            Some(index) => {
                self.roles.remove(index);
                self.commit("role_delete", id)
            }
            None => {
                debug!("event=role_delete module=board status=ignored reason=unknown_id");
                Ok(())
            }
        }
    }

    /// Renders the full snapshot as a pretty-printed board document.
    pub fn export(&self) -> BoardResult<String> {
        let document = encode_document(&self.roles)?;
        info!(
            "event=board_export module=board status=ok count={}",
            self.roles.len()
        );
        Ok(document)
    }

    /// Replaces the whole board with a validated external document.
    ///
    /// # Errors
    /// - `Format` when the shape check fails; the board is untouched.
    /// - `Persistence` when the flush fails; the imported roles stay active.
    pub fn import(&mut self, document: &str) -> BoardResult<ImportSummary> {
        let decoded = match decode_document(document) {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!("event=board_import module=board status=rejected error={err}");
                return Err(err.into());
            }
        };
        info!(
            "event=board_import module=board status=accepted count={} generated_ids={} reassigned_ids={} defaulted_categories={}",
            decoded.summary.imported,
            decoded.summary.generated_ids,
            decoded.summary.reassigned_duplicate_ids,
            decoded.summary.defaulted_categories
        );
        self.roles = decoded.roles;
        self.commit("board_import", "*")?;
        Ok(decoded.summary)
    }

    /// Reads a whole file, then imports it.
    ///
    /// A read failure leaves the board untouched.
    pub fn import_file(&mut self, path: impl AsRef<Path>) -> BoardResult<ImportSummary> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|source| {
            warn!("event=board_import module=board status=error error_code=read_failed error={source}");
            BoardError::ImportRead {
                path: path.to_path_buf(),
                source,
            }
        })?;
        self.import(&document)
    }

    /// Re-attempts saving the current snapshot.
    ///
    /// After a failed startup read this is also the explicit confirmation
    /// that the in-memory board may overwrite storage.
    pub fn retry_save(&mut self) -> BoardResult<()> {
        self.storage_unread = false;
        self.flush("board_retry_save", "*")
    }

    /// Replaces the in-memory board with what storage holds now.
    ///
    /// Unsaved in-memory changes are discarded.
    ///
    /// # Errors
    /// - `Persistence(StorageUnread)` when storage still cannot be read; the
    ///   board is untouched.
    pub fn reload(&mut self) -> BoardResult<()> {
        let loaded = self.repo.load();
        if !loaded.storage_read {
            warn!("event=board_reload module=board status=error reason=storage_unread");
            return Err(PersistenceError::StorageUnread.into());
        }
        self.roles = loaded.roles;
        self.revision += 1;
        self.unsaved = false;
        self.storage_unread = false;
        info!(
            "event=board_reload module=board status=ok count={} revision={}",
            self.roles.len(),
            self.revision
        );
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.roles.iter().position(|role| role.id.as_str() == id)
    }

    fn find_mut(&mut self, id: &str) -> BoardResult<&mut Role> {
        self.roles
            .iter_mut()
            .find(|role| role.id.as_str() == id)
            .ok_or_else(|| BoardError::NotFound(id.to_string()))
    }

    fn commit(&mut self, event: &'static str, role_id: &str) -> BoardResult<()> {
        self.revision += 1;
        self.flush(event, role_id)
    }

    fn flush(&mut self, event: &'static str, role_id: &str) -> BoardResult<()> {
        if self.storage_unread {
            self.unsaved = true;
            warn!(
                "event={event} module=board status=unsaved reason=storage_unread role_id={role_id} revision={}",
                self.revision
            );
            return Err(PersistenceError::StorageUnread.into());
        }
        match self.repo.save(&self.roles) {
            Ok(()) => {
                self.unsaved = false;
                info!(
                    "event={event} module=board status=ok role_id={role_id} revision={}",
                    self.revision
                );
                Ok(())
            }
            Err(err) => {
                self.unsaved = true;
                warn!(
                    "event={event} module=board status=unsaved role_id={role_id} revision={} error={err}",
                    self.revision
                );
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RoleBoard;
    use crate::model::category::Category;
    use crate::repo::board_repo::BlobBoardRepository;
    use crate::repo::memory::MemoryBlobStore;

    #[test]
    fn columns_preserve_store_order_within_category() {
        let store = MemoryBlobStore::with_blob("roles_board_v1", "[]");
        let mut board = RoleBoard::open(BlobBoardRepository::new(&store));
        let older = board.create("Older", Category::Future).unwrap();
        board.create("Elsewhere", Category::Past).unwrap();
        let newer = board.create("Newer", Category::Future).unwrap();

        let columns = board.columns();
        assert_eq!(
            columns.iter().map(|c| c.category).collect::<Vec<_>>(),
            Category::ALL.to_vec()
        );
        let future = &columns[2];
        assert_eq!(future.roles.len(), 2);
        assert_eq!(future.roles[0].id, newer.id);
        assert_eq!(future.roles[1].id, older.id);
        assert!(columns[1].roles.is_empty());
    }

    #[test]
    fn no_op_mutations_do_not_bump_revision() {
        let store = MemoryBlobStore::with_blob("roles_board_v1", "[]");
        let mut board = RoleBoard::open(BlobBoardRepository::new(&store));
        let role = board.create("Lead", Category::Past).unwrap();
        let revision = board.revision();

        board.rename(role.id.as_str(), "  Lead ").unwrap();
        board.rename(role.id.as_str(), "   ").unwrap();
        board.set_category(role.id.as_str(), Category::Past).unwrap();
        board.set_checked(role.id.as_str(), false).unwrap();
        board.delete("missing").unwrap();

        assert_eq!(board.revision(), revision);
        assert_eq!(store.write_count(), 1);
    }
}
