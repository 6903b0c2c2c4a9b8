//! Collaborator intents.
//!
//! UI collaborators (drop zones, forms, checkboxes, file pickers) speak in
//! raw strings. This module validates those strings and routes each intent to
//! the matching `RoleBoard` operation.

use crate::codec::document::ImportSummary;
use crate::model::category::Category;
use crate::model::role::Role;
use crate::repo::board_repo::BoardRepository;
use crate::service::board_service::{BoardError, BoardResult, RoleBoard};

/// One user intent as produced by a UI collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardIntent {
    Create { name: String, category: String },
    Rename { id: String, text: String },
    /// Drag-and-drop onto a category column.
    Relocate { id: String, category: String },
    /// Explicit category pick (e.g. a select box on the card).
    SetCategory { id: String, category: String },
    SetChecked { id: String, value: bool },
    Toggle { id: String },
    Delete { id: String },
    Import { document: String },
}

/// Result of applying one intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentOutcome {
    Created(Role),
    Updated,
    Toggled(bool),
    Imported(ImportSummary),
    /// Accepted but changed nothing (cancelled edit, stale drop, unknown delete).
    Ignored,
}

impl<R: BoardRepository> RoleBoard<R> {
    /// Validates and applies one intent.
    ///
    /// Category labels are checked only after the id resolves, so a stale
    /// drop is ignored even when its label is bogus, and an explicit
    /// category pick reports `NotFound` before `Validation`.
    pub fn apply(&mut self, intent: BoardIntent) -> BoardResult<IntentOutcome> {
        let before = self.revision();
        match intent {
            BoardIntent::Create { name, category } => {
                let category = Category::parse(&category)?;
                return self.create(&name, category).map(IntentOutcome::Created);
            }
            BoardIntent::Rename { id, text } => self.rename(&id, &text)?,
            BoardIntent::Relocate { id, category } => {
                if self.get(&id).is_none() {
                    return Ok(IntentOutcome::Ignored);
                }
                let category = Category::parse(&category)?;
                self.relocate(&id, category)?;
            }
            BoardIntent::SetCategory { id, category } => {
                if self.get(&id).is_none() {
                    return Err(BoardError::NotFound(id));
                }
                let category = Category::parse(&category)?;
                self.set_category(&id, category)?;
            }
            BoardIntent::SetChecked { id, value } => self.set_checked(&id, value)?,
            BoardIntent::Toggle { id } => return self.toggle(&id).map(IntentOutcome::Toggled),
            BoardIntent::Delete { id } => self.delete(&id)?,
            BoardIntent::Import { document } => {
                return self.import(&document).map(IntentOutcome::Imported);
            }
        }

        if self.revision() == before {
            Ok(IntentOutcome::Ignored)
        } else {
            Ok(IntentOutcome::Updated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardIntent, IntentOutcome};
    use crate::model::category::Category;
    use crate::model::role::ValidationError;
    use crate::repo::board_repo::BlobBoardRepository;
    use crate::repo::memory::MemoryBlobStore;
    use crate::service::board_service::{BoardError, RoleBoard};

    fn empty_board(store: &MemoryBlobStore) -> RoleBoard<BlobBoardRepository<&MemoryBlobStore>> {
        RoleBoard::open(BlobBoardRepository::new(store))
    }

    #[test]
    fn create_intent_rejects_unknown_category() {
        let store = MemoryBlobStore::with_blob("roles_board_v1", "[]");
        let mut board = empty_board(&store);
        let err = board
            .apply(BoardIntent::Create {
                name: "Lead".to_string(),
                category: "Someday".to_string(),
            })
            .unwrap_err();
        assert!(matches!(
            err,
            BoardError::Validation(ValidationError::UnknownCategory(ref label)) if label == "Someday"
        ));
        assert!(board.is_empty());
    }

    #[test]
    fn stale_relocate_is_ignored_even_with_bogus_category() {
        let store = MemoryBlobStore::with_blob("roles_board_v1", "[]");
        let mut board = empty_board(&store);
        let outcome = board
            .apply(BoardIntent::Relocate {
                id: "ghost".to_string(),
                category: "Bogus".to_string(),
            })
            .unwrap();
        assert_eq!(outcome, IntentOutcome::Ignored);
    }

    #[test]
    fn set_category_reports_not_found_before_validation() {
        let store = MemoryBlobStore::with_blob("roles_board_v1", "[]");
        let mut board = empty_board(&store);
        let err = board
            .apply(BoardIntent::SetCategory {
                id: "ghost".to_string(),
                category: "Bogus".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, BoardError::NotFound(ref id) if id == "ghost"));
    }

    #[test]
    fn relocate_intent_moves_known_role() {
        let store = MemoryBlobStore::with_blob("roles_board_v1", "[]");
        let mut board = empty_board(&store);
        let role = board.create("Lead", Category::Past).unwrap();

        let moved = board
            .apply(BoardIntent::Relocate {
                id: role.id.to_string(),
                category: "Future".to_string(),
            })
            .unwrap();
        assert_eq!(moved, IntentOutcome::Updated);
        assert_eq!(
            board.get(role.id.as_str()).unwrap().category,
            Category::Future
        );

        let bad = board
            .apply(BoardIntent::Relocate {
                id: role.id.to_string(),
                category: "Bogus".to_string(),
            })
            .unwrap_err();
        assert!(matches!(bad, BoardError::Validation(_)));
        assert_eq!(
            board.get(role.id.as_str()).unwrap().category,
            Category::Future
        );
    }

    #[test]
    fn cancelled_rename_and_unknown_delete_are_ignored() {
        let store = MemoryBlobStore::with_blob("roles_board_v1", "[]");
        let mut board = empty_board(&store);
        let role = board.create("Lead", Category::Past).unwrap();

        let rename = board
            .apply(BoardIntent::Rename {
                id: role.id.to_string(),
                text: "   ".to_string(),
            })
            .unwrap();
        assert_eq!(rename, IntentOutcome::Ignored);

        let delete = board
            .apply(BoardIntent::Delete {
                id: "ghost".to_string(),
            })
            .unwrap();
        assert_eq!(delete, IntentOutcome::Ignored);

        let toggled = board
            .apply(BoardIntent::Toggle {
                id: role.id.to_string(),
            })
            .unwrap();
        assert_eq!(toggled, IntentOutcome::Toggled(true));
    }
}
