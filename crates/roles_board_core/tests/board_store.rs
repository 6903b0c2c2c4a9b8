use roles_board_core::{
    BlobBoardRepository, BoardError, Category, MemoryBlobStore, Role, RoleBoard, ValidationError,
    STORAGE_KEY,
};
use std::collections::HashSet;

fn open_empty(store: &MemoryBlobStore) -> RoleBoard<BlobBoardRepository<&MemoryBlobStore>> {
    RoleBoard::open(BlobBoardRepository::new(store))
}

fn persisted_roles(store: &MemoryBlobStore) -> Vec<Role> {
    let raw = store.blob(STORAGE_KEY).expect("board blob should exist");
    serde_json::from_str(&raw).expect("persisted blob should be a role array")
}

fn assert_invariants(roles: &[Role]) {
    let ids = roles.iter().map(|role| role.id.clone()).collect::<HashSet<_>>();
    assert_eq!(ids.len(), roles.len(), "role ids must be unique");
    for role in roles {
        assert!(Category::ALL.contains(&role.category));
    }
}

#[test]
fn create_rejects_blank_names_and_inserts_at_head() {
    let store = MemoryBlobStore::with_blob(STORAGE_KEY, "[]");
    let mut board = open_empty(&store);

    let empty = board
        .create("", Category::Past)
        .expect_err("empty name must be rejected");
    assert!(matches!(
        empty,
        BoardError::Validation(ValidationError::EmptyName)
    ));
    let blank = board
        .create("  ", Category::Past)
        .expect_err("blank name must be rejected");
    assert!(matches!(
        blank,
        BoardError::Validation(ValidationError::EmptyName)
    ));
    assert!(board.is_empty());

    board.create("Architect", Category::Future).expect("create role");
    let lead = board.create("Lead", Category::Past).expect("create role");

    assert_eq!(board.snapshot()[0].id, lead.id);
    assert_eq!(board.snapshot()[0].name, "Lead");
    assert!(!board.snapshot()[0].checked);
    assert_eq!(board.len(), 2);
}

#[test]
fn every_mutation_writes_through_to_storage() {
    let store = MemoryBlobStore::with_blob(STORAGE_KEY, "[]");
    let mut board = open_empty(&store);

    let role = board.create("Lead", Category::Past).expect("create role");
    assert_eq!(persisted_roles(&store), board.snapshot());

    board.rename(role.id.as_str(), "  Tech Lead ").expect("rename role");
    assert_eq!(persisted_roles(&store)[0].name, "Tech Lead");

    board
        .set_category(role.id.as_str(), Category::Present)
        .expect("set category");
    assert_eq!(persisted_roles(&store)[0].category, Category::Present);

    assert!(board.toggle(role.id.as_str()).expect("toggle role"));
    assert!(persisted_roles(&store)[0].checked);

    board
        .set_checked(role.id.as_str(), false)
        .expect("set checked");
    assert!(!persisted_roles(&store)[0].checked);

    board.delete(role.id.as_str()).expect("delete role");
    assert!(persisted_roles(&store).is_empty());
    assert!(!board.has_unsaved_changes());
}

#[test]
fn rename_toggle_and_set_category_surface_unknown_ids() {
    let store = MemoryBlobStore::with_blob(STORAGE_KEY, "[]");
    let mut board = open_empty(&store);

    assert!(matches!(
        board.rename("ghost", "Lead"),
        Err(BoardError::NotFound(ref id)) if id == "ghost"
    ));
    assert!(matches!(board.toggle("ghost"), Err(BoardError::NotFound(_))));
    assert!(matches!(
        board.set_checked("ghost", true),
        Err(BoardError::NotFound(_))
    ));
    assert!(matches!(
        board.set_category("ghost", Category::Future),
        Err(BoardError::NotFound(_))
    ));
    assert_eq!(store.write_count(), 0);
}

#[test]
fn relocate_unknown_id_is_silent_no_op() {
    let store = MemoryBlobStore::new();
    let mut board = open_empty(&store);
    let before = board.snapshot().to_vec();
    let revision = board.revision();

    board
        .relocate("unknown-id", Category::Future)
        .expect("stale drop should be accepted");

    assert_eq!(board.snapshot(), before.as_slice());
    assert_eq!(board.revision(), revision);
}

#[test]
fn relocate_keeps_sequence_position_and_last_drop_wins() {
    let store = MemoryBlobStore::with_blob(STORAGE_KEY, "[]");
    let mut board = open_empty(&store);
    let first = board.create("First", Category::Past).expect("create role");
    let second = board.create("Second", Category::Past).expect("create role");

    for category in [Category::Future, Category::Tbd, Category::Present] {
        board
            .relocate(first.id.as_str(), category)
            .expect("relocate role");
    }

    let ids = board
        .snapshot()
        .iter()
        .map(|role| role.id.clone())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![second.id.clone(), first.id.clone()]);
    assert_eq!(
        board
            .get(first.id.as_str())
            .expect("relocated role should exist")
            .category,
        Category::Present
    );
    assert_eq!(persisted_roles(&store)[1].category, Category::Present);
}

#[test]
fn delete_is_idempotent() {
    let store = MemoryBlobStore::with_blob(STORAGE_KEY, "[]");
    let mut board = open_empty(&store);
    let role = board.create("Lead", Category::Past).expect("create role");

    board.delete(role.id.as_str()).expect("delete role");
    board.delete(role.id.as_str()).expect("delete role");

    assert!(board.get(role.id.as_str()).is_none());
    assert_eq!(store.write_count(), 2);
}

#[test]
fn mixed_operation_sequence_preserves_invariants() {
    let store = MemoryBlobStore::new();
    let mut board = open_empty(&store);

    for round in 0..40 {
        let category = Category::ALL[round % 4];
        board
            .create(&format!("Role {round}"), category)
            .expect("create role");

        let target = board.snapshot()[(round * 7) % board.len()].id.clone();
        match round % 5 {
            0 => board
                .relocate(target.as_str(), Category::ALL[(round + 1) % 4])
                .expect("relocate role"),
            1 => board
                .rename(target.as_str(), &format!("Renamed {round}"))
                .expect("rename role"),
            2 => {
                board.toggle(target.as_str()).expect("toggle role");
            }
            3 => board.delete(target.as_str()).expect("delete role"),
            _ => board
                .relocate("stale-drop", Category::Past)
                .expect("stale drop should be accepted"),
        }
        assert_invariants(board.snapshot());
    }

    assert_eq!(persisted_roles(&store), board.snapshot());
}

#[test]
fn failed_save_keeps_memory_state_until_retry_succeeds() {
    let store = MemoryBlobStore::with_blob(STORAGE_KEY, "[]");
    let mut board = open_empty(&store);
    let kept = board.create("Kept", Category::Past).expect("create role");

    store.set_write_failure(Some("quota exceeded"));
    let err = board
        .create("Unsaved", Category::Future)
        .expect_err("save must fail while writes are rejected");
    assert!(matches!(err, BoardError::Persistence(_)));
    assert!(err.to_string().contains("quota exceeded"));
    assert!(board.has_unsaved_changes());
    assert_eq!(board.snapshot()[0].name, "Unsaved");
    assert_eq!(board.snapshot()[1].id, kept.id);
    assert_eq!(persisted_roles(&store).len(), 1);

    let still_failing = board
        .retry_save()
        .expect_err("retry must fail while writes are rejected");
    assert!(matches!(still_failing, BoardError::Persistence(_)));

    store.set_write_failure(None);
    board.retry_save().expect("retry should save once writes recover");
    assert!(!board.has_unsaved_changes());
    assert_eq!(persisted_roles(&store), board.snapshot());
}
