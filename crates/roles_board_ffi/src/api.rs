//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose one sync function per board intent to Dart via FRB.
//! - Map engine errors to stable, UI-friendly response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - One board lives for the whole process behind one lock, so intents run
//!   one at a time and each sees the previous intent's in-memory state, saved
//!   or not.

use log::info;
use roles_board_core::db::open_db;
use roles_board_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    resolve_db_path, BlobBoardRepository, BoardError, BoardIntent, BoardResult, IntentOutcome,
    Role, RoleBoard, SqliteBlobStore, EXPORT_FILE_NAME,
};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

type SharedBoard = RoleBoard<BlobBoardRepository<SqliteBlobStore<Connection>>>;

static BOARD: Mutex<Option<SharedBoard>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory for rolling logs.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One role as shown on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRoleItem {
    pub id: String,
    pub name: String,
    /// `Past|Present|Future|TBD`.
    pub category: String,
    pub checked: bool,
}

/// Full board snapshot in store order (newest first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshotResponse {
    pub ok: bool,
    pub items: Vec<BoardRoleItem>,
    /// Memory is ahead of storage; offer `board_retry_save`.
    pub unsaved: bool,
    /// Storage was unreadable at startup; saving would overwrite it.
    pub storage_unread: bool,
    pub message: String,
}

/// Result envelope for one mutating intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardActionResponse {
    pub ok: bool,
    /// Whether the board changed (false for cancelled edits and stale drops).
    pub changed: bool,
    /// Created role id.
    pub role_id: Option<String>,
    /// New `checked` value after a toggle.
    pub checked: Option<bool>,
    /// `validation|not_found|format|persistence|io|storage` on failure.
    pub error_kind: Option<String>,
    pub message: String,
}

impl BoardActionResponse {
    fn from_outcome(outcome: IntentOutcome) -> Self {
        let mut response = Self {
            ok: true,
            changed: true,
            role_id: None,
            checked: None,
            error_kind: None,
            message: String::new(),
        };
        match outcome {
            IntentOutcome::Created(role) => {
                response.message = "Role created.".to_string();
                response.role_id = Some(role.id.to_string());
            }
            IntentOutcome::Toggled(checked) => {
                response.message = if checked {
                    "Role checked.".to_string()
                } else {
                    "Role unchecked.".to_string()
                };
                response.checked = Some(checked);
            }
            IntentOutcome::Imported(summary) => {
                response.message = format!(
                    "Imported {} role(s); {} category(ies) set to TBD.",
                    summary.imported, summary.defaulted_categories
                );
            }
            IntentOutcome::Updated => response.message = "Role updated.".to_string(),
            IntentOutcome::Ignored => {
                response.changed = false;
                response.message = "No change.".to_string();
            }
        }
        response
    }

    fn failure(kind: &str, changed: bool, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            changed,
            role_id: None,
            checked: None,
            error_kind: Some(kind.to_string()),
            message: message.into(),
        }
    }
}

/// Export payload offered to the UI as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardExportResponse {
    pub ok: bool,
    /// Suggested file name (`roles-board.json`).
    pub file_name: String,
    /// Pretty-printed board document; empty on failure.
    pub document: String,
    pub message: String,
}

/// Returns the current board for rendering.
#[flutter_rust_bridge::frb(sync)]
pub fn board_snapshot() -> BoardSnapshotResponse {
    with_board(|board| snapshot_response(board)).unwrap_or_else(|err| BoardSnapshotResponse {
        ok: false,
        items: Vec::new(),
        unsaved: false,
        storage_unread: false,
        message: format!("board_snapshot failed: {err}"),
    })
}

/// Adds a role from the add form.
#[flutter_rust_bridge::frb(sync)]
pub fn board_create_role(name: String, category: String) -> BoardActionResponse {
    apply_intent("board_create_role", BoardIntent::Create { name, category })
}

/// Commits an inline title edit.
#[flutter_rust_bridge::frb(sync)]
pub fn board_rename_role(id: String, name: String) -> BoardActionResponse {
    apply_intent("board_rename_role", BoardIntent::Rename { id, text: name })
}

/// Handles a card dropped on a category column.
#[flutter_rust_bridge::frb(sync)]
pub fn board_relocate_role(id: String, category: String) -> BoardActionResponse {
    apply_intent("board_relocate_role", BoardIntent::Relocate { id, category })
}

/// Handles the per-card category picker.
#[flutter_rust_bridge::frb(sync)]
pub fn board_set_category(id: String, category: String) -> BoardActionResponse {
    apply_intent("board_set_category", BoardIntent::SetCategory { id, category })
}

/// Flips a card checkbox.
#[flutter_rust_bridge::frb(sync)]
pub fn board_toggle_role(id: String) -> BoardActionResponse {
    apply_intent("board_toggle_role", BoardIntent::Toggle { id })
}

/// Deletes a role. The UI must confirm before calling.
#[flutter_rust_bridge::frb(sync)]
pub fn board_delete_role(id: String) -> BoardActionResponse {
    apply_intent("board_delete_role", BoardIntent::Delete { id })
}

/// Replaces the board with the contents of an imported file.
///
/// The UI reads the file; nothing changes unless the document passes
/// validation.
#[flutter_rust_bridge::frb(sync)]
pub fn board_import(document: String) -> BoardActionResponse {
    apply_intent("board_import", BoardIntent::Import { document })
}

/// Saves the in-memory board again after a failed save.
///
/// Also confirms overwriting storage that was unreadable at startup.
#[flutter_rust_bridge::frb(sync)]
pub fn board_retry_save() -> BoardActionResponse {
    run_action("board_retry_save", |board| {
        board.retry_save().map(|()| IntentOutcome::Updated)
    })
}

/// Re-reads storage, dropping unsaved in-memory changes.
#[flutter_rust_bridge::frb(sync)]
pub fn board_reload() -> BoardActionResponse {
    run_action("board_reload", |board| {
        board.reload().map(|()| IntentOutcome::Updated)
    })
}

/// Renders the board document for download.
#[flutter_rust_bridge::frb(sync)]
pub fn board_export() -> BoardExportResponse {
    match with_board(|board| board.export()) {
        Ok(Ok(document)) => BoardExportResponse {
            ok: true,
            file_name: EXPORT_FILE_NAME.to_string(),
            document,
            message: "Board exported.".to_string(),
        },
        Ok(Err(err)) => export_failure(err.to_string()),
        Err(err) => export_failure(err),
    }
}

fn export_failure(reason: String) -> BoardExportResponse {
    BoardExportResponse {
        ok: false,
        file_name: EXPORT_FILE_NAME.to_string(),
        document: String::new(),
        message: format!("board_export failed: {reason}"),
    }
}

fn apply_intent(label: &str, intent: BoardIntent) -> BoardActionResponse {
    run_action(label, |board| board.apply(intent))
}

fn run_action(
    label: &str,
    action: impl FnOnce(&mut SharedBoard) -> BoardResult<IntentOutcome>,
) -> BoardActionResponse {
    with_board(|board| action_on(board, label, action)).unwrap_or_else(|err| {
        BoardActionResponse::failure("storage", false, format!("{label} failed: {err}"))
    })
}

fn snapshot_response(board: &SharedBoard) -> BoardSnapshotResponse {
    let items = board.snapshot().iter().map(to_item).collect::<Vec<_>>();
    let message = if board.is_storage_unread() {
        "Storage could not be read; changes are not being saved.".to_string()
    } else if board.has_unsaved_changes() {
        "Changes are not saved yet.".to_string()
    } else {
        format!("{} role(s).", items.len())
    };
    BoardSnapshotResponse {
        ok: true,
        items,
        unsaved: board.has_unsaved_changes(),
        storage_unread: board.is_storage_unread(),
        message,
    }
}

/// `changed` follows the board revision, so a mutation kept in memory after
/// a failed save still reports a change.
fn action_on(
    board: &mut SharedBoard,
    label: &str,
    action: impl FnOnce(&mut SharedBoard) -> BoardResult<IntentOutcome>,
) -> BoardActionResponse {
    let revision = board.revision();
    match action(board) {
        Ok(outcome) => BoardActionResponse::from_outcome(outcome),
        Err(err) => {
            let kind = error_kind(&err);
            let changed = board.revision() != revision;
            info!(
                "event=ffi_intent module=ffi status=error call={label} kind={kind} changed={changed}"
            );
            BoardActionResponse::failure(kind, changed, format!("{label} failed: {err}"))
        }
    }
}

fn error_kind(err: &BoardError) -> &'static str {
    match err {
        BoardError::Validation(_) => "validation",
        BoardError::NotFound(_) => "not_found",
        BoardError::Format(_) => "format",
        BoardError::Persistence(_) => "persistence",
        BoardError::ImportRead { .. } => "io",
    }
}

fn open_shared_board(db_path: &Path) -> Result<SharedBoard, String> {
    let conn = open_db(db_path).map_err(|err| format!("board DB open failed: {err}"))?;
    info!(
        "event=ffi_board_open module=ffi status=ok db_path={}",
        db_path.display()
    );
    Ok(RoleBoard::open(BlobBoardRepository::new(
        SqliteBlobStore::new(conn),
    )))
}

/// Runs `f` on the process board, opening it on first use.
///
/// A failed open is retried by the next call.
fn with_board<T>(f: impl FnOnce(&mut SharedBoard) -> T) -> Result<T, String> {
    let mut slot = BOARD.lock().unwrap_or_else(PoisonError::into_inner);
    if slot.is_none() {
        *slot = Some(open_shared_board(&resolve_db_path(None))?);
    }
    match slot.as_mut() {
        Some(board) => Ok(f(board)),
        None => Err("board is not available".to_string()),
    }
}

fn to_item(role: &Role) -> BoardRoleItem {
    BoardRoleItem {
        id: role.id.to_string(),
        name: role.name.clone(),
        category: role.category.as_str().to_string(),
        checked: role.checked,
    }
}
