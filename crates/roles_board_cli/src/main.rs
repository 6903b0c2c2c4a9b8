//! Command-line front end for the roles board.
//!
//! # Responsibility
//! - Translate subcommands into board intents and print the outcome.
//! - Own caller-side concerns the engine leaves out: delete confirmation,
//!   export file placement, human-readable rendering.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use roles_board_core::db::open_db;
use roles_board_core::{
    default_log_level, init_logging, resolve_db_path, BlobBoardRepository, BoardIntent,
    BoardRepository, IntentOutcome, RoleBoard, SqliteBlobStore, EXPORT_FILE_NAME,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "roles-board", version)]
#[command(about = "Sort roles into Past, Present, Future and TBD columns")]
struct Cli {
    /// SQLite file holding the board (falls back to ROLES_BOARD_DB_PATH, then the temp dir)
    #[arg(long, global = true)]
    db: Option<String>,
    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true, env = "ROLES_BOARD_LOG_LEVEL")]
    log_level: Option<String>,
    /// Absolute directory for rotated log files
    #[arg(long, global = true, env = "ROLES_BOARD_LOG_DIR")]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the board grouped into columns
    List,
    /// Add a role at the top of its column
    Add {
        name: String,
        #[arg(short, long, default_value = "TBD")]
        category: String,
    },
    /// Rename a role (blank or unchanged names are ignored)
    Rename { id: String, name: String },
    /// Drop a role onto another column (unknown ids are ignored)
    Move { id: String, category: String },
    /// Pick a role's category explicitly
    SetCategory { id: String, category: String },
    /// Mark a role
    Check { id: String },
    /// Unmark a role
    Uncheck { id: String },
    /// Flip a role's mark
    Toggle { id: String },
    /// Delete a role; requires --yes
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Write the board document to a file (`-` for stdout)
    Export {
        #[arg(short, long, default_value = EXPORT_FILE_NAME)]
        out: PathBuf,
    },
    /// Replace the whole board with a board document
    Import { file: PathBuf },
    /// Save the board again; overwrites storage that could not be read
    Save,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    start_logging(&cli);

    let db_path = resolve_db_path(cli.db.as_deref());
    info!("event=cli_start module=cli db_path={}", db_path.display());
    let conn = open_db(&db_path)
        .with_context(|| format!("failed to open board database `{}`", db_path.display()))?;
    let mut board = RoleBoard::open(BlobBoardRepository::new(SqliteBlobStore::new(&conn)));

    run(&mut board, cli.command)
}

fn start_logging(cli: &Cli) {
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    let log_dir = cli
        .log_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("roles-board-logs"));
    if let Err(err) = init_logging(level, &log_dir.to_string_lossy()) {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn run<R: BoardRepository>(board: &mut RoleBoard<R>, command: Commands) -> Result<()> {
    let intent = match command {
        Commands::List => {
            print!("{}", render_board(board));
            return Ok(());
        }
        Commands::Export { out } => return export(board, &out),
        Commands::Save => {
            board.retry_save().context("saving the board failed")?;
            println!("Saved {} role(s).", board.len());
            return Ok(());
        }
        Commands::Import { file } => {
            let summary = board
                .import_file(&file)
                .with_context(|| format!("import of `{}` failed", file.display()))?;
            println!("Imported {} role(s).", summary.imported);
            if summary.coerced() > 0 {
                println!(
                    "Adjusted: {} new id(s), {} duplicate id(s), {} category(ies) set to TBD.",
                    summary.generated_ids,
                    summary.reassigned_duplicate_ids,
                    summary.defaulted_categories
                );
            }
            return Ok(());
        }
        Commands::Delete { id, yes } => {
            if !yes {
                match board.get(&id) {
                    Some(role) => bail!("refusing to delete \"{}\" without --yes", role.name),
                    None => bail!("no role with id {id}"),
                }
            }
            BoardIntent::Delete { id }
        }
        Commands::Add { name, category } => BoardIntent::Create { name, category },
        Commands::Rename { id, name } => BoardIntent::Rename { id, text: name },
        Commands::Move { id, category } => BoardIntent::Relocate { id, category },
        Commands::SetCategory { id, category } => BoardIntent::SetCategory { id, category },
        Commands::Check { id } => BoardIntent::SetChecked { id, value: true },
        Commands::Uncheck { id } => BoardIntent::SetChecked { id, value: false },
        Commands::Toggle { id } => BoardIntent::Toggle { id },
    };

    match board.apply(intent)? {
        IntentOutcome::Created(role) => println!("Added {} ({}).", role.id, role.category),
        IntentOutcome::Toggled(checked) => {
            println!("{}", if checked { "Checked." } else { "Unchecked." })
        }
        IntentOutcome::Imported(summary) => println!("Imported {} role(s).", summary.imported),
        IntentOutcome::Updated => println!("Updated."),
        IntentOutcome::Ignored => println!("Nothing changed."),
    }
    Ok(())
}

fn export<R: BoardRepository>(board: &RoleBoard<R>, out: &Path) -> Result<()> {
    let document = board.export()?;
    if out.as_os_str() == "-" {
        println!("{document}");
        return Ok(());
    }
    std::fs::write(out, format!("{document}\n"))
        .with_context(|| format!("failed to write `{}`", out.display()))?;
    println!("Exported {} role(s) to {}.", board.len(), out.display());
    Ok(())
}

fn render_board<R: BoardRepository>(board: &RoleBoard<R>) -> String {
    let mut output = String::new();
    for column in board.columns() {
        output.push_str(&format!("{} ({})\n", column.category, column.roles.len()));
        for role in column.roles {
            let mark = if role.checked { "x" } else { " " };
            output.push_str(&format!("  [{mark}] {}  {}\n", role.name, role.id));
        }
    }
    output
}
