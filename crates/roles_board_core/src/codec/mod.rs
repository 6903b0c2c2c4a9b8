//! Portable board document codec.
//!
//! # Responsibility
//! - Serialize snapshots for export files and the persisted blob.
//! - Turn untrusted external documents into valid roles or a `FormatError`.

pub mod document;
