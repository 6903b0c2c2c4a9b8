//! Persistence layer: blob store contracts and the board persistence adapter.
//!
//! # Responsibility
//! - Treat durable storage as an opaque key/value blob store.
//! - Own board load-time recovery and whole-snapshot saves.
//!
//! # Invariants
//! - Blobs are only read or written whole; there is no partial access.
//! - Loading never fails; unusable state is replaced by seed data.

pub mod blob_repo;
pub mod board_repo;
pub mod memory;
