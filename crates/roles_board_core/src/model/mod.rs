//! Board domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by the board engine.
//! - Own the fixed category vocabulary.
//!
//! # Invariants
//! - Every role is identified by a stable `RoleId`.
//! - Every role category is one of the four `Category` values.

pub mod category;
pub mod role;
