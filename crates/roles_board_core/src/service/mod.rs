//! Board use-case services.
//!
//! # Responsibility
//! - Hold the in-memory board and apply collaborator intents to it.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod board_service;
pub mod intent;
