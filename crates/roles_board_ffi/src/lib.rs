//! Flutter bridge for the roles board engine.

pub mod api;
