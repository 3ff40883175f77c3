//! Request handlers.
//!
//! Each submodule parses and validates its request DTOs, delegates to
//! `cinedex_core` or the store collaborators held in [`AppState`], and maps
//! errors via [`AppError`].
//!
//! [`AppState`]: crate::state::AppState
//! [`AppError`]: crate::error::AppError

pub mod bulk_assign;
pub mod master_data;
pub mod templates;
