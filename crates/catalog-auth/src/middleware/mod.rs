//! Request authentication gate.
//!
//! - [`gate`] - Bearer extraction and the principal extractors
//! - [`error`] - HTTP rendering of [`crate::AuthError`]

pub mod error;
pub mod gate;

pub use gate::{AuthState, Authenticated, MaybePrincipal, extract_bearer};
