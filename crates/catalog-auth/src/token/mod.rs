//! Identity token issuance and validation.
//!
//! - [`jwt`] - HS256 token service, claims and validation errors
//! - [`clock`] - Injectable time source for expiry checks

pub mod clock;
pub mod jwt;

pub use clock::{FixedClock, ManualClock, SystemClock, TokenClock};
pub use jwt::{IdentityClaims, IssuedToken, TokenError, TokenService};
