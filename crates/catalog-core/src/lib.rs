pub mod error;
pub mod outcome;
pub mod product;
pub mod time;
pub mod user;

pub use error::{CoreError, Result};
pub use outcome::{Failure, FailureKind, Outcome};
pub use product::{Product, ProductView};
pub use time::now_utc;
pub use user::{User, UserRole};
