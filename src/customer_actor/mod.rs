//! Customer directory for the admin console: accounts, activation and roles.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
