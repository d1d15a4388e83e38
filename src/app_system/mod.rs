//! System configuration, startup and shutdown.

pub mod config;
pub mod error;
pub mod ledger_system;
pub mod seed;
pub mod tracing;

pub use config::*;
pub use error::*;
pub use ledger_system::*;
pub use tracing::*;
