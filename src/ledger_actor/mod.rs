//! The order ledger: catalog stock plus the order collection, owned by a
//! single actor so that order commits are serialized.

pub mod commit;
pub mod error;
pub mod messages;
mod service;

pub use error::*;
pub use messages::*;
pub use service::LedgerService;
