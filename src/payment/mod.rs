//! Payment capture, which checkout runs before committing an order.

pub mod error;
mod gateway;

pub use error::*;
pub use gateway::*;
