//! Handles for talking to the actors, plus the checkout orchestration that
//! spans the ledger and the payment gateway.

#[macro_use]
mod macros;

mod checkout_client;
mod customer_client;
mod ledger_client;

pub use checkout_client::*;
pub use customer_client::*;
pub use ledger_client::*;
