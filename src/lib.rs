//! Order ledger for a demo storefront: a product catalog with live stock, an
//! order ledger, a customer directory and a simulated payment step.
//!
//! The ledger is a single actor, so stock checks and decrements for one
//! order happen as one step relative to every other order.

pub mod actor_framework;
pub mod app_system;
pub mod clients;
pub mod customer_actor;
pub mod domain;
pub mod ledger_actor;
pub mod payment;
pub mod store;

#[cfg(test)]
mod mock_framework;
