//! Business entities shared by the ledger, the customer directory and checkout.
//!
//! These are plain data types with no actor concerns. Orders can only be
//! built by the ledger's commit path; everything else is freely constructible.

pub mod order;
pub mod payment;
pub mod product;
pub mod user;

pub use order::*;
pub use payment::*;
pub use product::*;
pub use user::*;
