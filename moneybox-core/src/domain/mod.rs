//! Core domain entities
//!
//! All ledger rules live here. These are pure data structures with
//! validation logic - no I/O or external dependencies.

mod account;
mod user;
pub mod result;

pub use account::{ensure_storable, Account, AMOUNT_SCALE, MAX_AMOUNT, PAY_IN_LIMIT};
pub use user::User;
