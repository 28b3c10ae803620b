//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The use cases
//! depend only on these traits, not on concrete implementations.

mod notification;
mod repository;

pub use notification::{NotificationKind, NotificationService};
pub use repository::AccountRepository;
