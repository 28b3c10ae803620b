//! User domain model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Owner of an account, referenced for notification delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
}

impl User {
    pub fn new(id: Uuid, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }

    /// Create a user with a fresh id
    pub fn with_email(email: impl Into<String>) -> Self {
        Self::new(Uuid::new_v4(), email)
    }

    /// Validate user data
    pub fn validate(&self) -> Result<(), &'static str> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err("email cannot be empty");
        }
        if !email.contains('@') {
            return Err("email must contain '@'");
        }
        Ok(())
    }
}
