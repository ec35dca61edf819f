//! Request handlers.

pub mod applications;
pub mod companies;
pub mod health;
pub mod jobs;
pub mod users;

pub use applications::*;
pub use companies::*;
pub use health::*;
pub use jobs::*;
pub use users::*;

use serde::Serialize;

/// Success envelope with no entity payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    pub success: bool,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }
}
