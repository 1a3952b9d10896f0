use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// `?user_id=` on every user-scoped route.
#[derive(Debug, Clone, Deserialize)]
pub struct UserQuery {
    pub user_id: i64,
}
