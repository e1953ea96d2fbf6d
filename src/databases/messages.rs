use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: i64,
    pub body: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Both fields optional so a missing one reaches the handler instead of
// failing JSON deserialization; extra fields are ignored.
#[derive(Debug, Deserialize)]
pub struct NewMessage {
    pub body: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMessage {
    pub body: Option<String>,
}
