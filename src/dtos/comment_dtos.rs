use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentIn {
    pub content: String,
}

/// Comment authors are populated with username and email only.
#[derive(Debug, Serialize)]
pub struct CommentAuthorOut {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct CommentOut {
    pub id: Uuid,
    pub content: String,
    pub author: Option<CommentAuthorOut>,
    pub post: Uuid,
    pub created_at: DateTime<Utc>,
}
