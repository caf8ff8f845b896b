use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Representation of a `comments` row. Comments have no update or delete
/// surface and may outlive their post.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub author: Uuid,
    pub post: Uuid,
    pub created_at: DateTime<Utc>,
}
