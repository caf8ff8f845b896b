use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A free-form label used for filtering posts. Names are unique but not an
/// enum; the client offers a fixed default list on top of these.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
