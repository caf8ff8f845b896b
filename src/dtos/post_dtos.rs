use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::Role;

/// Whole-record payload for both create and update.
#[derive(Debug, Deserialize)]
pub struct PostIn {
    pub title: String,
    pub content: String,
    pub category: String,
    pub featured_image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub category: Option<String>,
}

impl ListPostsQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }
}

/// Author fields populated alongside a post for display.
#[derive(Debug, Serialize)]
pub struct AuthorOut {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct PostOut {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub featured_image: Option<String>,
    /// None when the author account no longer resolves.
    pub author: Option<AuthorOut>,
    pub likes: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct PostPage {
    pub posts: Vec<PostOut>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

impl PostPage {
    pub fn new(posts: Vec<PostOut>, total: i64, page: i64, limit: i64) -> Self {
        Self {
            posts,
            total,
            page,
            pages: pages_for(total, limit),
        }
    }
}

/// `ceil(total / limit)`; zero results means zero pages.
pub fn pages_for(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

#[derive(Debug, Serialize)]
pub struct LikeOut {
    pub message: &'static str,
    pub likes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_round_up() {
        assert_eq!(pages_for(2, 1), 2);
        assert_eq!(pages_for(10, 3), 4);
        assert_eq!(pages_for(10, 10), 1);
    }

    #[test]
    fn empty_dataset_has_no_pages() {
        assert_eq!(pages_for(0, 10), 0);
    }

    #[test]
    fn query_defaults_and_clamps() {
        let q = ListPostsQuery {
            page: None,
            limit: None,
            search: None,
            category: None,
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 10);

        let q = ListPostsQuery {
            page: Some(0),
            limit: Some(1000),
            search: None,
            category: None,
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 100);
    }
}
