use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::user::Role;

/// Representation of a `posts` row as stored.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub featured_image: Option<String>,
    pub author: Uuid,
    pub likes: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    /// A post may be mutated only by its author or an admin.
    pub fn can_modify(&self, user_id: Uuid, role: Role) -> bool {
        self.author == user_id || role == Role::Admin
    }

    pub fn has_liked(&self, user_id: Uuid) -> bool {
        self.likes.contains(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(author: Uuid) -> Post {
        Post {
            id: Uuid::new_v4(),
            title: "t".into(),
            content: "c".into(),
            category: "Tech".into(),
            featured_image: None,
            author,
            likes: Vec::new(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn author_can_modify() {
        let author = Uuid::new_v4();
        assert!(post(author).can_modify(author, Role::User));
    }

    #[test]
    fn admin_can_modify_any_post() {
        assert!(post(Uuid::new_v4()).can_modify(Uuid::new_v4(), Role::Admin));
    }

    #[test]
    fn stranger_cannot_modify() {
        assert!(!post(Uuid::new_v4()).can_modify(Uuid::new_v4(), Role::User));
    }

    #[test]
    fn has_liked_checks_membership() {
        let user = Uuid::new_v4();
        let mut p = post(Uuid::new_v4());
        assert!(!p.has_liked(user));
        p.likes.push(user);
        assert!(p.has_liked(user));
    }
}
