use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role gates edit/delete authorization on posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Lenient: anything that is not "admin" is a regular user.
    pub fn parse(s: &str) -> Role {
        match s {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

/// Representation of a `users` row.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Version sent to the client (credential redacted).
#[derive(Debug, Clone, Serialize)]
pub struct UserPublic {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn to_public(&self) -> UserPublic {
        UserPublic {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Claims carried in the bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    /// subject / user id
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_is_lenient() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("user"), Role::User);
        assert_eq!(Role::parse("moderator"), Role::User);
    }

    #[test]
    fn public_view_drops_the_hash() {
        let user = User {
            id: Uuid::new_v4(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            password_hash: "$argon2id$...".into(),
            role: Role::User,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(user.to_public()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "ada");
    }
}
