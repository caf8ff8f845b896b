use argon2::{
    Argon2, PasswordHash, PasswordVerifier,
    password_hash::{PasswordHasher, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::error::AppError;
use crate::models::user::{JwtClaims, User};

/// Issues and validates bearer tokens and hashes credentials.
#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
    token_ttl_hours: i64,
}

impl AuthService {
    pub fn new(jwt_secret: String, token_ttl_hours: i64) -> Self {
        Self {
            jwt_secret,
            token_ttl_hours,
        }
    }

    /// Hash a password with Argon2id, returning the PHC string for storage.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(rand::thread_rng());
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| AppError::Internal("Failed to hash password".to_string()))?
            .to_string();
        Ok(hash)
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|_| AppError::Internal("Invalid password hash format".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Sign an HS256 token carrying the user id and role.
    pub fn issue_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user.id.to_string(),
            role: user.role.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.token_ttl_hours)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    pub fn decode_token(&self, token: &str) -> Result<JwtClaims, AppError> {
        let data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;
    use uuid::Uuid;

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn hash_and_verify() {
        let svc = AuthService::new("secret".into(), 24);
        let hash = svc.hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(svc.verify_password("correct horse", &hash).unwrap());
        assert!(!svc.verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn token_round_trip() {
        let svc = AuthService::new("secret".into(), 24);
        let u = user(Role::Admin);
        let token = svc.issue_token(&u).unwrap();
        let claims = svc.decode_token(&token).unwrap();
        assert_eq!(claims.sub, u.id.to_string());
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let svc = AuthService::new("secret".into(), 24);
        let other = AuthService::new("different".into(), 24);
        let token = svc.issue_token(&user(Role::User)).unwrap();
        assert!(other.decode_token(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = AuthService::new("secret".into(), -1);
        let token = svc.issue_token(&user(Role::User)).unwrap();
        assert!(svc.decode_token(&token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        let svc = AuthService::new("secret".into(), 24);
        assert!(svc.decode_token("not.a.jwt").is_err());
    }
}
