use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::user::{Role, User};

const USER_COLUMNS: &str = "id, username, email, password_hash, role, created_at";

pub struct UserRepository;

impl UserRepository {
    pub async fn create(
        pool: &Pool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let client = pool.get().await?;
        let taken = client
            .query_opt(
                "SELECT id FROM users WHERE username = $1 OR email = $2",
                &[&username, &email],
            )
            .await?;
        if taken.is_some() {
            return Err(AppError::Conflict("User already exists".into()));
        }

        let id = Uuid::new_v4();
        let row = client
            .query_one(
                &format!(
                    "INSERT INTO users (id, username, email, password_hash, role) \
                     VALUES ($1, $2, $3, $4, 'user') RETURNING {USER_COLUMNS}"
                ),
                &[&id, &username, &email, &password_hash],
            )
            .await?;
        Ok(row_to_user(&row))
    }

    pub async fn find_by_email(pool: &Pool, email: &str) -> Result<Option<User>, AppError> {
        let client = pool.get().await?;
        let row = client
            .query_opt(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"),
                &[&email],
            )
            .await?;
        Ok(row.as_ref().map(row_to_user))
    }

    pub async fn find_by_id(pool: &Pool, id: Uuid) -> Result<Option<User>, AppError> {
        let client = pool.get().await?;
        let row = client
            .query_opt(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"),
                &[&id],
            )
            .await?;
        Ok(row.as_ref().map(row_to_user))
    }
}

fn row_to_user(row: &Row) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: Role::parse(row.get("role")),
        created_at: row.get("created_at"),
    }
}
