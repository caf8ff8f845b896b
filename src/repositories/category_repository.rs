use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::category::Category;

pub struct CategoryRepository;

impl CategoryRepository {
    pub async fn list(pool: &Pool) -> Result<Vec<Category>, AppError> {
        let client = pool.get().await?;
        let rows = client
            .query(
                "SELECT id, name, created_at FROM categories ORDER BY name",
                &[],
            )
            .await?;
        Ok(rows.iter().map(row_to_category).collect())
    }

    pub async fn create(pool: &Pool, name: &str) -> Result<Category, AppError> {
        let client = pool.get().await?;
        let taken = client
            .query_opt("SELECT id FROM categories WHERE name = $1", &[&name])
            .await?;
        if taken.is_some() {
            return Err(AppError::Conflict("Category already exists".into()));
        }

        let id = Uuid::new_v4();
        let row = client
            .query_one(
                "INSERT INTO categories (id, name) VALUES ($1, $2) \
                 RETURNING id, name, created_at",
                &[&id, &name],
            )
            .await?;
        Ok(row_to_category(&row))
    }
}

fn row_to_category(row: &Row) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    }
}
