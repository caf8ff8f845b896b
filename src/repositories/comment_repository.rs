use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::dtos::comment::{CommentAuthorOut, CommentOut};
use crate::error::AppError;

pub struct CommentRepository;

impl CommentRepository {
    /// Comments for a post, newest first, with the author populated where
    /// the account still resolves.
    pub async fn list_by_post(pool: &Pool, post_id: Uuid) -> Result<Vec<CommentOut>, AppError> {
        let client = pool.get().await?;
        let rows = client
            .query(
                "SELECT c.id, c.content, c.post, c.created_at, \
                        u.id AS author_id, u.username AS author_username, \
                        u.email AS author_email \
                 FROM comments c LEFT JOIN users u ON u.id = c.author \
                 WHERE c.post = $1 \
                 ORDER BY c.created_at DESC, c.id DESC",
                &[&post_id],
            )
            .await?;
        Ok(rows.iter().map(row_to_comment_out).collect())
    }

    pub async fn create(
        pool: &Pool,
        post_id: Uuid,
        author: Uuid,
        content: &str,
    ) -> Result<CommentOut, AppError> {
        let client = pool.get().await?;
        let id = Uuid::new_v4();
        client
            .execute(
                "INSERT INTO comments (id, content, author, post) VALUES ($1, $2, $3, $4)",
                &[&id, &content, &author, &post_id],
            )
            .await?;
        let row = client
            .query_one(
                "SELECT c.id, c.content, c.post, c.created_at, \
                        u.id AS author_id, u.username AS author_username, \
                        u.email AS author_email \
                 FROM comments c LEFT JOIN users u ON u.id = c.author \
                 WHERE c.id = $1",
                &[&id],
            )
            .await?;
        Ok(row_to_comment_out(&row))
    }
}

fn row_to_comment_out(row: &Row) -> CommentOut {
    let author = row
        .get::<_, Option<Uuid>>("author_id")
        .map(|id| CommentAuthorOut {
            id,
            username: row.get("author_username"),
            email: row.get("author_email"),
        });
    CommentOut {
        id: row.get("id"),
        content: row.get("content"),
        author,
        post: row.get("post"),
        created_at: row.get("created_at"),
    }
}
