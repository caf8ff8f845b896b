use deadpool_postgres::Pool;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;
use uuid::Uuid;

use crate::dtos::post::{AuthorOut, PostIn, PostOut};
use crate::error::AppError;
use crate::models::post::Post;
use crate::models::user::Role;

/// Listing filters: free-text substring search over title/content and
/// category equality, both optional.
#[derive(Debug, Default)]
pub struct PostFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

const POST_COLUMNS: &str =
    "p.id, p.title, p.content, p.category, p.featured_image, p.author, p.likes, \
     p.created_at, p.updated_at";

const AUTHOR_COLUMNS: &str =
    "u.id AS author_id, u.username AS author_username, u.email AS author_email, \
     u.role AS author_role";

/// Build the WHERE clause and its owned text parameters. Parameters are
/// numbered from $1; the caller appends any further bindings after them.
fn where_clause(filter: &PostFilter) -> (String, Vec<String>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut params: Vec<String> = Vec::new();

    if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
        params.push(format!("%{}%", search));
        let n = params.len();
        conditions.push(format!("(p.title ILIKE ${n} OR p.content ILIKE ${n})"));
    }
    if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
        params.push(category.to_string());
        conditions.push(format!("p.category = ${}", params.len()));
    }

    if conditions.is_empty() {
        (String::new(), params)
    } else {
        (format!("WHERE {}", conditions.join(" AND ")), params)
    }
}

/// Row offset for a 1-based page. Saturates so an absurd `?page=` cannot
/// overflow; Postgres returns an empty page for an out-of-range OFFSET.
fn offset_for(page: i64, limit: i64) -> i64 {
    page.max(1).saturating_sub(1).saturating_mul(limit.max(0))
}

pub struct PostRepository;

impl PostRepository {
    /// Page of posts (author populated) plus the total matching count.
    /// Ordered by recency with an id tie-break so pages never overlap.
    pub async fn list(
        pool: &Pool,
        filter: &PostFilter,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<PostOut>, i64), AppError> {
        let client = pool.get().await?;
        let (where_sql, text_params) = where_clause(filter);

        let mut params: Vec<&(dyn ToSql + Sync)> = text_params
            .iter()
            .map(|p| p as &(dyn ToSql + Sync))
            .collect();

        let count_sql = format!("SELECT COUNT(*) FROM posts p {where_sql}");
        let total: i64 = client.query_one(&count_sql, &params).await?.get(0);

        let offset = offset_for(page, limit);
        let list_sql = format!(
            "SELECT {POST_COLUMNS}, {AUTHOR_COLUMNS} \
             FROM posts p LEFT JOIN users u ON u.id = p.author {where_sql} \
             ORDER BY p.created_at DESC, p.id DESC LIMIT ${} OFFSET ${}",
            text_params.len() + 1,
            text_params.len() + 2,
        );
        params.push(&limit);
        params.push(&offset);

        let rows = client.query(&list_sql, &params).await?;
        Ok((rows.iter().map(row_to_post_out).collect(), total))
    }

    /// Single post with populated author, for API responses.
    pub async fn get(pool: &Pool, id: Uuid) -> Result<Option<PostOut>, AppError> {
        let client = pool.get().await?;
        let row = client
            .query_opt(
                &format!(
                    "SELECT {POST_COLUMNS}, {AUTHOR_COLUMNS} \
                     FROM posts p LEFT JOIN users u ON u.id = p.author WHERE p.id = $1"
                ),
                &[&id],
            )
            .await?;
        Ok(row.as_ref().map(row_to_post_out))
    }

    /// Raw row without the author join, for ownership checks.
    pub async fn find(pool: &Pool, id: Uuid) -> Result<Option<Post>, AppError> {
        let client = pool.get().await?;
        let row = client
            .query_opt(
                &format!("SELECT {POST_COLUMNS} FROM posts p WHERE p.id = $1"),
                &[&id],
            )
            .await?;
        Ok(row.as_ref().map(row_to_post))
    }

    pub async fn create(pool: &Pool, author: Uuid, input: &PostIn) -> Result<PostOut, AppError> {
        let id = Uuid::new_v4();
        {
            let client = pool.get().await?;
            client
                .execute(
                    "INSERT INTO posts (id, title, content, category, featured_image, author) \
                     VALUES ($1, $2, $3, $4, $5, $6)",
                    &[
                        &id,
                        &input.title,
                        &input.content,
                        &input.category,
                        &input.featured_image,
                        &author,
                    ],
                )
                .await?;
        }
        Self::get(pool, id)
            .await?
            .ok_or_else(|| AppError::Internal("Created post missing".into()))
    }

    /// Whole-record replace; `updated_at` is set by the statement.
    pub async fn update(pool: &Pool, id: Uuid, input: &PostIn) -> Result<PostOut, AppError> {
        {
            let client = pool.get().await?;
            client
                .execute(
                    "UPDATE posts SET title = $1, content = $2, category = $3, \
                     featured_image = $4, updated_at = now() WHERE id = $5",
                    &[
                        &input.title,
                        &input.content,
                        &input.category,
                        &input.featured_image,
                        &id,
                    ],
                )
                .await?;
        }
        Self::get(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".into()))
    }

    /// Comments are deliberately left in place (no cascade).
    pub async fn delete(pool: &Pool, id: Uuid) -> Result<u64, AppError> {
        let client = pool.get().await?;
        Ok(client
            .execute("DELETE FROM posts WHERE id = $1", &[&id])
            .await?)
    }

    /// Guarded atomic append: returns the new like count, or None when the
    /// user already liked the post (or it vanished meanwhile).
    pub async fn like(pool: &Pool, post_id: Uuid, user_id: Uuid) -> Result<Option<i64>, AppError> {
        let client = pool.get().await?;
        let row = client
            .query_opt(
                "UPDATE posts SET likes = array_append(likes, $1) \
                 WHERE id = $2 AND NOT ($1 = ANY(likes)) \
                 RETURNING cardinality(likes)",
                &[&user_id, &post_id],
            )
            .await?;
        Ok(row.map(|r| i64::from(r.get::<_, i32>(0))))
    }

    /// Guarded atomic removal: None when there was no like to remove.
    pub async fn unlike(
        pool: &Pool,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<i64>, AppError> {
        let client = pool.get().await?;
        let row = client
            .query_opt(
                "UPDATE posts SET likes = array_remove(likes, $1) \
                 WHERE id = $2 AND $1 = ANY(likes) \
                 RETURNING cardinality(likes)",
                &[&user_id, &post_id],
            )
            .await?;
        Ok(row.map(|r| i64::from(r.get::<_, i32>(0))))
    }
}

fn row_to_post(row: &Row) -> Post {
    Post {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        category: row.get("category"),
        featured_image: row.get("featured_image"),
        author: row.get("author"),
        likes: row.get("likes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn row_to_post_out(row: &Row) -> PostOut {
    let author = row
        .get::<_, Option<Uuid>>("author_id")
        .map(|id| AuthorOut {
            id,
            username: row.get("author_username"),
            email: row.get("author_email"),
            role: Role::parse(row.get("author_role")),
        });
    PostOut {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        category: row.get("category"),
        featured_image: row.get("featured_image"),
        author,
        likes: row.get("likes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
