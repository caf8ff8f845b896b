use deadpool_postgres::Pool;
use log::info;

use crate::error::AppError;

// No foreign keys on posts.author or comments.post: a vanished author is
// rendered as "Unknown" by the client, and deleting a post deliberately
// leaves its comments behind.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id            UUID PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role          TEXT NOT NULL DEFAULT 'user',
    created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS posts (
    id             UUID PRIMARY KEY,
    title          TEXT NOT NULL,
    content        TEXT NOT NULL,
    category       TEXT NOT NULL,
    featured_image TEXT,
    author         UUID NOT NULL,
    likes          UUID[] NOT NULL DEFAULT '{}',
    created_at     TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at     TIMESTAMPTZ
);

CREATE TABLE IF NOT EXISTS comments (
    id         UUID PRIMARY KEY,
    content    TEXT NOT NULL,
    author     UUID NOT NULL,
    post       UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS categories (
    id         UUID PRIMARY KEY,
    name       TEXT NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts (created_at DESC, id DESC);
CREATE INDEX IF NOT EXISTS idx_posts_category ON posts (category);
CREATE INDEX IF NOT EXISTS idx_comments_post ON comments (post);
";

/// Create the tables on startup if they are missing.
pub async fn init_schema(pool: &Pool) -> Result<(), AppError> {
    let client = pool.get().await?;
    client.batch_execute(SCHEMA).await?;
    info!("database schema ready");
    Ok(())
}
