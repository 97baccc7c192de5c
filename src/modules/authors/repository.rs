use anyhow::Context;
use async_trait::async_trait;
use sqlx::SqlitePool;

use super::models::{Author, AuthorRequest};

/// Persistence operations for authors
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Every author, ordered by id
    async fn find_all(&self) -> anyhow::Result<Vec<Author>>;

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Author>>;

    async fn create(&self, author: &AuthorRequest) -> anyhow::Result<Author>;

    /// Overwrites name and bio; `None` when no author has this id
    async fn update(&self, id: i64, author: &AuthorRequest) -> anyhow::Result<Option<Author>>;

    /// Removes the author and, through the foreign key, all of its books.
    /// Returns `false` when no author has this id.
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct SqliteAuthorRepository {
    pool: SqlitePool,
}

impl SqliteAuthorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorRepository for SqliteAuthorRepository {
    async fn find_all(&self) -> anyhow::Result<Vec<Author>> {
        sqlx::query_as::<_, Author>("SELECT id, name, bio FROM authors ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("failed to list authors")
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Author>> {
        sqlx::query_as::<_, Author>("SELECT id, name, bio FROM authors WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to load author {id}"))
    }

    async fn create(&self, author: &AuthorRequest) -> anyhow::Result<Author> {
        sqlx::query_as::<_, Author>(
            "INSERT INTO authors (name, bio) VALUES (?, ?) RETURNING id, name, bio",
        )
        .bind(&author.name)
        .bind(&author.bio)
        .fetch_one(&self.pool)
        .await
        .context("failed to insert author")
    }

    async fn update(&self, id: i64, author: &AuthorRequest) -> anyhow::Result<Option<Author>> {
        sqlx::query_as::<_, Author>(
            "UPDATE authors SET name = ?, bio = ? WHERE id = ? RETURNING id, name, bio",
        )
        .bind(&author.name)
        .bind(&author.bio)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to update author {id}"))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM authors WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete author {id}"))?;

        Ok(result.rows_affected() > 0)
    }
}
