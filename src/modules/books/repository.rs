use anyhow::{anyhow, Context};
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use bookstore_db::{Page, PageRequest};

use super::models::{Book, BookRecord, BookRow};

const SELECT_BOOKS: &str = "SELECT b.id, b.title, b.isbn, b.published_date, \
     a.id AS author_id, a.name AS author_name, a.bio AS author_bio \
     FROM books b JOIN authors a ON a.id = b.author_id";

/// Sortable properties and the columns they map to.
pub const SORT_COLUMNS: &[(&str, &str)] = &[
    ("id", "b.id"),
    ("title", "b.title"),
    ("isbn", "b.isbn"),
    ("publishedDate", "b.published_date"),
    ("authorId", "b.author_id"),
    ("author.id", "b.author_id"),
];

pub const ID_COLUMN: &str = "b.id";

/// The book list filter. Absent parts match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookQuery {
    pub author_id: Option<i64>,
    pub title: Option<String>,
}

impl BookQuery {
    /// A blank title is no filter at all, not a filter on the empty string.
    pub fn new(author_id: Option<i64>, title: Option<String>) -> Self {
        Self {
            author_id,
            title: title.filter(|title| !title.trim().is_empty()),
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.author_id.is_none() && self.title.is_none()
    }

    fn push_filters(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        let mut separator = " WHERE ";

        if let Some(author_id) = self.author_id {
            builder
                .push(separator)
                .push("b.author_id = ")
                .push_bind(author_id);
            separator = " AND ";
        }

        if let Some(title) = &self.title {
            builder
                .push(separator)
                .push("b.title_folded LIKE ")
                .push_bind(contains_pattern(&fold_case(title)))
                .push(" ESCAPE '\\'");
        }
    }
}

/// Unicode lowercase used for `title_folded`; SQLite's `lower()` only folds ASCII.
pub(crate) fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// `%needle%` with LIKE wildcards in the needle escaped.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Persistence operations for books
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// One page of books matching `query`, authors embedded
    async fn search(&self, query: &BookQuery, page: &PageRequest) -> anyhow::Result<Page<Book>>;

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Book>>;

    /// `record.author_id` must reference an existing author
    async fn create(&self, record: &BookRecord) -> anyhow::Result<Book>;

    /// Overwrites every column; `None` when no book has this id
    async fn update(&self, id: i64, record: &BookRecord) -> anyhow::Result<Option<Book>>;

    /// Returns `false` when no book has this id
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct SqliteBookRepository {
    pool: SqlitePool,
}

impl SqliteBookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for SqliteBookRepository {
    async fn search(&self, query: &BookQuery, page: &PageRequest) -> anyhow::Result<Page<Book>> {
        let mut count: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM books b");
        query.push_filters(&mut count);
        let (total,) = count
            .build_query_as::<(i64,)>()
            .fetch_one(&self.pool)
            .await
            .context("failed to count books")?;

        let mut select: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_BOOKS);
        query.push_filters(&mut select);
        select
            .push(" ORDER BY ")
            .push(&page.order_by)
            .push(" LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = select
            .build_query_as::<BookRow>()
            .fetch_all(&self.pool)
            .await
            .context("failed to list books")?;

        let content = rows.into_iter().map(Book::from).collect();
        Ok(Page::new(content, page, total.max(0) as u64))
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Book>> {
        let row: Option<BookRow> = sqlx::query_as(&format!("{SELECT_BOOKS} WHERE b.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to load book {id}"))?;

        Ok(row.map(Book::from))
    }

    async fn create(&self, record: &BookRecord) -> anyhow::Result<Book> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO books (title, title_folded, isbn, published_date, author_id) \
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&record.title)
        .bind(fold_case(&record.title))
        .bind(&record.isbn)
        .bind(record.published_date)
        .bind(record.author_id)
        .fetch_one(&self.pool)
        .await
        .context("failed to insert book")?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| anyhow!("book {id} missing right after insert"))
    }

    async fn update(&self, id: i64, record: &BookRecord) -> anyhow::Result<Option<Book>> {
        let result = sqlx::query(
            "UPDATE books SET title = ?, title_folded = ?, isbn = ?, published_date = ?, \
             author_id = ? WHERE id = ?",
        )
        .bind(&record.title)
        .bind(fold_case(&record.title))
        .bind(&record.isbn)
        .bind(record.published_date)
        .bind(record.author_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to update book {id}"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete book {id}"))?;

        Ok(result.rows_affected() > 0)
    }
}
