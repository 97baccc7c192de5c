pub mod models;
pub mod repository;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{InitCtx, Migration, Module};
use utoipa::OpenApi;

use crate::modules::authors::repository::AuthorRepository;
use repository::BookRepository;
use routes::BooksState;

/// Book resource: CRUD over `books`, filtered and paged listing
pub struct BooksModule {
    state: BooksState,
}

impl BooksModule {
    pub fn new(books: Arc<dyn BookRepository>, authors: Arc<dyn AuthorRepository>) -> Self {
        Self {
            state: BooksState { books, authors },
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        serde_json::to_value(routes::BooksApi::openapi()).ok()
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id             INTEGER PRIMARY KEY AUTOINCREMENT,
                    title          TEXT NOT NULL CHECK (trim(title) <> ''),
                    -- Unicode-lowercased title, written by the application
                    title_folded   TEXT NOT NULL,
                    isbn           TEXT,
                    published_date TEXT,
                    author_id      INTEGER NOT NULL REFERENCES authors(id) ON DELETE CASCADE
                );
                CREATE INDEX IF NOT EXISTS books_author_id_idx ON books(author_id);
                "#,
        }]
    }
}

/// Create a new instance of the books module
pub fn create_module(
    books: Arc<dyn BookRepository>,
    authors: Arc<dyn AuthorRepository>,
) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(books, authors))
}
