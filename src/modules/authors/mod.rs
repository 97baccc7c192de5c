pub mod models;
pub mod repository;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{InitCtx, Migration, Module};
use utoipa::OpenApi;

use repository::AuthorRepository;
use routes::AuthorsState;

/// Author resource: CRUD over `authors`, deletes cascade to books
pub struct AuthorsModule {
    state: AuthorsState,
}

impl AuthorsModule {
    pub fn new(authors: Arc<dyn AuthorRepository>) -> Self {
        Self {
            state: AuthorsState { authors },
        }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        serde_json::to_value(routes::AuthorsApi::openapi()).ok()
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE IF NOT EXISTS authors (
                    id   INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL CHECK (trim(name) <> ''),
                    bio  TEXT
                );
                "#,
        }]
    }
}

/// Create a new instance of the authors module
pub fn create_module(authors: Arc<dyn AuthorRepository>) -> Arc<dyn Module> {
    Arc::new(AuthorsModule::new(authors))
}
