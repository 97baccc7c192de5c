pub mod authors;
pub mod books;

use std::sync::Arc;

use bookstore_db::SqlitePool;
use bookstore_kernel::ModuleRegistry;

use authors::repository::{AuthorRepository, SqliteAuthorRepository};
use books::repository::{BookRepository, SqliteBookRepository};

/// Register the database core module and every resource module
pub fn register_all(registry: &mut ModuleRegistry, pool: SqlitePool) {
    let authors: Arc<dyn AuthorRepository> = Arc::new(SqliteAuthorRepository::new(pool.clone()));
    let books: Arc<dyn BookRepository> = Arc::new(SqliteBookRepository::new(pool.clone()));

    registry.register_core(bookstore_db::create_module(pool));
    registry.register_custom(authors::create_module(authors.clone()));
    registry.register_custom(books::create_module(books, authors));
}
