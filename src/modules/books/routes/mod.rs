use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use utoipa::OpenApi;

use bookstore_db::{Page, Pageable};
use bookstore_http::{AppError, QueryParams, ValidatedJson};

use super::models::{AuthorRef, Book, BookFilter, BookRequest};
use super::repository::{BookQuery, BookRepository, ID_COLUMN, SORT_COLUMNS};
use crate::modules::authors::models::Author;
use crate::modules::authors::repository::AuthorRepository;

/// Shared state for book handlers; authors are needed to resolve references
#[derive(Clone)]
pub struct BooksState {
    pub books: Arc<dyn BookRepository>,
    pub authors: Arc<dyn AuthorRepository>,
}

#[derive(OpenApi)]
#[openapi(
    paths(list_books, get_book, create_book, update_book, delete_book),
    components(schemas(Book, BookRequest, AuthorRef, Author)),
    tags((name = "Books", description = "Book management"))
)]
pub struct BooksApi;

pub fn router(state: BooksState) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .with_state(state)
}

/// List books, optionally filtered by author and title
#[utoipa::path(
    get,
    path = "/",
    tag = "Books",
    params(BookFilter, Pageable),
    responses(
        (status = 200, description = "One page of books", body = Page<Book>),
        (status = 400, description = "Invalid query parameter or sort expression")
    )
)]
pub async fn list_books(
    State(state): State<BooksState>,
    QueryParams(filter): QueryParams<BookFilter>,
    QueryParams(pageable): QueryParams<Pageable>,
) -> Result<Json<Page<Book>>, AppError> {
    let page = pageable
        .resolve(SORT_COLUMNS, ID_COLUMN)
        .map_err(|e| AppError::bad_request(e.to_string()))?;
    let query = BookQuery::new(filter.author_id, filter.title);

    tracing::debug!(
        filtered = !query.is_unfiltered(),
        author_id = ?query.author_id,
        title = ?query.title,
        page = page.page,
        size = page.size,
        "listing books"
    );

    Ok(Json(state.books.search(&query, &page).await?))
}

/// Get book by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Books",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book found", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<BooksState>,
    Path(id): Path<i64>,
) -> Result<Json<Book>, AppError> {
    state
        .books
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("book {id}")))
}

/// Create a book for an existing author
#[utoipa::path(
    post,
    path = "/",
    tag = "Books",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book created", body = Book,
            headers(("Location" = String, description = "URL of the new book"))),
        (status = 400, description = "Invalid input or author not found")
    )
)]
pub async fn create_book(
    State(state): State<BooksState>,
    ValidatedJson(request): ValidatedJson<BookRequest>,
) -> Result<impl IntoResponse, AppError> {
    let author_id = request.author_id().ok_or_else(|| {
        AppError::invalid_field("author.id", "required", "author.id is required")
    })?;

    if state.authors.find_by_id(author_id).await?.is_none() {
        return Err(AppError::invalid_field(
            "author.id",
            "not_found",
            "Author not found",
        ));
    }

    let book = state.books.create(&request.to_record(author_id)).await?;
    tracing::info!(book_id = book.id, author_id, "book created");

    let location = format!("/api/books/{}", book.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(book)))
}

/// Replace title, isbn and published date; switch author only when the new one exists
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Books",
    params(("id" = i64, Path, description = "Book id")),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<BooksState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<BookRequest>,
) -> Result<Json<Book>, AppError> {
    let existing = state
        .books
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("book {id}")))?;

    // An unknown author id is ignored rather than rejected.
    let author_id = match request.author_id() {
        Some(requested) => match state.authors.find_by_id(requested).await? {
            Some(author) => author.id,
            None => {
                tracing::debug!(book_id = id, requested, "ignoring unknown author on update");
                existing.author.id
            }
        },
        None => existing.author.id,
    };

    let book = state
        .books
        .update(id, &request.to_record(author_id))
        .await?
        .ok_or_else(|| AppError::not_found(format!("book {id}")))?;

    tracing::info!(book_id = id, author_id, "book updated");
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Books",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<BooksState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.books.delete(id).await? {
        return Err(AppError::not_found(format!("book {id}")));
    }

    tracing::info!(book_id = id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}
