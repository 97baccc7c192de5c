use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use utoipa::OpenApi;

use bookstore_http::{AppError, ValidatedJson};

use super::models::{Author, AuthorRequest};
use super::repository::AuthorRepository;

/// Shared state for author handlers
#[derive(Clone)]
pub struct AuthorsState {
    pub authors: Arc<dyn AuthorRepository>,
}

#[derive(OpenApi)]
#[openapi(
    paths(list_authors, get_author, create_author, update_author, delete_author),
    components(schemas(Author, AuthorRequest)),
    tags((name = "Authors", description = "Author management"))
)]
pub struct AuthorsApi;

pub fn router(state: AuthorsState) -> Router {
    Router::new()
        .route("/", get(list_authors).post(create_author))
        .route(
            "/{id}",
            get(get_author).put(update_author).delete(delete_author),
        )
        .with_state(state)
}

/// List all authors
#[utoipa::path(
    get,
    path = "/",
    tag = "Authors",
    responses((status = 200, description = "All authors", body = [Author]))
)]
pub async fn list_authors(State(state): State<AuthorsState>) -> Result<Json<Vec<Author>>, AppError> {
    Ok(Json(state.authors.find_all().await?))
}

/// Get author by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Authors",
    params(("id" = i64, Path, description = "Author id")),
    responses(
        (status = 200, description = "Author found", body = Author),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AuthorsState>,
    Path(id): Path<i64>,
) -> Result<Json<Author>, AppError> {
    state
        .authors
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("author {id}")))
}

/// Create a new author
#[utoipa::path(
    post,
    path = "/",
    tag = "Authors",
    request_body = AuthorRequest,
    responses(
        (status = 201, description = "Author created", body = Author,
            headers(("Location" = String, description = "URL of the new author"))),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_author(
    State(state): State<AuthorsState>,
    ValidatedJson(request): ValidatedJson<AuthorRequest>,
) -> Result<impl IntoResponse, AppError> {
    let author = state.authors.create(&request).await?;
    tracing::info!(author_id = author.id, "author created");

    let location = format!("/api/authors/{}", author.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(author)))
}

/// Replace the name and bio of an existing author
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Authors",
    params(("id" = i64, Path, description = "Author id")),
    request_body = AuthorRequest,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<AuthorsState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<AuthorRequest>,
) -> Result<Json<Author>, AppError> {
    let author = state
        .authors
        .update(id, &request)
        .await?
        .ok_or_else(|| AppError::not_found(format!("author {id}")))?;

    tracing::info!(author_id = id, "author updated");
    Ok(Json(author))
}

/// Delete an author together with all of their books
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Authors",
    params(("id" = i64, Path, description = "Author id")),
    responses(
        (status = 204, description = "Author and their books deleted"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<AuthorsState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.authors.delete(id).await? {
        return Err(AppError::not_found(format!("author {id}")));
    }

    tracing::info!(author_id = id, "author deleted");
    Ok(StatusCode::NO_CONTENT)
}
