use chrono::NaiveDate;
use garde::Validate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use bookstore_db::page::empty_string_as_none;
use bookstore_http::validation::not_blank;

use crate::modules::authors::models::Author;

/// A book with its author embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Store-assigned identifier
    pub id: i64,
    #[schema(example = "War and Peace")]
    pub title: String,
    /// Not validated
    pub isbn: Option<String>,
    pub published_date: Option<NaiveDate>,
    pub author: Author,
}

/// Flat row produced by the books/authors join.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct BookRow {
    pub id: i64,
    pub title: String,
    pub isbn: Option<String>,
    pub published_date: Option<NaiveDate>,
    pub author_id: i64,
    pub author_name: String,
    pub author_bio: Option<String>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            isbn: row.isbn,
            published_date: row.published_date,
            author: Author {
                id: row.author_id,
                name: row.author_name,
                bio: row.author_bio,
            },
        }
    }
}

/// Reference to an existing author; other author fields are ignored.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AuthorRef {
    pub id: Option<i64>,
}

/// Request body for creating or replacing a book.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    #[garde(custom(not_blank))]
    #[serde(default)]
    #[schema(example = "War and Peace")]
    pub title: String,
    #[garde(skip)]
    pub isbn: Option<String>,
    #[garde(skip)]
    pub published_date: Option<NaiveDate>,
    /// Required on create; on update an unknown id leaves the author unchanged
    #[garde(skip)]
    pub author: Option<AuthorRef>,
}

impl BookRequest {
    pub fn author_id(&self) -> Option<i64> {
        self.author.as_ref().and_then(|author| author.id)
    }

    /// Row values with the author already resolved.
    pub fn to_record(&self, author_id: i64) -> BookRecord {
        BookRecord {
            title: self.title.clone(),
            isbn: self.isbn.clone(),
            published_date: self.published_date,
            author_id,
        }
    }
}

/// Column values written on insert and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub title: String,
    pub isbn: Option<String>,
    pub published_date: Option<NaiveDate>,
    pub author_id: i64,
}

/// Filters accepted by `GET /api/books`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookFilter {
    /// Only books by this author; `authorId=` means no author filter
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub author_id: Option<i64>,
    /// Case-insensitive substring of the title
    pub title: Option<String>,
}
