use garde::Validate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use bookstore_http::validation::not_blank;

/// An author as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Author {
    /// Store-assigned identifier
    pub id: i64,
    /// Display name, never blank
    #[schema(example = "Leo Tolstoy")]
    pub name: String,
    /// Free-form biography
    pub bio: Option<String>,
}

/// Request body for creating or replacing an author.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct AuthorRequest {
    /// Display name, required and not blank
    #[garde(custom(not_blank))]
    #[serde(default)]
    #[schema(example = "Leo Tolstoy")]
    pub name: String,
    /// Free-form biography
    #[garde(skip)]
    pub bio: Option<String>,
}
