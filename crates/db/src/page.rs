//! Page/size/sort request parameters and the paged response envelope.

use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 2000;

/// Pagination parameters, extractable from query params.
///
/// Empty values (`?page=&size=`) count as absent. Repeated `sort` parameters
/// are applied in order.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pageable {
    /// Zero-based page index; negative values select the first page
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<i64>,
    /// Page size; absent or below 1 selects the default (20), values above 2000 are capped
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub size: Option<i64>,
    /// Sort expression `property[,property...][,asc|desc]`, may be repeated
    #[serde(default)]
    pub sort: Vec<String>,
}

/// Deserialize an optional query value, treating `key=` like a missing key.
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(de::Error::custom),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// One `property direction` pair of a sort expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub property: String,
    pub direction: Direction,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SortError {
    #[error("sort expression '{0}' names no property")]
    MissingProperty(String),

    #[error("unknown sort property '{0}'")]
    UnknownProperty(String),
}

/// Parse `title,isbn,desc` into orders sharing the trailing direction.
pub fn parse_sort(expr: &str) -> Result<Vec<Order>, SortError> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Ok(Vec::new());
    }

    let mut parts: Vec<&str> = expr.split(',').map(str::trim).collect();
    let direction = match parts.last().map(|last| last.to_ascii_lowercase()) {
        Some(last) if last == "asc" => {
            parts.pop();
            Direction::Asc
        }
        Some(last) if last == "desc" => {
            parts.pop();
            Direction::Desc
        }
        _ => Direction::Asc,
    };

    if parts.is_empty() || parts.iter().any(|part| part.is_empty()) {
        return Err(SortError::MissingProperty(expr.to_string()));
    }

    Ok(parts
        .into_iter()
        .map(|property| Order {
            property: property.to_string(),
            direction,
        })
        .collect())
}

impl Pageable {
    /// Validate the request against a whitelist of `(property, column)` pairs.
    ///
    /// `id_column` is appended as the final ordering key unless already present,
    /// so page boundaries are stable.
    pub fn resolve(
        &self,
        columns: &[(&str, &'static str)],
        id_column: &'static str,
    ) -> Result<PageRequest, SortError> {
        let mut orders = Vec::new();
        for expr in &self.sort {
            orders.extend(parse_sort(expr)?);
        }

        let mut clauses = Vec::with_capacity(orders.len() + 1);
        let mut has_id = false;
        for order in &orders {
            let column = columns
                .iter()
                .find(|(property, _)| *property == order.property)
                .map(|(_, column)| *column)
                .ok_or_else(|| SortError::UnknownProperty(order.property.clone()))?;
            has_id |= column == id_column;
            clauses.push(format!("{} {}", column, order.direction.as_sql()));
        }
        if !has_id {
            clauses.push(format!("{} ASC", id_column));
        }

        let page = self.page.map_or(0, |page| page.max(0) as u64);
        let size = match self.size {
            Some(size) if size >= 1 => (size as u64).min(MAX_PAGE_SIZE),
            _ => DEFAULT_PAGE_SIZE,
        };

        Ok(PageRequest {
            page,
            size,
            order_by: clauses.join(", "),
        })
    }
}

/// A validated page request, ready to be turned into `ORDER BY/LIMIT/OFFSET`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    /// Comma-separated `column DIR` list built only from whitelisted columns
    pub order_by: String,
}

impl PageRequest {
    pub fn limit(&self) -> i64 {
        i64::try_from(self.size).unwrap_or(i64::MAX)
    }

    pub fn offset(&self) -> i64 {
        i64::try_from(self.page.saturating_mul(self.size)).unwrap_or(i64::MAX)
    }
}

/// A page of results with pagination metadata.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    /// Zero-based index of this page
    pub number: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number_of_elements: u64,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let total_pages = if request.size == 0 {
            0
        } else {
            total_elements.div_ceil(request.size)
        };
        Self {
            number_of_elements: content.len() as u64,
            empty: content.is_empty(),
            first: request.page == 0,
            last: request.page.saturating_add(1) >= total_pages,
            content,
            number: request.page,
            size: request.size,
            total_elements,
            total_pages,
        }
    }
}
