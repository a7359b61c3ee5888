//! Paginated list responses

use serde::Serialize;
use utoipa::ToSchema;

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
pub struct Paginated<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub items: Vec<T>,
    /// Total number of matching rows
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Items per page
    pub per_page: i64,
}

impl<T> Paginated<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Wrap one page of rows fetched with `limit`/`offset`
    pub fn new(items: Vec<T>, total: i64, limit: i64, offset: i64) -> Self {
        Self {
            items,
            total,
            page: offset / limit.max(1) + 1,
            per_page: limit,
        }
    }
}
