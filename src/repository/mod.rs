//! Repository layer for database operations

pub mod contracts;
pub mod equipment;
pub mod listings;
pub mod reservations;

use sqlx::{Pool, Postgres};

use crate::error::AppResult;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub listings: listings::ListingsRepository,
    pub reservations: reservations::ReservationsRepository,
    pub equipment: equipment::EquipmentRepository,
    pub contracts: contracts::ContractsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            listings: listings::ListingsRepository::new(pool.clone()),
            reservations: reservations::ReservationsRepository::new(pool.clone()),
            equipment: equipment::EquipmentRepository::new(pool.clone()),
            contracts: contracts::ContractsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Check database connectivity
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Positional WHERE clause assembled from optional filters
#[derive(Debug)]
pub(crate) struct Filters {
    conditions: Vec<String>,
    next: usize,
}

impl Filters {
    pub(crate) fn new() -> Self {
        Self { conditions: Vec::new(), next: 1 }
    }

    /// Add a condition; every `{}` in `template` becomes the next placeholder
    pub(crate) fn push(&mut self, template: &str) {
        let mut out = String::with_capacity(template.len() + 4);
        let mut parts = template.split("{}").peekable();
        while let Some(part) = parts.next() {
            out.push_str(part);
            if parts.peek().is_some() {
                out.push_str(&format!("${}", self.next));
                self.next += 1;
            }
        }
        self.conditions.push(out);
    }

    pub(crate) fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }
}

/// Escape LIKE wildcards and wrap the term for a substring match
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
