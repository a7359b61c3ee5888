//! Listings repository

use chrono::Utc;
use sqlx::{Pool, Postgres};

use super::{like_pattern, Filters};
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::ListingStatus,
        listing::{CreateListing, Listing, ListingQuery, UpdateListing},
    },
};

#[derive(Clone)]
pub struct ListingsRepository {
    pool: Pool<Postgres>,
}

impl ListingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Search listings with optional filters and pagination
    pub async fn list(&self, query: &ListingQuery, limit: i64, offset: i64) -> AppResult<(Vec<Listing>, i64)> {
        let keyword = query
            .keyword
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .map(like_pattern);
        let location = query
            .location
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .map(like_pattern);

        let mut filters = Filters::new();
        if keyword.is_some() {
            filters.push("(title ILIKE {} OR description ILIKE {})");
        }
        if query.listing_type.is_some() {
            filters.push("listing_type = {}");
        }
        if query.category.is_some() {
            filters.push("category = {}");
        }
        if query.min_price.is_some() {
            filters.push("price >= {}");
        }
        if query.max_price.is_some() {
            filters.push("price <= {}");
        }
        if location.is_some() {
            filters.push("location ILIKE {}");
        }
        if query.status.is_some() {
            filters.push("status = {}");
        }
        if query.owner_id.is_some() {
            filters.push("owner_id = {}");
        }
        let where_clause = filters.where_clause();

        // Binds must follow the order conditions were pushed
        macro_rules! bind_filters {
            ($builder:expr) => {{
                let mut b = $builder;
                if let Some(ref k) = keyword { b = b.bind(k).bind(k); }
                if let Some(t) = query.listing_type { b = b.bind(t); }
                if let Some(c) = query.category { b = b.bind(c); }
                if let Some(p) = query.min_price { b = b.bind(p); }
                if let Some(p) = query.max_price { b = b.bind(p); }
                if let Some(ref l) = location { b = b.bind(l); }
                if let Some(s) = query.status { b = b.bind(s); }
                if let Some(o) = query.owner_id { b = b.bind(o); }
                b
            }};
        }

        let count_q = format!("SELECT COUNT(*) FROM listings {}", where_clause);
        let total = bind_filters!(sqlx::query_scalar::<_, i64>(&count_q))
            .fetch_one(&self.pool)
            .await?;

        let select_q = format!(
            "SELECT * FROM listings {} ORDER BY {} LIMIT {} OFFSET {}",
            where_clause,
            query.sort.unwrap_or_default().order_by(),
            limit,
            offset
        );
        let rows = bind_filters!(sqlx::query_as::<_, Listing>(&select_q))
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// All listings of an owner, newest first
    pub async fn list_by_owner(&self, owner_id: i32) -> AppResult<Vec<Listing>> {
        let rows = sqlx::query_as::<_, Listing>(
            "SELECT * FROM listings WHERE owner_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get listing by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Listing> {
        sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Listing {} not found", id)))
    }

    /// Create a listing, initially available
    pub async fn create(&self, owner_id: i32, data: &CreateListing) -> AppResult<Listing> {
        let row = sqlx::query_as::<_, Listing>(
            r#"
            INSERT INTO listings (
                title, description, price, listing_type, category, image_path,
                location, status, availability_start, availability_end, owner_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.price)
        .bind(data.listing_type)
        .bind(data.category)
        .bind(&data.image_path)
        .bind(&data.location)
        .bind(ListingStatus::Available)
        .bind(data.availability_start)
        .bind(data.availability_end)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update listing fields while the listing is still available or withdrawn.
    ///
    /// Returns `None` when the row is gone or a reservation took it meanwhile.
    pub async fn update(&self, id: i32, data: &UpdateListing) -> AppResult<Option<Listing>> {
        let now = Utc::now();
        let mut sets = vec!["updated_at = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.title, "title");
        add_field!(data.description, "description");
        add_field!(data.price, "price");
        add_field!(data.category, "category");
        add_field!(data.image_path, "image_path");
        add_field!(data.location, "location");
        add_field!(data.availability_start, "availability_start");
        add_field!(data.availability_end, "availability_end");

        let query = format!(
            "UPDATE listings SET {} WHERE id = ${} AND status IN ('AVAILABLE', 'UNAVAILABLE') RETURNING *",
            sets.join(", "),
            idx
        );

        let title = data.title.as_ref().map(|s| s.trim().to_string());
        let description = data.description.as_ref().map(|s| s.trim().to_string());
        let location = data.location.as_ref().map(|s| s.trim().to_string());
        // Blank clears the image
        let image_path = data
            .image_path
            .as_ref()
            .map(|p| Some(p.trim().to_string()).filter(|p| !p.is_empty()));

        let mut builder = sqlx::query_as::<_, Listing>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(title);
        bind_field!(description);
        bind_field!(data.price);
        bind_field!(data.category);
        bind_field!(image_path);
        bind_field!(location);
        bind_field!(data.availability_start);
        bind_field!(data.availability_end);

        let row = builder.bind(id).fetch_optional(&self.pool).await?;
        Ok(row)
    }

    /// Move a listing from `from` to `to`; returns false if it was not in `from`
    pub async fn set_status(&self, id: i32, from: ListingStatus, to: ListingStatus) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE listings SET status = $1, updated_at = $2 WHERE id = $3 AND status = $4",
        )
        .bind(to)
        .bind(Utc::now())
        .bind(id)
        .bind(from)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an available or withdrawn listing (cascade deletes its past
    /// reservations); returns false if it is gone or no longer free
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM listings WHERE id = $1 AND status IN ('AVAILABLE', 'UNAVAILABLE')",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
