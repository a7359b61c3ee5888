//! Reservations repository
//!
//! Every operation touching both a reservation and its listing runs in a
//! single transaction, and listing moves are conditional on the status the
//! listing is expected to be in.

use chrono::Utc;
use sqlx::{Pool, Postgres, Transaction};

use super::Filters;
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{ListingStatus, ListingType, ReservationStatus},
        reservation::{NewReservation, Reservation, ReservationQuery},
    },
};

#[derive(Clone)]
pub struct ReservationsRepository {
    pool: Pool<Postgres>,
}

impl ReservationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List reservations with optional filters and pagination
    pub async fn list(&self, query: &ReservationQuery, limit: i64, offset: i64) -> AppResult<(Vec<Reservation>, i64)> {
        let mut filters = Filters::new();
        if query.listing_id.is_some() {
            filters.push("listing_id = {}");
        }
        if query.renter_id.is_some() {
            filters.push("renter_id = {}");
        }
        if query.status.is_some() {
            filters.push("status = {}");
        }
        let where_clause = filters.where_clause();

        macro_rules! bind_filters {
            ($builder:expr) => {{
                let mut b = $builder;
                if let Some(l) = query.listing_id { b = b.bind(l); }
                if let Some(r) = query.renter_id { b = b.bind(r); }
                if let Some(s) = query.status { b = b.bind(s); }
                b
            }};
        }

        let count_q = format!("SELECT COUNT(*) FROM reservations {}", where_clause);
        let total = bind_filters!(sqlx::query_scalar::<_, i64>(&count_q))
            .fetch_one(&self.pool)
            .await?;

        let select_q = format!(
            "SELECT * FROM reservations {} ORDER BY created_at DESC, id DESC LIMIT {} OFFSET {}",
            where_clause, limit, offset
        );
        let rows = bind_filters!(sqlx::query_as::<_, Reservation>(&select_q))
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// Reservations made on listings owned by `owner_id`
    pub async fn list_received(
        &self,
        owner_id: i32,
        query: &ReservationQuery,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Reservation>, i64)> {
        let mut filters = Filters::new();
        filters.push("l.owner_id = {}");
        if query.listing_id.is_some() {
            filters.push("r.listing_id = {}");
        }
        if query.renter_id.is_some() {
            filters.push("r.renter_id = {}");
        }
        if query.status.is_some() {
            filters.push("r.status = {}");
        }
        let where_clause = filters.where_clause();

        macro_rules! bind_filters {
            ($builder:expr) => {{
                let mut b = $builder.bind(owner_id);
                if let Some(l) = query.listing_id { b = b.bind(l); }
                if let Some(r) = query.renter_id { b = b.bind(r); }
                if let Some(s) = query.status { b = b.bind(s); }
                b
            }};
        }

        let count_q = format!(
            "SELECT COUNT(*) FROM reservations r JOIN listings l ON l.id = r.listing_id {}",
            where_clause
        );
        let total = bind_filters!(sqlx::query_scalar::<_, i64>(&count_q))
            .fetch_one(&self.pool)
            .await?;

        let select_q = format!(
            r#"
            SELECT r.* FROM reservations r
            JOIN listings l ON l.id = r.listing_id
            {}
            ORDER BY r.created_at DESC, r.id DESC
            LIMIT {} OFFSET {}
            "#,
            where_clause, limit, offset
        );
        let rows = bind_filters!(sqlx::query_as::<_, Reservation>(&select_q))
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// Get reservation by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", id)))
    }

    /// Reserve an available listing.
    ///
    /// The listing moves `Available -> Reserved`; if another renter got there
    /// first no row matches and the whole operation is refused. With
    /// `auto_confirm` the reservation is confirmed in the same transaction.
    pub async fn create(&self, data: &NewReservation, auto_confirm: bool) -> AppResult<Reservation> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let listing_type = sqlx::query_scalar::<_, ListingType>(
            r#"
            UPDATE listings SET status = $1, updated_at = $2
            WHERE id = $3 AND status = $4
            RETURNING listing_type
            "#,
        )
        .bind(ListingStatus::Reserved)
        .bind(now)
        .bind(data.listing_id)
        .bind(ListingStatus::Available)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::Conflict(format!("Listing {} is no longer available", data.listing_id)))?;

        let status = if auto_confirm {
            ReservationStatus::Confirmed
        } else {
            ReservationStatus::Pending
        };

        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (listing_id, renter_id, start_date, end_date, total_price, status, comment)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(data.listing_id)
        .bind(data.renter_id)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.total_price)
        .bind(status)
        .bind(&data.comment)
        .fetch_one(&mut *tx)
        .await?;

        if auto_confirm {
            settle_listing(&mut tx, data.listing_id, ListingStatus::Reserved, ListingStatus::settled_for(listing_type)).await?;
        }

        tx.commit().await?;
        Ok(reservation)
    }

    /// Confirm a pending reservation; the listing becomes rented or sold
    pub async fn confirm(&self, id: i32, listing_id: i32, listing_type: ListingType) -> AppResult<Reservation> {
        let mut tx = self.pool.begin().await?;
        let reservation = move_reservation(&mut tx, id, ReservationStatus::Pending, ReservationStatus::Confirmed).await?;
        settle_listing(&mut tx, listing_id, ListingStatus::Reserved, ListingStatus::settled_for(listing_type)).await?;
        tx.commit().await?;
        Ok(reservation)
    }

    /// Cancel a reservation and release the listing it holds
    pub async fn cancel(&self, id: i32, listing_id: i32, from: ReservationStatus) -> AppResult<Reservation> {
        let mut tx = self.pool.begin().await?;
        let reservation = move_reservation(&mut tx, id, from, ReservationStatus::Cancelled).await?;

        let released = sqlx::query(
            r#"
            UPDATE listings SET status = 'AVAILABLE', updated_at = $1
            WHERE id = $2 AND status IN ('RESERVED', 'RENTED')
            "#,
        )
        .bind(Utc::now())
        .bind(listing_id)
        .execute(&mut *tx)
        .await?;
        if released.rows_affected() == 0 {
            tracing::warn!("Listing {} was not held when reservation {} was cancelled", listing_id, id);
        }

        tx.commit().await?;
        Ok(reservation)
    }

    /// Complete a confirmed reservation; a rented listing becomes available again
    pub async fn complete(&self, id: i32, listing_id: i32, listing_type: ListingType) -> AppResult<Reservation> {
        let mut tx = self.pool.begin().await?;
        let reservation = move_reservation(&mut tx, id, ReservationStatus::Confirmed, ReservationStatus::Completed).await?;
        if listing_type == ListingType::Rental {
            settle_listing(&mut tx, listing_id, ListingStatus::Rented, ListingStatus::Available).await?;
        }
        tx.commit().await?;
        Ok(reservation)
    }

    /// Delete a reservation
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Reservation {} not found", id)));
        }
        Ok(())
    }
}

async fn move_reservation(
    tx: &mut Transaction<'_, Postgres>,
    id: i32,
    from: ReservationStatus,
    to: ReservationStatus,
) -> AppResult<Reservation> {
    sqlx::query_as::<_, Reservation>(
        r#"
        UPDATE reservations SET status = $1, updated_at = $2
        WHERE id = $3 AND status = $4
        RETURNING *
        "#,
    )
    .bind(to)
    .bind(Utc::now())
    .bind(id)
    .bind(from)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| {
        AppError::Conflict(format!("Reservation {} is no longer {}", id, from.label().to_lowercase()))
    })
}

async fn settle_listing(
    tx: &mut Transaction<'_, Postgres>,
    listing_id: i32,
    from: ListingStatus,
    to: ListingStatus,
) -> AppResult<()> {
    let result = sqlx::query("UPDATE listings SET status = $1, updated_at = $2 WHERE id = $3 AND status = $4")
        .bind(to)
        .bind(Utc::now())
        .bind(listing_id)
        .bind(from)
        .execute(&mut **tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::Conflict(format!(
            "Listing {} is not {}",
            listing_id,
            from.label().to_lowercase()
        )));
    }
    Ok(())
}
