//! Rental contracts repository

use chrono::Utc;
use sqlx::{Pool, Postgres, Transaction};

use super::Filters;
use crate::{
    error::{AppError, AppResult},
    models::{
        contract::{ContractQuery, NewContract, RentalContract},
        enums::ContractStatus,
    },
};

#[derive(Clone)]
pub struct ContractsRepository {
    pool: Pool<Postgres>,
}

impl ContractsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List contracts with optional filters and pagination
    pub async fn list(&self, query: &ContractQuery, limit: i64, offset: i64) -> AppResult<(Vec<RentalContract>, i64)> {
        let mut filters = Filters::new();
        if query.equipment_id.is_some() {
            filters.push("equipment_id = {}");
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
                if let Some(e) = query.equipment_id { b = b.bind(e); }
                if let Some(r) = query.renter_id { b = b.bind(r); }
                if let Some(s) = query.status { b = b.bind(s); }
                b
            }};
        }

        let count_q = format!("SELECT COUNT(*) FROM rental_contracts {}", where_clause);
        let total = bind_filters!(sqlx::query_scalar::<_, i64>(&count_q))
            .fetch_one(&self.pool)
            .await?;

        let select_q = format!(
            "SELECT * FROM rental_contracts {} ORDER BY start_date DESC, id DESC LIMIT {} OFFSET {}",
            where_clause, limit, offset
        );
        let rows = bind_filters!(sqlx::query_as::<_, RentalContract>(&select_q))
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// Get contract by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<RentalContract> {
        sqlx::query_as::<_, RentalContract>("SELECT * FROM rental_contracts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Contract {} not found", id)))
    }

    /// Take the equipment off the catalogue and record a pending contract
    pub async fn create(&self, data: &NewContract) -> AppResult<RentalContract> {
        let mut tx = self.pool.begin().await?;

        let taken = sqlx::query(
            "UPDATE equipment SET available = FALSE, updated_at = $1 WHERE id = $2 AND available = TRUE",
        )
        .bind(Utc::now())
        .bind(data.equipment_id)
        .execute(&mut *tx)
        .await?;
        if taken.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "Equipment {} is no longer available",
                data.equipment_id
            )));
        }

        let contract = sqlx::query_as::<_, RentalContract>(
            r#"
            INSERT INTO rental_contracts (equipment_id, renter_id, start_date, end_date, total_price, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(data.equipment_id)
        .bind(data.renter_id)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.total_price)
        .bind(ContractStatus::Pending)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(contract)
    }

    /// Pending -> Active
    pub async fn activate(&self, id: i32) -> AppResult<RentalContract> {
        let mut tx = self.pool.begin().await?;
        let contract = move_contract(&mut tx, id, ContractStatus::Pending, ContractStatus::Active).await?;
        tx.commit().await?;
        Ok(contract)
    }

    /// Active -> Completed, equipment returns to the catalogue
    pub async fn complete(&self, id: i32) -> AppResult<RentalContract> {
        self.close(id, ContractStatus::Active, ContractStatus::Completed).await
    }

    /// Pending|Active -> Cancelled, equipment returns to the catalogue
    pub async fn cancel(&self, id: i32, from: ContractStatus) -> AppResult<RentalContract> {
        self.close(id, from, ContractStatus::Cancelled).await
    }

    async fn close(&self, id: i32, from: ContractStatus, to: ContractStatus) -> AppResult<RentalContract> {
        let mut tx = self.pool.begin().await?;
        let contract = move_contract(&mut tx, id, from, to).await?;

        sqlx::query("UPDATE equipment SET available = TRUE, updated_at = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(contract.equipment_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(contract)
    }

    /// Delete a contract
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM rental_contracts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Contract {} not found", id)));
        }
        Ok(())
    }
}

async fn move_contract(
    tx: &mut Transaction<'_, Postgres>,
    id: i32,
    from: ContractStatus,
    to: ContractStatus,
) -> AppResult<RentalContract> {
    sqlx::query_as::<_, RentalContract>(
        r#"
        UPDATE rental_contracts SET status = $1, updated_at = $2
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
    .ok_or_else(|| AppError::Conflict(format!("Contract {} is no longer {}", id, from.label().to_lowercase())))
}
