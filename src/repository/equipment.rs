//! Equipment repository

use chrono::Utc;
use sqlx::{Pool, Postgres, Transaction};

use super::Filters;
use crate::{
    error::{AppError, AppResult},
    models::equipment::{CreateEquipment, Equipment, EquipmentQuery, UpdateEquipment},
};

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List equipment with optional filters and pagination
    pub async fn list(&self, query: &EquipmentQuery, limit: i64, offset: i64) -> AppResult<(Vec<Equipment>, i64)> {
        let equipment_type = query
            .equipment_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let mut filters = Filters::new();
        if query.available.is_some() {
            filters.push("available = {}");
        }
        if query.owner_id.is_some() {
            filters.push("owner_id = {}");
        }
        if equipment_type.is_some() {
            filters.push("LOWER(equipment_type) = LOWER({})");
        }
        if query.max_daily_price.is_some() {
            filters.push("daily_price <= {}");
        }
        let where_clause = filters.where_clause();

        macro_rules! bind_filters {
            ($builder:expr) => {{
                let mut b = $builder;
                if let Some(a) = query.available { b = b.bind(a); }
                if let Some(o) = query.owner_id { b = b.bind(o); }
                if let Some(t) = equipment_type { b = b.bind(t); }
                if let Some(p) = query.max_daily_price { b = b.bind(p); }
                b
            }};
        }

        let count_q = format!("SELECT COUNT(*) FROM equipment {}", where_clause);
        let total = bind_filters!(sqlx::query_scalar::<_, i64>(&count_q))
            .fetch_one(&self.pool)
            .await?;

        let select_q = format!(
            "SELECT * FROM equipment {} ORDER BY name, id LIMIT {} OFFSET {}",
            where_clause, limit, offset
        );
        let rows = bind_filters!(sqlx::query_as::<_, Equipment>(&select_q))
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// Get equipment by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Create equipment
    pub async fn create(&self, owner_id: i32, data: &CreateEquipment) -> AppResult<Equipment> {
        let row = sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (name, equipment_type, daily_price, available, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(data.name.trim())
        .bind(data.equipment_type.trim())
        .bind(data.daily_price)
        .bind(data.available.unwrap_or(true))
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update equipment
    pub async fn update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
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

        add_field!(data.name, "name");
        add_field!(data.equipment_type, "equipment_type");
        add_field!(data.daily_price, "daily_price");

        let query = format!("UPDATE equipment SET {} WHERE id = ${} RETURNING *", sets.join(", "), idx);

        let name = data.name.as_ref().map(|s| s.trim().to_string());
        let equipment_type = data.equipment_type.as_ref().map(|s| s.trim().to_string());

        let mut builder = sqlx::query_as::<_, Equipment>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(name);
        bind_field!(equipment_type);
        bind_field!(data.daily_price);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Flip the availability flag unless a pending or active contract holds
    /// the equipment; returns `None` when a contract does
    pub async fn set_availability(&self, id: i32, available: bool) -> AppResult<Option<Equipment>> {
        let mut tx = self.pool.begin().await?;
        if lock_free_equipment(&mut tx, id).await? {
            let equipment = sqlx::query_as::<_, Equipment>(
                "UPDATE equipment SET available = $1, updated_at = $2 WHERE id = $3 RETURNING *",
            )
            .bind(available)
            .bind(Utc::now())
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
            tx.commit().await?;
            return Ok(Some(equipment));
        }
        Ok(None)
    }

    /// Whether a pending or active contract holds this equipment
    pub async fn has_open_contract(&self, id: i32) -> AppResult<bool> {
        let open: bool = sqlx::query_scalar(OPEN_CONTRACT_Q)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(open)
    }

    /// Delete equipment unless a pending or active contract holds it;
    /// returns false when a contract does
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;
        if !lock_free_equipment(&mut tx, id).await? {
            return Ok(false);
        }
        sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(true)
    }
}

const OPEN_CONTRACT_Q: &str = r#"
    SELECT EXISTS(
        SELECT 1 FROM rental_contracts
        WHERE equipment_id = $1 AND status IN ('PENDING', 'ACTIVE')
    )
"#;

/// Lock the equipment row and report whether no open contract holds it.
///
/// Contract creation updates the same row, so once the lock is ours any
/// contract created meanwhile is committed and visible to the check.
async fn lock_free_equipment(tx: &mut Transaction<'_, Postgres>, id: i32) -> AppResult<bool> {
    sqlx::query_scalar::<_, i32>("SELECT id FROM equipment WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))?;

    let open: bool = sqlx::query_scalar(OPEN_CONTRACT_Q)
        .bind(id)
        .fetch_one(&mut **tx)
        .await?;
    Ok(!open)
}
