//! Equipment rental contract model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::ContractStatus;

/// Rental contract record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RentalContract {
    pub id: i32,
    pub equipment_id: i32,
    pub renter_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: Decimal,
    pub status: ContractStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create contract request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateContract {
    pub equipment_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Row inserted by the repository once the service has priced the contract
#[derive(Debug, Clone)]
pub struct NewContract {
    pub equipment_id: i32,
    pub renter_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: Decimal,
}

/// Query parameters for contracts
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ContractQuery {
    pub equipment_id: Option<i32>,
    pub renter_id: Option<i32>,
    pub status: Option<ContractStatus>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Items per page
    pub per_page: Option<i64>,
}
