//! Equipment model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Equipment record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i32,
    /// Equipment name / description
    pub name: String,
    /// Kind of machinery (Tracteur, Moissonneuse, ...)
    pub equipment_type: String,
    /// Rental price per day
    pub daily_price: Decimal,
    /// Whether the equipment can currently be rented
    pub available: bool,
    pub owner_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn positive(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() || value.is_zero() {
        return Err(ValidationError::new("not_positive"));
    }
    Ok(())
}

/// Create equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(
        length(min = 1, max = 200, message = "Name must be 1 to 200 characters"),
        custom(function = "not_blank", message = "Name is required")
    )]
    pub name: String,
    #[validate(
        length(min = 1, max = 100, message = "Type must be 1 to 100 characters"),
        custom(function = "not_blank", message = "Type is required")
    )]
    pub equipment_type: String,
    #[validate(custom(function = "positive", message = "Daily price must be positive"))]
    pub daily_price: Decimal,
    /// Defaults to available
    pub available: Option<bool>,
}

/// Update equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipment {
    #[validate(
        length(min = 1, max = 200, message = "Name must be 1 to 200 characters"),
        custom(function = "not_blank", message = "Name is required")
    )]
    pub name: Option<String>,
    #[validate(
        length(min = 1, max = 100, message = "Type must be 1 to 100 characters"),
        custom(function = "not_blank", message = "Type is required")
    )]
    pub equipment_type: Option<String>,
    #[validate(custom(function = "positive", message = "Daily price must be positive"))]
    pub daily_price: Option<Decimal>,
}

/// Availability flag change
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAvailability {
    pub available: bool,
}

/// Query parameters for equipment
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct EquipmentQuery {
    pub available: Option<bool>,
    pub owner_id: Option<i32>,
    /// Exact equipment type (case-insensitive)
    pub equipment_type: Option<String>,
    pub max_daily_price: Option<Decimal>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Items per page
    pub per_page: Option<i64>,
}
