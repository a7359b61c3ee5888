//! Reservation (booking of a listing) model and related types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::ReservationStatus;

/// Reservation record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reservation {
    pub id: i32,
    pub listing_id: i32,
    pub renter_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Final amount of the transaction, computed when the reservation is made
    pub total_price: Decimal,
    pub status: ReservationStatus,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Reservation {
    /// Whether the user is the renter of this reservation
    pub fn is_renter(&self, user_id: i32) -> bool {
        self.renter_id == user_id
    }
}

/// Create reservation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservation {
    /// Required for rentals (YYYY-MM-DD), ignored for sales
    pub start_date: Option<NaiveDate>,
    /// Required for rentals (YYYY-MM-DD), ignored for sales
    pub end_date: Option<NaiveDate>,
    /// Optional message to the owner
    #[validate(length(max = 1000, message = "Comment must be at most 1000 characters"))]
    pub comment: Option<String>,
}

/// Row inserted by the repository once the service has priced the booking
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub listing_id: i32,
    pub renter_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: Decimal,
    pub comment: Option<String>,
}

/// Query parameters for reservations
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ReservationQuery {
    pub listing_id: Option<i32>,
    pub renter_id: Option<i32>,
    pub status: Option<ReservationStatus>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Items per page
    pub per_page: Option<i64>,
}
