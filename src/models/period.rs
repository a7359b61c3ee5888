//! Rental period arithmetic shared by reservations and contracts

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};

/// A validated `[start, end)` rental period, at least one day long
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl RentalPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        if end <= start {
            return Err(AppError::Validation(
                "End date must be after start date".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Build a period from optional request dates
    pub fn from_request(start: Option<NaiveDate>, end: Option<NaiveDate>) -> AppResult<Self> {
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end),
            _ => Err(AppError::Validation(
                "start_date and end_date are required for a rental".to_string(),
            )),
        }
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn total(&self, daily_price: Decimal) -> Decimal {
        daily_price * Decimal::from(self.days())
    }

    /// Whether the period fits inside an availability window (open bounds allowed)
    pub fn within(&self, window_start: Option<NaiveDate>, window_end: Option<NaiveDate>) -> bool {
        window_start.map_or(true, |s| self.start >= s) && window_end.map_or(true, |e| self.end <= e)
    }
}
