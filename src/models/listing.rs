//! Listing (marketplace offer) model and related types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::enums::{ListingCategory, ListingStatus, ListingType};
use super::period::RentalPeriod;
use crate::error::{AppError, AppResult};

/// Listing record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Listing {
    pub id: i32,
    pub title: String,
    pub description: String,
    /// Daily price for rentals, total price for sales
    pub price: Decimal,
    pub listing_type: ListingType,
    pub category: ListingCategory,
    pub image_path: Option<String>,
    /// Governorate / town
    pub location: String,
    pub status: ListingStatus,
    pub availability_start: Option<NaiveDate>,
    pub availability_end: Option<NaiveDate>,
    pub owner_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Price quote for reserving a listing
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Quote {
    pub listing_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Number of rental days (0 for a sale)
    pub days: i64,
    pub total_price: Decimal,
}

impl Listing {
    /// Compute what a renter or buyer pays for the given dates.
    ///
    /// Sales ignore the dates and settle on `today`.
    pub fn quote(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> AppResult<Quote> {
        match self.listing_type {
            ListingType::Sale => Ok(Quote {
                listing_id: self.id,
                start_date: today,
                end_date: today,
                days: 0,
                total_price: self.price,
            }),
            ListingType::Rental => {
                let period = RentalPeriod::from_request(start, end)?;
                if !period.within(self.availability_start, self.availability_end) {
                    return Err(AppError::Validation(
                        "Requested dates are outside the availability window".to_string(),
                    ));
                }
                Ok(Quote {
                    listing_id: self.id,
                    start_date: period.start,
                    end_date: period.end,
                    days: period.days(),
                    total_price: period.total(self.price),
                })
            }
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        return Err(ValidationError::new("negative"));
    }
    Ok(())
}

/// Create listing request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateListing {
    #[validate(
        custom(function = "not_blank", message = "Title is required"),
        length(max = 200, message = "Title must be at most 200 characters")
    )]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: String,
    #[validate(custom(function = "non_negative", message = "Price must not be negative"))]
    pub price: Decimal,
    pub listing_type: ListingType,
    pub category: ListingCategory,
    pub image_path: Option<String>,
    #[validate(custom(function = "not_blank", message = "Location is required"))]
    pub location: String,
    /// Required for rentals (YYYY-MM-DD)
    pub availability_start: Option<NaiveDate>,
    /// Required for rentals (YYYY-MM-DD)
    pub availability_end: Option<NaiveDate>,
}

impl CreateListing {
    /// Validate field rules and the availability window, normalizing text fields
    pub fn check(mut self) -> AppResult<Self> {
        self.validate()?;
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self.location = self.location.trim().to_string();
        self.image_path = self
            .image_path
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        match self.listing_type {
            ListingType::Rental => {
                let (Some(start), Some(end)) = (self.availability_start, self.availability_end)
                else {
                    return Err(AppError::Validation(
                        "Availability dates are required for a rental".to_string(),
                    ));
                };
                if end < start {
                    return Err(AppError::Validation(
                        "Availability end must not precede availability start".to_string(),
                    ));
                }
            }
            ListingType::Sale => {
                self.availability_start = None;
                self.availability_end = None;
            }
        }
        Ok(self)
    }
}

/// Update listing request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateListing {
    #[validate(
        custom(function = "not_blank", message = "Title must not be blank"),
        length(max = 200, message = "Title must be at most 200 characters")
    )]
    pub title: Option<String>,
    #[validate(custom(function = "not_blank", message = "Description must not be blank"))]
    pub description: Option<String>,
    #[validate(custom(function = "non_negative", message = "Price must not be negative"))]
    pub price: Option<Decimal>,
    pub category: Option<ListingCategory>,
    pub image_path: Option<String>,
    #[validate(custom(function = "not_blank", message = "Location must not be blank"))]
    pub location: Option<String>,
    pub availability_start: Option<NaiveDate>,
    pub availability_end: Option<NaiveDate>,
}

impl UpdateListing {
    /// Validate the update against the listing it applies to
    pub fn check(&self, current: &Listing) -> AppResult<()> {
        self.validate()?;
        if current.listing_type == ListingType::Rental {
            let start = self.availability_start.or(current.availability_start);
            let end = self.availability_end.or(current.availability_end);
            if let (Some(start), Some(end)) = (start, end) {
                if end < start {
                    return Err(AppError::Validation(
                        "Availability end must not precede availability start".to_string(),
                    ));
                }
            }
        } else if self.availability_start.is_some() || self.availability_end.is_some() {
            return Err(AppError::Validation(
                "Sale listings have no availability window".to_string(),
            ));
        }
        Ok(())
    }
}

/// Owner-driven status change request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateListingStatus {
    pub status: ListingStatus,
}

/// Sort order for listing searches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ListingSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

impl ListingSort {
    pub fn order_by(&self) -> &'static str {
        match self {
            ListingSort::Newest => "created_at DESC, id DESC",
            ListingSort::PriceAsc => "price ASC, id ASC",
            ListingSort::PriceDesc => "price DESC, id DESC",
        }
    }
}

/// Query parameters for listing searches
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListingQuery {
    /// Substring matched against title or description
    pub keyword: Option<String>,
    pub listing_type: Option<ListingType>,
    pub category: Option<ListingCategory>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Substring matched against location
    pub location: Option<String>,
    pub status: Option<ListingStatus>,
    pub owner_id: Option<i32>,
    pub sort: Option<ListingSort>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Items per page
    pub per_page: Option<i64>,
}

/// Query parameters for a price quote
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct QuoteQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
