//! Listings service

use chrono::Utc;

use crate::{
    config::MarketplaceConfig,
    error::{AppError, AppResult},
    models::{
        enums::ListingStatus,
        listing::{CreateListing, Listing, ListingQuery, Quote, QuoteQuery, UpdateListing},
        user::UserClaims,
        Paginated,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ListingsService {
    repository: Repository,
    marketplace: MarketplaceConfig,
}

impl ListingsService {
    pub fn new(repository: Repository, marketplace: MarketplaceConfig) -> Self {
        Self { repository, marketplace }
    }

    /// Search listings
    pub async fn search(&self, query: &ListingQuery) -> AppResult<Paginated<Listing>> {
        if let (Some(min), Some(max)) = (query.min_price, query.max_price) {
            if min > max {
                return Err(AppError::Validation(
                    "min_price must not exceed max_price".to_string(),
                ));
            }
        }
        let (limit, offset) = self.marketplace.paginate(query.page, query.per_page)?;
        let (listings, total) = self.repository.listings.list(query, limit, offset).await?;
        Ok(Paginated::new(listings, total, limit, offset))
    }

    /// Listings published by the current user
    pub async fn list_mine(&self, claims: &UserClaims) -> AppResult<Vec<Listing>> {
        self.repository.listings.list_by_owner(claims.user_id).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Listing> {
        self.repository.listings.get_by_id(id).await
    }

    pub async fn create(&self, claims: &UserClaims, data: CreateListing) -> AppResult<Listing> {
        let data = data.check()?;
        let listing = self.repository.listings.create(claims.user_id, &data).await?;
        tracing::info!(
            "Listing {} ({}) published by user {}",
            listing.id,
            listing.listing_type,
            claims.user_id
        );
        Ok(listing)
    }

    /// Edit a listing's terms; only while nobody holds it
    pub async fn update(&self, claims: &UserClaims, id: i32, data: &UpdateListing) -> AppResult<Listing> {
        let current = self.repository.listings.get_by_id(id).await?;
        claims.require_owner(current.owner_id, "listing")?;
        if !current.status.is_editable() {
            return Err(AppError::BusinessRule(format!(
                "Listing {} cannot be edited while {}",
                id,
                current.status.label().to_lowercase()
            )));
        }
        data.check(&current)?;
        self.repository
            .listings
            .update(id, data)
            .await?
            .ok_or_else(|| AppError::Conflict(format!("Listing {} was modified concurrently", id)))
    }

    /// Owner-driven publication toggle (`Available <-> Unavailable`).
    ///
    /// Every other move is driven by reservations.
    pub async fn change_status(&self, claims: &UserClaims, id: i32, status: ListingStatus) -> AppResult<Listing> {
        let current = self.repository.listings.get_by_id(id).await?;
        claims.require_owner(current.owner_id, "listing")?;

        if current.status == status {
            return Ok(current);
        }
        let owner_move = matches!(
            (current.status, status),
            (ListingStatus::Available, ListingStatus::Unavailable)
                | (ListingStatus::Unavailable, ListingStatus::Available)
        );
        if !owner_move || !current.status.can_transition_to(status) {
            tracing::warn!(
                "Refused listing {} status change {:?} -> {:?}",
                id,
                current.status,
                status
            );
            return Err(AppError::BusinessRule(format!(
                "Listing cannot go from {} to {}",
                current.status, status
            )));
        }

        if !self.repository.listings.set_status(id, current.status, status).await? {
            return Err(AppError::Conflict(format!("Listing {} was modified concurrently", id)));
        }
        tracing::info!("Listing {} is now {:?}", id, status);
        self.repository.listings.get_by_id(id).await
    }

    pub async fn delete(&self, claims: &UserClaims, id: i32) -> AppResult<()> {
        let current = self.repository.listings.get_by_id(id).await?;
        claims.require_owner(current.owner_id, "listing")?;
        if !current.status.is_editable() {
            return Err(AppError::BusinessRule(format!(
                "Listing {} is {} and cannot be deleted",
                id,
                current.status.label().to_lowercase()
            )));
        }
        if !self.repository.listings.delete(id).await? {
            return Err(AppError::Conflict(format!("Listing {} was modified concurrently", id)));
        }
        tracing::info!("Listing {} deleted by user {}", id, claims.user_id);
        Ok(())
    }

    /// Price the given dates without reserving anything
    pub async fn quote(&self, id: i32, query: &QuoteQuery) -> AppResult<Quote> {
        let listing = self.repository.listings.get_by_id(id).await?;
        listing.quote(query.start_date, query.end_date, Utc::now().date_naive())
    }
}
