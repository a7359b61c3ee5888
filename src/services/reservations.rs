//! Reservations service

use chrono::Utc;
use validator::Validate;

use crate::{
    config::MarketplaceConfig,
    error::{AppError, AppResult},
    models::{
        enums::{ListingStatus, ListingType, ReservationStatus},
        listing::Listing,
        reservation::{CreateReservation, NewReservation, Reservation, ReservationQuery},
        user::UserClaims,
        Paginated,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ReservationsService {
    repository: Repository,
    marketplace: MarketplaceConfig,
}

impl ReservationsService {
    pub fn new(repository: Repository, marketplace: MarketplaceConfig) -> Self {
        Self { repository, marketplace }
    }

    /// Reserve a listing for the current user.
    ///
    /// The price is always computed here from the listing, never taken from
    /// the request.
    pub async fn reserve(&self, claims: &UserClaims, listing_id: i32, data: &CreateReservation) -> AppResult<Reservation> {
        data.validate()?;
        let listing = self.repository.listings.get_by_id(listing_id).await?;

        if listing.owner_id == claims.user_id {
            return Err(AppError::BusinessRule("You cannot reserve your own listing".to_string()));
        }
        if listing.status != ListingStatus::Available {
            return Err(AppError::Conflict(format!(
                "Listing {} is {}",
                listing_id,
                listing.status.label().to_lowercase()
            )));
        }

        let quote = listing.quote(data.start_date, data.end_date, Utc::now().date_naive())?;
        let new = NewReservation {
            listing_id,
            renter_id: claims.user_id,
            start_date: quote.start_date,
            end_date: quote.end_date,
            total_price: quote.total_price,
            comment: data
                .comment
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        };

        let auto_confirm = self.marketplace.auto_confirm_reservations;
        let reservation = self.repository.reservations.create(&new, auto_confirm).await?;
        tracing::info!(
            "Reservation {} on listing {} by user {} ({}, total {})",
            reservation.id,
            listing_id,
            claims.user_id,
            reservation.status,
            reservation.total_price
        );
        Ok(reservation)
    }

    /// Owner accepts a pending reservation
    pub async fn confirm(&self, claims: &UserClaims, id: i32) -> AppResult<Reservation> {
        let (reservation, listing) = self.load(id).await?;
        claims.require_owner(listing.owner_id, "listing")?;
        Self::ensure_transition(&reservation, ReservationStatus::Confirmed)?;

        let confirmed = self
            .repository
            .reservations
            .confirm(id, listing.id, listing.listing_type)
            .await?;
        tracing::info!(
            "Reservation {} confirmed, listing {} now {:?}",
            id,
            listing.id,
            ListingStatus::settled_for(listing.listing_type)
        );
        Ok(confirmed)
    }

    /// Renter, listing owner or admin withdraws a reservation
    pub async fn cancel(&self, claims: &UserClaims, id: i32) -> AppResult<Reservation> {
        let (reservation, listing) = self.load(id).await?;
        if !reservation.is_renter(claims.user_id) && !claims.can_manage(listing.owner_id) {
            return Err(AppError::Authorization(
                "Only the renter or the listing owner can cancel this reservation".to_string(),
            ));
        }
        Self::ensure_transition(&reservation, ReservationStatus::Cancelled)?;
        if reservation.status == ReservationStatus::Confirmed && listing.listing_type == ListingType::Sale {
            return Err(AppError::BusinessRule("A confirmed sale cannot be cancelled".to_string()));
        }

        let cancelled = self
            .repository
            .reservations
            .cancel(id, listing.id, reservation.status)
            .await?;
        tracing::info!("Reservation {} cancelled by user {}, listing {} released", id, claims.user_id, listing.id);
        Ok(cancelled)
    }

    /// Owner closes a confirmed reservation
    pub async fn complete(&self, claims: &UserClaims, id: i32) -> AppResult<Reservation> {
        let (reservation, listing) = self.load(id).await?;
        claims.require_owner(listing.owner_id, "listing")?;
        Self::ensure_transition(&reservation, ReservationStatus::Completed)?;

        let completed = self
            .repository
            .reservations
            .complete(id, listing.id, listing.listing_type)
            .await?;
        tracing::info!("Reservation {} completed", id);
        Ok(completed)
    }

    /// Reservations made by the current user; admins may filter freely
    pub async fn list_mine(&self, claims: &UserClaims, mut query: ReservationQuery) -> AppResult<Paginated<Reservation>> {
        if !claims.is_admin() {
            query.renter_id = Some(claims.user_id);
        }
        self.list(&query).await
    }

    /// Reservations on listings owned by the current user
    pub async fn list_received(&self, claims: &UserClaims, query: &ReservationQuery) -> AppResult<Paginated<Reservation>> {
        let (limit, offset) = self.marketplace.paginate(query.page, query.per_page)?;
        let (rows, total) = self
            .repository
            .reservations
            .list_received(claims.user_id, query, limit, offset)
            .await?;
        Ok(Paginated::new(rows, total, limit, offset))
    }

    /// Reservations of one listing, for its owner
    pub async fn list_for_listing(
        &self,
        claims: &UserClaims,
        listing_id: i32,
        mut query: ReservationQuery,
    ) -> AppResult<Paginated<Reservation>> {
        let listing = self.repository.listings.get_by_id(listing_id).await?;
        claims.require_owner(listing.owner_id, "listing")?;
        query.listing_id = Some(listing_id);
        self.list(&query).await
    }

    /// Get a reservation; visible to the renter, the listing owner and admins
    pub async fn get_by_id(&self, claims: &UserClaims, id: i32) -> AppResult<Reservation> {
        let (reservation, listing) = self.load(id).await?;
        if !reservation.is_renter(claims.user_id) && !claims.can_manage(listing.owner_id) {
            return Err(AppError::Authorization("Not a participant of this reservation".to_string()));
        }
        Ok(reservation)
    }

    /// Remove a settled reservation (admin only)
    pub async fn delete(&self, claims: &UserClaims, id: i32) -> AppResult<()> {
        claims.require_admin()?;
        let reservation = self.repository.reservations.get_by_id(id).await?;
        if !reservation.status.is_terminal() {
            return Err(AppError::BusinessRule(format!(
                "Reservation {} is still {} and must be cancelled first",
                id,
                reservation.status.label().to_lowercase()
            )));
        }
        self.repository.reservations.delete(id).await?;
        tracing::info!("Reservation {} deleted by admin {}", id, claims.user_id);
        Ok(())
    }

    async fn list(&self, query: &ReservationQuery) -> AppResult<Paginated<Reservation>> {
        let (limit, offset) = self.marketplace.paginate(query.page, query.per_page)?;
        let (rows, total) = self.repository.reservations.list(query, limit, offset).await?;
        Ok(Paginated::new(rows, total, limit, offset))
    }

    async fn load(&self, id: i32) -> AppResult<(Reservation, Listing)> {
        let reservation = self.repository.reservations.get_by_id(id).await?;
        let listing = self.repository.listings.get_by_id(reservation.listing_id).await?;
        Ok((reservation, listing))
    }

    fn ensure_transition(reservation: &Reservation, next: ReservationStatus) -> AppResult<()> {
        if reservation.status.can_transition_to(next) {
            return Ok(());
        }
        tracing::warn!(
            "Refused reservation {} transition {:?} -> {:?}",
            reservation.id,
            reservation.status,
            next
        );
        Err(AppError::BusinessRule(format!(
            "Reservation is {} and cannot become {}",
            reservation.status.label().to_lowercase(),
            next.label().to_lowercase()
        )))
    }
}
