//! Marketplace enums and their lifecycle rules

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// ListingType
// ---------------------------------------------------------------------------

/// Whether a listing offers goods for rent or for sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "listing_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingType {
    Rental,
    Sale,
}

impl ListingType {
    pub fn label(&self) -> &'static str {
        match self {
            ListingType::Rental => "Location",
            ListingType::Sale => "Vente",
        }
    }
}

impl std::fmt::Display for ListingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// ListingCategory
// ---------------------------------------------------------------------------

/// Category of equipment or product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "listing_category", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingCategory {
    // Machinery, usually rented
    Tractor,
    Harvester,
    Seeder,
    Sprayer,
    Trailer,
    Irrigation,
    // Produce and supplies, usually sold
    Seeds,
    Fertilizer,
    Harvest,
    Other,
}

impl ListingCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ListingCategory::Tractor => "Tracteur",
            ListingCategory::Harvester => "Moissonneuse",
            ListingCategory::Seeder => "Semoir",
            ListingCategory::Sprayer => "Pulvérisateur",
            ListingCategory::Trailer => "Remorque agricole",
            ListingCategory::Irrigation => "Irrigation",
            ListingCategory::Seeds => "Semences",
            ListingCategory::Fertilizer => "Engrais",
            ListingCategory::Harvest => "Produit de récolte",
            ListingCategory::Other => "Autre",
        }
    }
}

impl std::fmt::Display for ListingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// ListingStatus
// ---------------------------------------------------------------------------

/// Lifecycle of a listing
///
/// `Available -> Reserved -> Rented | Sold`, back to `Available` when a
/// reservation is cancelled or a rental ends. Owners may withdraw an
/// available listing (`Unavailable`) and publish it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "listing_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    Available,
    Reserved,
    Rented,
    Sold,
    Unavailable,
}

impl ListingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ListingStatus::Available => "Disponible",
            ListingStatus::Reserved => "Réservé",
            ListingStatus::Rented => "Loué",
            ListingStatus::Sold => "Vendu",
            ListingStatus::Unavailable => "Indisponible",
        }
    }

    pub fn can_transition_to(&self, next: ListingStatus) -> bool {
        use ListingStatus::*;
        matches!(
            (self, next),
            (Available, Reserved)
                | (Available, Unavailable)
                | (Unavailable, Available)
                | (Reserved, Rented)
                | (Reserved, Sold)
                | (Reserved, Available)
                | (Rented, Available)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ListingStatus::Sold)
    }

    /// Status a reserved listing settles into once the deal is confirmed
    pub fn settled_for(listing_type: ListingType) -> ListingStatus {
        match listing_type {
            ListingType::Rental => ListingStatus::Rented,
            ListingType::Sale => ListingStatus::Sold,
        }
    }

    /// Whether the owner may still edit or delete the listing.
    ///
    /// Reserved and rented listings belong to a live deal; sold ones keep
    /// the completed sale's record.
    pub fn is_editable(&self) -> bool {
        matches!(self, ListingStatus::Available | ListingStatus::Unavailable)
    }
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// ReservationStatus
// ---------------------------------------------------------------------------

/// Lifecycle of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "reservation_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "En attente",
            ReservationStatus::Confirmed => "Confirmée",
            ReservationStatus::Cancelled => "Annulée",
            ReservationStatus::Completed => "Terminée",
        }
    }

    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ReservationStatus::Cancelled | ReservationStatus::Completed)
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// ContractStatus
// ---------------------------------------------------------------------------

/// Lifecycle of an equipment rental contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "contract_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    Pending,
    Active,
    Completed,
    Cancelled,
}

impl ContractStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ContractStatus::Pending => "En attente",
            ContractStatus::Active => "Actif",
            ContractStatus::Completed => "Terminé",
            ContractStatus::Cancelled => "Annulé",
        }
    }

    pub fn can_transition_to(&self, next: ContractStatus) -> bool {
        use ContractStatus::*;
        matches!(
            (self, next),
            (Pending, Active) | (Pending, Cancelled) | (Active, Completed) | (Active, Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ContractStatus::Completed | ContractStatus::Cancelled)
    }
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
