//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{contracts, equipment, health, listings, reservations};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AgriFlow Marketplace API",
        version = "0.3.0",
        description = "Peer-to-peer marketplace for renting and selling agricultural equipment and produce"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Listings
        listings::list_listings,
        listings::my_listings,
        listings::get_listing,
        listings::create_listing,
        listings::update_listing,
        listings::update_listing_status,
        listings::delete_listing,
        listings::quote_listing,
        // Reservations
        reservations::create_reservation,
        reservations::list_listing_reservations,
        reservations::list_reservations,
        reservations::list_received_reservations,
        reservations::get_reservation,
        reservations::confirm_reservation,
        reservations::cancel_reservation,
        reservations::complete_reservation,
        reservations::delete_reservation,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::update_availability,
        equipment::delete_equipment,
        // Contracts
        contracts::list_contracts,
        contracts::get_contract,
        contracts::create_contract,
        contracts::activate_contract,
        contracts::complete_contract,
        contracts::cancel_contract,
        contracts::delete_contract,
    ),
    components(
        schemas(
            // Enums
            crate::models::enums::ListingType,
            crate::models::enums::ListingCategory,
            crate::models::enums::ListingStatus,
            crate::models::enums::ReservationStatus,
            crate::models::enums::ContractStatus,
            // Listings
            crate::models::listing::Listing,
            crate::models::listing::CreateListing,
            crate::models::listing::UpdateListing,
            crate::models::listing::UpdateListingStatus,
            crate::models::listing::ListingSort,
            crate::models::listing::Quote,
            // Reservations
            crate::models::reservation::Reservation,
            crate::models::reservation::CreateReservation,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            crate::models::equipment::UpdateAvailability,
            // Contracts
            crate::models::contract::RentalContract,
            crate::models::contract::CreateContract,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "listings", description = "Marketplace listings"),
        (name = "reservations", description = "Reservations of listings"),
        (name = "equipment", description = "Equipment rental catalogue"),
        (name = "contracts", description = "Equipment rental contracts")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
