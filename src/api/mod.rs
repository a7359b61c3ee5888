//! API handlers for the AgriFlow marketplace REST endpoints

pub mod contracts;
pub mod equipment;
pub mod health;
pub mod listings;
pub mod openapi;
pub mod reservations;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// JSON body extractor answering malformed payloads with an `AppError`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string extractor answering bad parameters with an `AppError`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Path extractor answering bad ids with an `AppError`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Listings
        .route("/listings", get(listings::list_listings).post(listings::create_listing))
        .route(
            "/listings/:id",
            get(listings::get_listing)
                .put(listings::update_listing)
                .delete(listings::delete_listing),
        )
        .route("/listings/:id/status", put(listings::update_listing_status))
        .route("/listings/:id/quote", get(listings::quote_listing))
        .route("/me/listings", get(listings::my_listings))
        // Reservations
        .route(
            "/listings/:id/reservations",
            get(reservations::list_listing_reservations).post(reservations::create_reservation),
        )
        .route("/reservations", get(reservations::list_reservations))
        .route("/reservations/received", get(reservations::list_received_reservations))
        .route(
            "/reservations/:id",
            get(reservations::get_reservation).delete(reservations::delete_reservation),
        )
        .route("/reservations/:id/confirm", post(reservations::confirm_reservation))
        .route("/reservations/:id/cancel", post(reservations::cancel_reservation))
        .route("/reservations/:id/complete", post(reservations::complete_reservation))
        // Equipment
        .route("/equipment", get(equipment::list_equipment).post(equipment::create_equipment))
        .route(
            "/equipment/:id",
            get(equipment::get_equipment)
                .put(equipment::update_equipment)
                .delete(equipment::delete_equipment),
        )
        .route("/equipment/:id/availability", put(equipment::update_availability))
        // Rental contracts
        .route("/contracts", get(contracts::list_contracts).post(contracts::create_contract))
        .route(
            "/contracts/:id",
            get(contracts::get_contract).delete(contracts::delete_contract),
        )
        .route("/contracts/:id/activate", post(contracts::activate_contract))
        .route("/contracts/:id/complete", post(contracts::complete_contract))
        .route("/contracts/:id/cancel", post(contracts::cancel_contract))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
