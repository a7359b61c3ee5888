//! Reservation endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        reservation::{CreateReservation, Reservation, ReservationQuery},
        Paginated,
    },
};

use super::{AppJson, AppPath, AppQuery, AuthenticatedUser};

/// Reserve a listing
#[utoipa::path(
    post,
    path = "/listings/{id}/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Listing ID")),
    request_body = CreateReservation,
    responses(
        (status = 201, description = "Reservation created", body = Reservation),
        (status = 409, description = "Listing no longer available"),
        (status = 422, description = "Own listing")
    )
)]
pub async fn create_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(listing_id): AppPath<i32>,
    AppJson(data): AppJson<CreateReservation>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    let reservation = state.services.reservations.reserve(&claims, listing_id, &data).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// Reservations of a listing (owner only)
#[utoipa::path(
    get,
    path = "/listings/{id}/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Listing ID"), ReservationQuery),
    responses(
        (status = 200, description = "Reservations of the listing", body = Paginated<Reservation>)
    )
)]
pub async fn list_listing_reservations(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(listing_id): AppPath<i32>,
    AppQuery(query): AppQuery<ReservationQuery>,
) -> AppResult<Json<Paginated<Reservation>>> {
    let page = state
        .services
        .reservations
        .list_for_listing(&claims, listing_id, query)
        .await?;
    Ok(Json(page))
}

/// Reservations made by the current user
#[utoipa::path(
    get,
    path = "/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(ReservationQuery),
    responses(
        (status = 200, description = "Own reservations", body = Paginated<Reservation>)
    )
)]
pub async fn list_reservations(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppQuery(query): AppQuery<ReservationQuery>,
) -> AppResult<Json<Paginated<Reservation>>> {
    let page = state.services.reservations.list_mine(&claims, query).await?;
    Ok(Json(page))
}

/// Reservations received on the current user's listings
#[utoipa::path(
    get,
    path = "/reservations/received",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(ReservationQuery),
    responses(
        (status = 200, description = "Received reservations", body = Paginated<Reservation>)
    )
)]
pub async fn list_received_reservations(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppQuery(query): AppQuery<ReservationQuery>,
) -> AppResult<Json<Paginated<Reservation>>> {
    let page = state.services.reservations.list_received(&claims, &query).await?;
    Ok(Json(page))
}

/// Get reservation by ID
#[utoipa::path(
    get,
    path = "/reservations/{id}",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation details", body = Reservation),
        (status = 403, description = "Not a participant")
    )
)]
pub async fn get_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.services.reservations.get_by_id(&claims, id).await?;
    Ok(Json(reservation))
}

/// Confirm a pending reservation (listing owner)
#[utoipa::path(
    post,
    path = "/reservations/{id}/confirm",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation confirmed", body = Reservation),
        (status = 422, description = "Reservation is not pending")
    )
)]
pub async fn confirm_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.services.reservations.confirm(&claims, id).await?;
    Ok(Json(reservation))
}

/// Cancel a reservation
#[utoipa::path(
    post,
    path = "/reservations/{id}/cancel",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation cancelled", body = Reservation),
        (status = 422, description = "Reservation cannot be cancelled")
    )
)]
pub async fn cancel_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.services.reservations.cancel(&claims, id).await?;
    Ok(Json(reservation))
}

/// Complete a confirmed reservation (listing owner)
#[utoipa::path(
    post,
    path = "/reservations/{id}/complete",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation completed", body = Reservation),
        (status = 422, description = "Reservation is not confirmed")
    )
)]
pub async fn complete_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.services.reservations.complete(&claims, id).await?;
    Ok(Json(reservation))
}

/// Delete a settled reservation (admin)
#[utoipa::path(
    delete,
    path = "/reservations/{id}",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 204, description = "Reservation deleted"),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn delete_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<StatusCode> {
    state.services.reservations.delete(&claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
