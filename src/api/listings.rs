//! Listing endpoints (rent or sell equipment and produce)

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        listing::{CreateListing, Listing, ListingQuery, Quote, QuoteQuery, UpdateListing, UpdateListingStatus},
        Paginated,
    },
};

use super::{AppJson, AppPath, AppQuery, AuthenticatedUser};

/// Search listings with filters and pagination
#[utoipa::path(
    get,
    path = "/listings",
    tag = "listings",
    security(("bearer_auth" = [])),
    params(ListingQuery),
    responses(
        (status = 200, description = "Matching listings", body = Paginated<Listing>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_listings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    AppQuery(query): AppQuery<ListingQuery>,
) -> AppResult<Json<Paginated<Listing>>> {
    let page = state.services.listings.search(&query).await?;
    Ok(Json(page))
}

/// Listings published by the current user
#[utoipa::path(
    get,
    path = "/me/listings",
    tag = "listings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own listings", body = Vec<Listing>)
    )
)]
pub async fn my_listings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Listing>>> {
    let listings = state.services.listings.list_mine(&claims).await?;
    Ok(Json(listings))
}

/// Get listing by ID
#[utoipa::path(
    get,
    path = "/listings/{id}",
    tag = "listings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing details", body = Listing),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn get_listing(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<Listing>> {
    let listing = state.services.listings.get_by_id(id).await?;
    Ok(Json(listing))
}

/// Publish a listing
#[utoipa::path(
    post,
    path = "/listings",
    tag = "listings",
    security(("bearer_auth" = [])),
    request_body = CreateListing,
    responses(
        (status = 201, description = "Listing created", body = Listing),
        (status = 400, description = "Invalid listing")
    )
)]
pub async fn create_listing(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(data): AppJson<CreateListing>,
) -> AppResult<(StatusCode, Json<Listing>)> {
    let listing = state.services.listings.create(&claims, data).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// Update a listing
#[utoipa::path(
    put,
    path = "/listings/{id}",
    tag = "listings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Listing ID")),
    request_body = UpdateListing,
    responses(
        (status = 200, description = "Listing updated", body = Listing),
        (status = 403, description = "Not the owner"),
        (status = 422, description = "Listing is reserved, rented or sold")
    )
)]
pub async fn update_listing(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
    AppJson(data): AppJson<UpdateListing>,
) -> AppResult<Json<Listing>> {
    let listing = state.services.listings.update(&claims, id, &data).await?;
    Ok(Json(listing))
}

/// Publish or withdraw a listing
#[utoipa::path(
    put,
    path = "/listings/{id}/status",
    tag = "listings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Listing ID")),
    request_body = UpdateListingStatus,
    responses(
        (status = 200, description = "Status changed", body = Listing),
        (status = 422, description = "Transition not allowed")
    )
)]
pub async fn update_listing_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
    AppJson(data): AppJson<UpdateListingStatus>,
) -> AppResult<Json<Listing>> {
    let listing = state.services.listings.change_status(&claims, id, data.status).await?;
    Ok(Json(listing))
}

/// Delete a listing
#[utoipa::path(
    delete,
    path = "/listings/{id}",
    tag = "listings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Listing ID")),
    responses(
        (status = 204, description = "Listing deleted"),
        (status = 422, description = "Listing is held by a renter")
    )
)]
pub async fn delete_listing(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<StatusCode> {
    state.services.listings.delete(&claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Price a reservation without making it
#[utoipa::path(
    get,
    path = "/listings/{id}/quote",
    tag = "listings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Listing ID"), QuoteQuery),
    responses(
        (status = 200, description = "Price quote", body = Quote),
        (status = 400, description = "Invalid dates")
    )
)]
pub async fn quote_listing(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
    AppQuery(query): AppQuery<QuoteQuery>,
) -> AppResult<Json<Quote>> {
    let quote = state.services.listings.quote(id, &query).await?;
    Ok(Json(quote))
}
