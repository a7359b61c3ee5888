//! Equipment rental contract endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        contract::{ContractQuery, CreateContract, RentalContract},
        Paginated,
    },
};

use super::{AppJson, AppPath, AppQuery, AuthenticatedUser};

/// List contracts of the current user
#[utoipa::path(
    get,
    path = "/contracts",
    tag = "contracts",
    security(("bearer_auth" = [])),
    params(ContractQuery),
    responses(
        (status = 200, description = "Contracts list", body = Paginated<RentalContract>)
    )
)]
pub async fn list_contracts(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppQuery(query): AppQuery<ContractQuery>,
) -> AppResult<Json<Paginated<RentalContract>>> {
    let page = state.services.contracts.list(&claims, query).await?;
    Ok(Json(page))
}

/// Get contract by ID
#[utoipa::path(
    get,
    path = "/contracts/{id}",
    tag = "contracts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Contract ID")),
    responses(
        (status = 200, description = "Contract details", body = RentalContract)
    )
)]
pub async fn get_contract(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<RentalContract>> {
    let contract = state.services.contracts.get_by_id(&claims, id).await?;
    Ok(Json(contract))
}

/// Rent equipment
#[utoipa::path(
    post,
    path = "/contracts",
    tag = "contracts",
    security(("bearer_auth" = [])),
    request_body = CreateContract,
    responses(
        (status = 201, description = "Contract created", body = RentalContract),
        (status = 409, description = "Equipment not available")
    )
)]
pub async fn create_contract(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(data): AppJson<CreateContract>,
) -> AppResult<(StatusCode, Json<RentalContract>)> {
    let contract = state.services.contracts.create(&claims, &data).await?;
    Ok((StatusCode::CREATED, Json(contract)))
}

/// Start a pending contract (equipment owner)
#[utoipa::path(
    post,
    path = "/contracts/{id}/activate",
    tag = "contracts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Contract ID")),
    responses(
        (status = 200, description = "Contract active", body = RentalContract)
    )
)]
pub async fn activate_contract(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<RentalContract>> {
    let contract = state.services.contracts.activate(&claims, id).await?;
    Ok(Json(contract))
}

/// Close an active contract (equipment owner)
#[utoipa::path(
    post,
    path = "/contracts/{id}/complete",
    tag = "contracts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Contract ID")),
    responses(
        (status = 200, description = "Contract completed", body = RentalContract)
    )
)]
pub async fn complete_contract(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<RentalContract>> {
    let contract = state.services.contracts.complete(&claims, id).await?;
    Ok(Json(contract))
}

/// Cancel a contract
#[utoipa::path(
    post,
    path = "/contracts/{id}/cancel",
    tag = "contracts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Contract ID")),
    responses(
        (status = 200, description = "Contract cancelled", body = RentalContract)
    )
)]
pub async fn cancel_contract(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<RentalContract>> {
    let contract = state.services.contracts.cancel(&claims, id).await?;
    Ok(Json(contract))
}

/// Delete a finished contract (admin)
#[utoipa::path(
    delete,
    path = "/contracts/{id}",
    tag = "contracts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Contract ID")),
    responses(
        (status = 204, description = "Contract deleted")
    )
)]
pub async fn delete_contract(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<StatusCode> {
    state.services.contracts.delete(&claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
