//! Equipment API endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        equipment::{CreateEquipment, Equipment, EquipmentQuery, UpdateAvailability, UpdateEquipment},
        Paginated,
    },
};

use super::{AppJson, AppPath, AppQuery, AuthenticatedUser};

/// List equipment
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(EquipmentQuery),
    responses(
        (status = 200, description = "Equipment list", body = Paginated<Equipment>)
    )
)]
pub async fn list_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    AppQuery(query): AppQuery<EquipmentQuery>,
) -> AppResult<Json<Paginated<Equipment>>> {
    let page = state.services.equipment.list(&query).await?;
    Ok(Json(page))
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = Equipment)
    )
)]
pub async fn get_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.get_by_id(id).await?;
    Ok(Json(equipment))
}

/// Create equipment
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Equipment created", body = Equipment)
    )
)]
pub async fn create_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(data): AppJson<CreateEquipment>,
) -> AppResult<(StatusCode, Json<Equipment>)> {
    let equipment = state.services.equipment.create(&claims, &data).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

/// Update equipment
#[utoipa::path(
    put,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    request_body = UpdateEquipment,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment)
    )
)]
pub async fn update_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
    AppJson(data): AppJson<UpdateEquipment>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.update(&claims, id, &data).await?;
    Ok(Json(equipment))
}

/// Make equipment available or withdraw it
#[utoipa::path(
    put,
    path = "/equipment/{id}/availability",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    request_body = UpdateAvailability,
    responses(
        (status = 200, description = "Availability changed", body = Equipment),
        (status = 422, description = "Equipment is under contract")
    )
)]
pub async fn update_availability(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
    AppJson(data): AppJson<UpdateAvailability>,
) -> AppResult<Json<Equipment>> {
    let equipment = state
        .services
        .equipment
        .set_availability(&claims, id, data.available)
        .await?;
    Ok(Json(equipment))
}

/// Delete equipment
#[utoipa::path(
    delete,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 204, description = "Equipment deleted")
    )
)]
pub async fn delete_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<StatusCode> {
    state.services.equipment.delete(&claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
