//! Equipment service

use validator::Validate;

use crate::{
    config::MarketplaceConfig,
    error::{AppError, AppResult},
    models::{
        equipment::{CreateEquipment, Equipment, EquipmentQuery, UpdateEquipment},
        user::UserClaims,
        Paginated,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
    marketplace: MarketplaceConfig,
}

impl EquipmentService {
    pub fn new(repository: Repository, marketplace: MarketplaceConfig) -> Self {
        Self { repository, marketplace }
    }

    pub async fn list(&self, query: &EquipmentQuery) -> AppResult<Paginated<Equipment>> {
        let (limit, offset) = self.marketplace.paginate(query.page, query.per_page)?;
        let (rows, total) = self.repository.equipment.list(query, limit, offset).await?;
        Ok(Paginated::new(rows, total, limit, offset))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        self.repository.equipment.get_by_id(id).await
    }

    pub async fn create(&self, claims: &UserClaims, data: &CreateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        let equipment = self.repository.equipment.create(claims.user_id, data).await?;
        tracing::info!("Equipment {} added by user {}", equipment.id, claims.user_id);
        Ok(equipment)
    }

    pub async fn update(&self, claims: &UserClaims, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        let current = self.repository.equipment.get_by_id(id).await?;
        claims.require_owner(current.owner_id, "equipment")?;
        self.repository.equipment.update(id, data).await
    }

    /// Withdraw or republish equipment; refused while a contract holds it
    pub async fn set_availability(&self, claims: &UserClaims, id: i32, available: bool) -> AppResult<Equipment> {
        let current = self.repository.equipment.get_by_id(id).await?;
        claims.require_owner(current.owner_id, "equipment")?;
        if current.available == available {
            return Ok(current);
        }
        if self.repository.equipment.has_open_contract(id).await? {
            return Err(AppError::BusinessRule(format!(
                "Equipment {} is under an open rental contract",
                id
            )));
        }
        let equipment = self
            .repository
            .equipment
            .set_availability(id, available)
            .await?
            .ok_or_else(|| AppError::Conflict(format!("Equipment {} was rented meanwhile", id)))?;
        tracing::info!("Equipment {} availability set to {}", id, available);
        Ok(equipment)
    }

    pub async fn delete(&self, claims: &UserClaims, id: i32) -> AppResult<()> {
        let current = self.repository.equipment.get_by_id(id).await?;
        claims.require_owner(current.owner_id, "equipment")?;
        if self.repository.equipment.has_open_contract(id).await? {
            return Err(AppError::BusinessRule(format!(
                "Equipment {} is under an open rental contract and cannot be deleted",
                id
            )));
        }
        if !self.repository.equipment.delete(id).await? {
            return Err(AppError::Conflict(format!("Equipment {} was rented meanwhile", id)));
        }
        tracing::info!("Equipment {} deleted by user {}", id, claims.user_id);
        Ok(())
    }
}
