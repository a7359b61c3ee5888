//! Equipment rental contracts service

use crate::{
    config::MarketplaceConfig,
    error::{AppError, AppResult},
    models::{
        contract::{ContractQuery, CreateContract, NewContract, RentalContract},
        enums::ContractStatus,
        equipment::Equipment,
        period::RentalPeriod,
        user::UserClaims,
        Paginated,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ContractsService {
    repository: Repository,
    marketplace: MarketplaceConfig,
}

impl ContractsService {
    pub fn new(repository: Repository, marketplace: MarketplaceConfig) -> Self {
        Self { repository, marketplace }
    }

    /// Rent a piece of equipment for the given period
    pub async fn create(&self, claims: &UserClaims, data: &CreateContract) -> AppResult<RentalContract> {
        let period = RentalPeriod::new(data.start_date, data.end_date)?;
        let equipment = self.repository.equipment.get_by_id(data.equipment_id).await?;

        if equipment.owner_id == claims.user_id {
            return Err(AppError::BusinessRule("You cannot rent your own equipment".to_string()));
        }
        if !equipment.available {
            return Err(AppError::Conflict(format!("Equipment {} is not available", equipment.id)));
        }

        let new = NewContract {
            equipment_id: equipment.id,
            renter_id: claims.user_id,
            start_date: period.start,
            end_date: period.end,
            total_price: period.total(equipment.daily_price),
        };
        let contract = self.repository.contracts.create(&new).await?;
        tracing::info!(
            "Contract {} for equipment {} by user {}: {} days, total {}",
            contract.id,
            equipment.id,
            claims.user_id,
            period.days(),
            contract.total_price
        );
        Ok(contract)
    }

    /// Equipment owner hands the equipment over
    pub async fn activate(&self, claims: &UserClaims, id: i32) -> AppResult<RentalContract> {
        let (contract, equipment) = self.load(id).await?;
        claims.require_owner(equipment.owner_id, "equipment")?;
        Self::ensure_transition(&contract, ContractStatus::Active)?;
        let contract = self.repository.contracts.activate(id).await?;
        tracing::info!("Contract {} activated", id);
        Ok(contract)
    }

    /// Equipment owner gets the equipment back
    pub async fn complete(&self, claims: &UserClaims, id: i32) -> AppResult<RentalContract> {
        let (contract, equipment) = self.load(id).await?;
        claims.require_owner(equipment.owner_id, "equipment")?;
        Self::ensure_transition(&contract, ContractStatus::Completed)?;
        let contract = self.repository.contracts.complete(id).await?;
        tracing::info!("Contract {} completed, equipment {} available again", id, equipment.id);
        Ok(contract)
    }

    /// Renter or equipment owner calls the rental off
    pub async fn cancel(&self, claims: &UserClaims, id: i32) -> AppResult<RentalContract> {
        let (contract, equipment) = self.load(id).await?;
        if contract.renter_id != claims.user_id && !claims.can_manage(equipment.owner_id) {
            return Err(AppError::Authorization(
                "Only the renter or the equipment owner can cancel this contract".to_string(),
            ));
        }
        Self::ensure_transition(&contract, ContractStatus::Cancelled)?;
        let cancelled = self.repository.contracts.cancel(id, contract.status).await?;
        tracing::info!("Contract {} cancelled by user {}", id, claims.user_id);
        Ok(cancelled)
    }

    /// Contracts of the current user as renter, or of equipment they own
    pub async fn list(&self, claims: &UserClaims, mut query: ContractQuery) -> AppResult<Paginated<RentalContract>> {
        if !claims.is_admin() {
            let owns_equipment = match query.equipment_id {
                Some(equipment_id) => {
                    self.repository.equipment.get_by_id(equipment_id).await?.owner_id == claims.user_id
                }
                None => false,
            };
            if !owns_equipment {
                query.renter_id = Some(claims.user_id);
            }
        }
        let (limit, offset) = self.marketplace.paginate(query.page, query.per_page)?;
        let (rows, total) = self.repository.contracts.list(&query, limit, offset).await?;
        Ok(Paginated::new(rows, total, limit, offset))
    }

    /// Get a contract; visible to the renter, the equipment owner and admins
    pub async fn get_by_id(&self, claims: &UserClaims, id: i32) -> AppResult<RentalContract> {
        let (contract, equipment) = self.load(id).await?;
        if contract.renter_id != claims.user_id && !claims.can_manage(equipment.owner_id) {
            return Err(AppError::Authorization("Not a party to this contract".to_string()));
        }
        Ok(contract)
    }

    /// Remove a finished contract (admin only)
    pub async fn delete(&self, claims: &UserClaims, id: i32) -> AppResult<()> {
        claims.require_admin()?;
        let contract = self.repository.contracts.get_by_id(id).await?;
        if !contract.status.is_terminal() {
            return Err(AppError::BusinessRule(format!(
                "Contract {} is still {}",
                id,
                contract.status.label().to_lowercase()
            )));
        }
        self.repository.contracts.delete(id).await?;
        tracing::info!("Contract {} deleted by admin {}", id, claims.user_id);
        Ok(())
    }

    async fn load(&self, id: i32) -> AppResult<(RentalContract, Equipment)> {
        let contract = self.repository.contracts.get_by_id(id).await?;
        let equipment = self.repository.equipment.get_by_id(contract.equipment_id).await?;
        Ok((contract, equipment))
    }

    fn ensure_transition(contract: &RentalContract, next: ContractStatus) -> AppResult<()> {
        if contract.status.can_transition_to(next) {
            return Ok(());
        }
        tracing::warn!(
            "Refused contract {} transition {:?} -> {:?}",
            contract.id,
            contract.status,
            next
        );
        Err(AppError::BusinessRule(format!(
            "Contract is {} and cannot become {}",
            contract.status.label().to_lowercase(),
            next.label().to_lowercase()
        )))
    }
}
