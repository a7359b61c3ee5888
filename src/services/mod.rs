//! Business logic services

pub mod contracts;
pub mod equipment;
pub mod listings;
pub mod reservations;

use crate::{config::MarketplaceConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub listings: listings::ListingsService,
    pub reservations: reservations::ReservationsService,
    pub equipment: equipment::EquipmentService,
    pub contracts: contracts::ContractsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, marketplace: MarketplaceConfig) -> Self {
        Self {
            listings: listings::ListingsService::new(repository.clone(), marketplace.clone()),
            reservations: reservations::ReservationsService::new(repository.clone(), marketplace.clone()),
            equipment: equipment::EquipmentService::new(repository.clone(), marketplace.clone()),
            contracts: contracts::ContractsService::new(repository.clone(), marketplace),
            repository,
        }
    }

    /// Check that the database answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
