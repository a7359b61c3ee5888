//! Data models for the marketplace

pub mod contract;
pub mod enums;
pub mod equipment;
pub mod listing;
pub mod page;
pub mod period;
pub mod reservation;
pub mod user;

// Re-export commonly used types
pub use contract::RentalContract;
pub use enums::{ContractStatus, ListingCategory, ListingStatus, ListingType, ReservationStatus};
pub use equipment::Equipment;
pub use listing::Listing;
pub use page::Paginated;
pub use period::RentalPeriod;
pub use reservation::Reservation;
pub use user::{Role, UserClaims};
