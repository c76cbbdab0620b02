//! Services module
//!
//! This module contains business logic services

pub mod lottery;
pub mod roster;
pub mod signup;

// Re-export commonly used services
pub use lottery::{LotteryService, OrderSyncReport, PairingStatus};
pub use roster::{
    OverflowDirection, OverflowPreview, RosterMember, RosterReceipt, RosterService, RosterSnapshot,
};
pub use signup::SignupService;

use crate::config::Settings;
use crate::database::{DatabasePool, DatabaseService};

/// Service factory for creating and managing all services
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub signup_service: SignupService,
    pub roster_service: RosterService,
    pub lottery_service: LotteryService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(pool: DatabasePool, settings: Settings) -> Self {
        let db = DatabaseService::new(pool.clone());
        let signup_service = SignupService::new(pool.clone(), db.clone());
        let roster_service = RosterService::new(pool.clone(), db.clone(), settings);
        let lottery_service = LotteryService::new(pool, db);

        Self {
            signup_service,
            roster_service,
            lottery_service,
        }
    }
}
