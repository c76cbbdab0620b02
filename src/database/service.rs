//! Database service layer
//!
//! This module bundles the repositories behind one handle

use crate::database::{
    DatabasePool, LotteryRepository, ParticipantRepository, SignupRepository, TripRepository,
};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub trips: TripRepository,
    pub signups: SignupRepository,
    pub participants: ParticipantRepository,
    pub lottery: LotteryRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            trips: TripRepository::new(pool.clone()),
            signups: SignupRepository::new(pool.clone()),
            participants: ParticipantRepository::new(pool.clone()),
            lottery: LotteryRepository::new(pool),
        }
    }
}
