//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod lottery;
pub mod participant;
pub mod signup;
pub mod trip;

// Re-export repositories
pub use lottery::LotteryRepository;
pub use participant::ParticipantRepository;
pub use signup::SignupRepository;
pub use trip::TripRepository;
