//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod lottery;
pub mod participant;
pub mod signup;
pub mod trip;

// Re-export commonly used models
pub use lottery::LotteryInfo;
pub use participant::{CreateParticipantRequest, Participant};
pub use signup::{CreateSignupRequest, Signup};
pub use trip::{CreateTripRequest, Trip, TripAlgorithm};
