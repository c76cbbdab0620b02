//! Trailhead
//!
//! Signup and waitlist management for capacity-limited club trips: who is
//! confirmed, who waits, atomic administrator roster edits with optimistic
//! concurrency control, and lottery-pairing rank synchronization.
//! Authentication, page rendering, notification delivery, and the lottery
//! draw itself are external collaborators.

pub mod config;
pub mod database;
pub mod itinerary;
pub mod models;
pub mod roster;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{Result, TrailheadError};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use roster::Roster;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
