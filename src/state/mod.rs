//! State module for tracking search progress
//!
//! # Components
//!
//! - `CoordinatorState`: the lifecycle of one paginated search run, from
//!   page-count discovery through fan-out to the final merge

mod coordinator_state;

// Re-export main types
pub use coordinator_state::CoordinatorState;
