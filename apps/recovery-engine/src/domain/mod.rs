//! Domain Layer
//!
//! Business logic with zero infrastructure dependencies.
//!
//! # Bounded Contexts
//!
//! - [`recovery`]: Averaging-down solver, goal shapes and recovery plans
//! - [`shared`]: Value objects shared across contexts

pub mod recovery;
pub mod shared;
