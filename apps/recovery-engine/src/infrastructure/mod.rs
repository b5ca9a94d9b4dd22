//! Infrastructure Layer
//!
//! Driver adapters over the recovery domain.

pub mod http;
