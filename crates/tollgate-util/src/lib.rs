//! Shared utilities for tollgate
//!
//! This crate provides:
//! - ID types (SurfaceSessionId)
//! - The UTC time source, with a debug-only mock override
//! - Default paths for settings and data directories

mod ids;
mod paths;
mod time;

pub use ids::*;
pub use paths::*;
pub use time::*;
