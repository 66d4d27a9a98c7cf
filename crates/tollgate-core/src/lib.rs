//! Core flow-control for tollgate
//!
//! This crate is the heart of the launch flow, containing:
//! - The activation gate (one evaluation per process, fails closed to
//!   native mode)
//! - The write-once observable flow state the presentation layer
//!   subscribes to
//! - The delayed, at-most-once-per-install review prompt trigger

mod flow;
mod gate;
mod rating;

pub use flow::*;
pub use gate::*;
pub use rating::*;
