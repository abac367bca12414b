//! Cafe Types - Pure type definitions shared by the cafe API
//!
//! This crate contains only data types and their wire shapes, with no async
//! runtime or database dependencies.

pub mod cafe;
pub mod response;

pub use cafe::*;
pub use response::*;
