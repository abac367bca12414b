//! Request extractors

pub mod cafe_id;

pub use cafe_id::CafeId;
