//! Business logic services

pub mod api_key;

pub use api_key::ApiKeyVerifier;
