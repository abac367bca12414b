//! Storage layer
//!
//! A single SQLite file holds the `cafe` table.

pub mod db;

pub use db::Database;
