//! Configuration module for lumptex
//!
//! Provides types, discovery and parsing for `lumptex.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
