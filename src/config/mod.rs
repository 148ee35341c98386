//! Configuration module for the pxscale command
//!
//! Provides types, discovery and parsing for `pxscale.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
