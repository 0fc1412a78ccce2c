//! Domain types shared across all Rydroo services.
//!
//! This crate contains only pure types with no framework dependencies.

pub mod email;
pub mod id;
pub mod pagination;
pub mod trip;
