//! Cross-cutting plumbing shared by the Rydroo services.
//!
//! Health checks, request-id/trace layers, serde helpers and tracing setup.
//! Holds no domain logic.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
