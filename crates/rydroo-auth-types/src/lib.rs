//! Session types shared by the auth service and its consumers.
//!
//! Provides the session cookie builders and JWT claim validation.

pub mod cookie;
pub mod token;
