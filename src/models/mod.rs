//! Domain entity plus the request and response models for the profile API
//!
//! This module defines the `User` record and the DTOs (Data Transfer Objects)
//! used for serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;
pub mod user;

// Re-export commonly used types
pub use requests::{SearchQuery, UserRequest};
pub use responses::{ErrorResponse, HealthResponse};
pub use user::User;
