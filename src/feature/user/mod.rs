//! The user feature.
//!
//! Only the parts of a user this application consumes: identity lookup for
//! authentication and seeding. There are no user management endpoints.

pub mod user_repository;
