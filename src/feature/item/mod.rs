//! The item feature.
//!
//! Items are the single domain resource of this application: a titled,
//! optionally described record owned by a user.

pub mod item_api;
pub mod item_repository;
pub mod item_service;
