//! A template backend for a basic web application.
//!
//! Exposes CRUD and search endpoints over a single item resource owned by a
//! user, seeds demo data at startup, and documents itself via OpenAPI.

pub mod app;
pub mod feature;
pub mod infra;
