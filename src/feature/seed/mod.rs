//! The demo data seeding feature.

pub mod seed_loader;
