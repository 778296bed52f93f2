//! The feature modules.
//!
//! Each feature is laid out api → service → repository, with the api layer
//! translating between HTTP and the service, and the repository owning SQL.

pub mod info;
pub mod item;
pub mod seed;
pub mod user;
