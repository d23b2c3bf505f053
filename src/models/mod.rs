//! Domain models for parsed report records and inventory assets.

pub mod asset;
pub mod record;
