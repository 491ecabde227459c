//! Domain layer for the Rate Desk backend.
//!
//! This crate contains:
//! - Domain models (Company, Gateway, Rate, Settings, Favorite)
//! - Rate consistency validation and rate resolution
//! - Fee computation and cross-gateway quote comparison
//! - Domain error types

pub mod models;
pub mod services;
