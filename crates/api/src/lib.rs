//! HTTP surface of the Rate Desk backend.

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
