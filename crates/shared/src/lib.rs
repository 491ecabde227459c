//! Shared utilities and common types for the Rate Desk backend.
//!
//! This crate provides validation helpers used by request payloads across
//! the domain and api crates.

pub mod validation;
