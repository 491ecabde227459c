//! Domain services for Rate Desk.
//!
//! Services contain the catalogue rules that operate on domain models. They
//! are pure; callers supply the store snapshot they operate on.

pub mod fee;
pub mod rate_comparison;
pub mod rate_resolution;
pub mod rate_validation;
pub mod registry;

pub use fee::{compute_fee, FeeBreakdown, FeeOverflow, FeePolicy, MAX_DECIMAL_PLACES};
pub use rate_comparison::compare_quotes;
pub use rate_resolution::{resolve_rate, IssuerMatch, RateMatch, RateQuery, ResolutionError};
pub use rate_validation::{validate_rate, RateField, RateRejection, RateValidationInput};
pub use registry::DomainRegistry;
