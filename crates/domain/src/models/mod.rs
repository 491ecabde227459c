//! Domain models for Rate Desk.

pub mod amount_range;
pub mod company;
pub mod favorite;
pub mod gateway;
pub mod quote;
pub mod rate;
pub mod settings;

pub use amount_range::AmountRange;
pub use company::{Company, CompanyRequest, EntityStatus, NewCompany};
pub use favorite::{CreateFavoriteRequest, Favorite, NewFavorite, ALL_CATEGORIES};
pub use gateway::{Gateway, GatewayRequest, ListGatewaysQuery, NewGateway};
pub use quote::{
    GatewayQuote, IntegrityFault, QuoteComparison, ResolveRateRequest, ResolvedRateResponse,
    TransactionDescriptor,
};
pub use rate::{Rate, RateCandidate, RateFilter, RateRequest, RateScope, FALLBACK_ISSUER};
pub use settings::{RateSettings, UpdateSettingsRequest};
