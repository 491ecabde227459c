//! Repository implementations for database operations.

pub mod company;
pub mod favorite;
pub mod gateway;
pub mod rate;
pub mod rate_settings;

pub use company::CompanyRepository;
pub use favorite::FavoriteRepository;
pub use gateway::GatewayRepository;
pub use rate::RateRepository;
pub use rate_settings::RateSettingsRepository;
