//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod company;
pub mod favorite;
pub mod gateway;
pub mod rate;
pub mod rate_settings;

pub use company::{CompanyEntity, EntityStatusDb};
pub use favorite::FavoriteEntity;
pub use gateway::GatewayEntity;
pub use rate::RateEntity;
pub use rate_settings::RateSettingsEntity;
