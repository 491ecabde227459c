//! Storage abstraction shared by every backend.
//!
//! Handlers and the seeder only see `dyn EntityStore`; the backend is picked
//! at startup from configuration.

use async_trait::async_trait;
use thiserror::Error;

use domain::models::{
    Company, Favorite, Gateway, NewCompany, NewFavorite, NewGateway, Rate, RateCandidate,
    RateFilter, RateSettings,
};
use domain::services::{DomainRegistry, RateRejection, RateValidationInput};

/// Errors surfaced by a store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Rejected(#[from] RateRejection),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("referenced {0} does not exist")]
    MissingReference(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A rate create or full replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateWrite {
    Create(RateCandidate),
    Update { id: i64, candidate: RateCandidate },
}

impl RateWrite {
    pub fn candidate(&self) -> &RateCandidate {
        match self {
            RateWrite::Create(candidate) => candidate,
            RateWrite::Update { candidate, .. } => candidate,
        }
    }

    pub fn rate_id(&self) -> Option<i64> {
        match self {
            RateWrite::Create(_) => None,
            RateWrite::Update { id, .. } => Some(*id),
        }
    }
}

/// What a store hands to the write guard, read inside its isolation boundary.
#[derive(Debug, Clone, Copy)]
pub struct RateWriteContext<'a> {
    pub candidate: &'a RateCandidate,
    pub rate_id: Option<i64>,
    pub gateway: Option<&'a Gateway>,
    /// Built from the settings stored at the time of the write.
    pub registry: &'a DomainRegistry,
    /// Existing rates sharing the candidate's scope.
    pub scope_rates: &'a [Rate],
}

impl RateWriteContext<'_> {
    pub fn validation_input(&self) -> RateValidationInput<'_> {
        RateValidationInput {
            candidate: self.candidate,
            rate_id: self.rate_id,
            gateway: self.gateway,
            registry: self.registry,
            existing: self.scope_rates,
        }
    }
}

/// Check run against a rate write before it is persisted.
pub type RateGuard<'g> = &'g (dyn Fn(&RateWriteContext<'_>) -> Result<(), RateRejection> + Send + Sync);

/// Persistence for the rate catalogue.
///
/// Updates and deletes of a missing id return `None`/`false`; handlers turn
/// those into 404s.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Cheap liveness probe for health checks.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn list_companies(&self) -> Result<Vec<Company>, StoreError>;
    async fn get_company(&self, id: i64) -> Result<Option<Company>, StoreError>;
    async fn create_company(&self, company: NewCompany) -> Result<Company, StoreError>;
    async fn update_company(
        &self,
        id: i64,
        company: NewCompany,
    ) -> Result<Option<Company>, StoreError>;
    /// Removes the company with its gateways and their rates.
    async fn delete_company(&self, id: i64) -> Result<bool, StoreError>;

    async fn list_gateways(&self, company_id: Option<i64>) -> Result<Vec<Gateway>, StoreError>;
    async fn get_gateway(&self, id: i64) -> Result<Option<Gateway>, StoreError>;
    /// Fails with `MissingReference("company")` for an unknown company.
    async fn create_gateway(&self, gateway: NewGateway) -> Result<Gateway, StoreError>;
    async fn update_gateway(
        &self,
        id: i64,
        gateway: NewGateway,
    ) -> Result<Option<Gateway>, StoreError>;
    /// Removes the gateway with its rates.
    async fn delete_gateway(&self, id: i64) -> Result<bool, StoreError>;

    async fn list_rates(&self, filter: &RateFilter) -> Result<Vec<Rate>, StoreError>;
    async fn get_rate(&self, id: i64) -> Result<Option<Rate>, StoreError>;
    /// Persist a rate once `guard` accepts it.
    ///
    /// The gateway lookup, the settings and scope reads, the guard and the
    /// write happen atomically with respect to other rate writes of the same
    /// scope and to settings replacement. An update of a missing id fails
    /// with `NotFound("rate")`.
    async fn write_rate(&self, write: RateWrite, guard: RateGuard<'_>) -> Result<Rate, StoreError>;
    async fn delete_rate(&self, id: i64) -> Result<bool, StoreError>;

    async fn get_settings(&self) -> Result<RateSettings, StoreError>;
    async fn replace_settings(&self, settings: RateSettings) -> Result<RateSettings, StoreError>;

    /// Newest first.
    async fn list_favorites(&self) -> Result<Vec<Favorite>, StoreError>;
    async fn get_favorite(&self, id: i64) -> Result<Option<Favorite>, StoreError>;
    async fn create_favorite(&self, favorite: NewFavorite) -> Result<Favorite, StoreError>;
    async fn delete_favorite(&self, id: i64) -> Result<bool, StoreError>;
}
