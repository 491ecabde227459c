//! PostgreSQL-backed store.
//!
//! Rate writes run in a transaction holding an advisory lock keyed by the
//! rate scope, so concurrent writers of one scope validate one at a time.
//! The settings row is read `FOR SHARE` in the same transaction; a settings
//! replacement waits for in-flight rate writes and is seen by later ones.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use domain::models::{
    Company, Favorite, Gateway, NewCompany, NewFavorite, NewGateway, Rate, RateFilter,
    RateSettings,
};
use domain::services::{DomainRegistry, RateRejection};

use crate::metrics::record_pool_metrics;
use crate::repositories::{
    CompanyRepository, FavoriteRepository, GatewayRepository, RateRepository,
    RateSettingsRepository,
};
use crate::store::{EntityStore, RateGuard, RateWrite, RateWriteContext, StoreError};

const FOREIGN_KEY_VIOLATION: &str = "23503";

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION),
        _ => false,
    }
}

/// Store backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    companies: CompanyRepository,
    gateways: GatewayRepository,
    rates: RateRepository,
    settings: RateSettingsRepository,
    favorites: FavoriteRepository,
}

impl PgStore {
    /// Wrap a migrated pool, inserting default settings on first use.
    pub async fn init(pool: PgPool) -> Result<Self, StoreError> {
        let store = Self {
            companies: CompanyRepository::new(pool.clone()),
            gateways: GatewayRepository::new(pool.clone()),
            rates: RateRepository::new(pool.clone()),
            settings: RateSettingsRepository::new(pool.clone()),
            favorites: FavoriteRepository::new(pool.clone()),
            pool,
        };

        if store.settings.insert_if_missing(&RateSettings::default()).await? {
            info!("Inserted default rate settings");
        }
        Ok(store)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        record_pool_metrics(&self.pool);
        Ok(())
    }

    async fn list_companies(&self) -> Result<Vec<Company>, StoreError> {
        let entities = self.companies.list().await?;
        Ok(entities.into_iter().map(Company::from).collect())
    }

    async fn get_company(&self, id: i64) -> Result<Option<Company>, StoreError> {
        Ok(self.companies.find_by_id(id).await?.map(Company::from))
    }

    async fn create_company(&self, company: NewCompany) -> Result<Company, StoreError> {
        Ok(self.companies.create(&company).await?.into())
    }

    async fn update_company(
        &self,
        id: i64,
        company: NewCompany,
    ) -> Result<Option<Company>, StoreError> {
        Ok(self.companies.update(id, &company).await?.map(Company::from))
    }

    async fn delete_company(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.companies.delete(id).await?)
    }

    async fn list_gateways(&self, company_id: Option<i64>) -> Result<Vec<Gateway>, StoreError> {
        let entities = self.gateways.list(company_id).await?;
        Ok(entities.into_iter().map(Gateway::from).collect())
    }

    async fn get_gateway(&self, id: i64) -> Result<Option<Gateway>, StoreError> {
        Ok(self.gateways.find_by_id(id).await?.map(Gateway::from))
    }

    async fn create_gateway(&self, gateway: NewGateway) -> Result<Gateway, StoreError> {
        match self.gateways.create(&gateway).await {
            Ok(entity) => Ok(entity.into()),
            Err(e) if is_foreign_key_violation(&e) => Err(StoreError::MissingReference("company")),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_gateway(
        &self,
        id: i64,
        gateway: NewGateway,
    ) -> Result<Option<Gateway>, StoreError> {
        match self.gateways.update(id, &gateway).await {
            Ok(entity) => Ok(entity.map(Gateway::from)),
            Err(e) if is_foreign_key_violation(&e) => Err(StoreError::MissingReference("company")),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_gateway(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.gateways.delete(id).await?)
    }

    async fn list_rates(&self, filter: &RateFilter) -> Result<Vec<Rate>, StoreError> {
        let entities = self.rates.list(filter).await?;
        Ok(entities.into_iter().map(Rate::from).collect())
    }

    async fn get_rate(&self, id: i64) -> Result<Option<Rate>, StoreError> {
        Ok(self.rates.find_by_id(id).await?.map(Rate::from))
    }

    async fn write_rate(&self, write: RateWrite, guard: RateGuard<'_>) -> Result<Rate, StoreError> {
        let rate_id = write.rate_id();
        let candidate = write.candidate();
        let scope = candidate.scope();

        let mut tx = self.pool.begin().await?;
        RateRepository::lock_scope(&mut *tx, &scope).await?;

        if let Some(id) = rate_id {
            if !RateRepository::exists_for_update(&mut *tx, id).await? {
                return Err(StoreError::NotFound("rate"));
            }
        }

        let gateway = GatewayRepository::find_for_share(&mut *tx, candidate.gateway_id)
            .await?
            .map(Gateway::from);
        let settings: RateSettings = RateSettingsRepository::find_for_share(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound("rate settings"))?
            .into();
        let registry = DomainRegistry::from_settings(settings);
        let scope_rates: Vec<Rate> = RateRepository::list_scope(&mut *tx, &scope)
            .await?
            .into_iter()
            .map(Rate::from)
            .collect();

        guard(&RateWriteContext {
            candidate,
            rate_id,
            gateway: gateway.as_ref(),
            registry: &registry,
            scope_rates: &scope_rates,
        })?;

        let written = match rate_id {
            Some(id) => RateRepository::replace(&mut *tx, id, candidate).await,
            None => RateRepository::insert(&mut *tx, candidate).await,
        };
        let entity = match written {
            Ok(entity) => entity,
            Err(e) if is_foreign_key_violation(&e) => {
                return Err(RateRejection::UnknownGateway(candidate.gateway_id).into())
            }
            Err(e) => return Err(e.into()),
        };

        tx.commit().await?;
        Ok(entity.into())
    }

    async fn delete_rate(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.rates.delete(id).await?)
    }

    async fn get_settings(&self) -> Result<RateSettings, StoreError> {
        match self.settings.get().await? {
            Some(entity) => Ok(entity.into()),
            None => Err(StoreError::NotFound("rate settings")),
        }
    }

    async fn replace_settings(&self, settings: RateSettings) -> Result<RateSettings, StoreError> {
        Ok(self.settings.replace(&settings).await?.into())
    }

    async fn list_favorites(&self) -> Result<Vec<Favorite>, StoreError> {
        let entities = self.favorites.list().await?;
        Ok(entities.into_iter().map(Favorite::from).collect())
    }

    async fn get_favorite(&self, id: i64) -> Result<Option<Favorite>, StoreError> {
        Ok(self.favorites.find_by_id(id).await?.map(Favorite::from))
    }

    async fn create_favorite(&self, favorite: NewFavorite) -> Result<Favorite, StoreError> {
        Ok(self.favorites.create(&favorite).await?.into())
    }

    async fn delete_favorite(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.favorites.delete(id).await?)
    }
}
