//! In-process store.
//!
//! All entities live in one [`CatalogState`] behind a single `RwLock`; rate
//! writes hold the write guard across lookup, validation and insert, so
//! writes are serializable. [`FileStore`](crate::file::FileStore) reuses the
//! same state and persists it after each mutation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use domain::models::{
    Company, Favorite, Gateway, NewCompany, NewFavorite, NewGateway, Rate, RateFilter,
    RateSettings,
};
use domain::services::DomainRegistry;

use crate::store::{EntityStore, RateGuard, RateWrite, RateWriteContext, StoreError};

/// Last id handed out per entity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSequences {
    pub company: i64,
    pub gateway: i64,
    pub rate: i64,
    pub favorite: i64,
}

fn next_id(sequence: &mut i64) -> i64 {
    *sequence += 1;
    *sequence
}

/// The whole catalogue as plain data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogState {
    pub sequences: IdSequences,
    pub companies: BTreeMap<i64, Company>,
    pub gateways: BTreeMap<i64, Gateway>,
    pub rates: BTreeMap<i64, Rate>,
    pub settings: RateSettings,
    pub favorites: BTreeMap<i64, Favorite>,
}

impl CatalogState {
    pub fn create_company(&mut self, company: NewCompany) -> Company {
        let company = company.with_id(next_id(&mut self.sequences.company));
        self.companies.insert(company.id, company.clone());
        company
    }

    pub fn update_company(&mut self, id: i64, company: NewCompany) -> Option<Company> {
        let slot = self.companies.get_mut(&id)?;
        *slot = company.with_id(id);
        Some(slot.clone())
    }

    pub fn delete_company(&mut self, id: i64) -> bool {
        if self.companies.remove(&id).is_none() {
            return false;
        }
        let owned: Vec<i64> = self
            .gateways
            .values()
            .filter(|g| g.company_id == id)
            .map(|g| g.id)
            .collect();
        for gateway_id in owned {
            self.delete_gateway(gateway_id);
        }
        true
    }

    pub fn list_gateways(&self, company_id: Option<i64>) -> Vec<Gateway> {
        self.gateways
            .values()
            .filter(|g| company_id.map_or(true, |id| g.company_id == id))
            .cloned()
            .collect()
    }

    pub fn create_gateway(&mut self, gateway: NewGateway) -> Result<Gateway, StoreError> {
        if !self.companies.contains_key(&gateway.company_id) {
            return Err(StoreError::MissingReference("company"));
        }
        let gateway = gateway.with_id(next_id(&mut self.sequences.gateway));
        self.gateways.insert(gateway.id, gateway.clone());
        Ok(gateway)
    }

    pub fn update_gateway(
        &mut self,
        id: i64,
        gateway: NewGateway,
    ) -> Result<Option<Gateway>, StoreError> {
        if !self.gateways.contains_key(&id) {
            return Ok(None);
        }
        if !self.companies.contains_key(&gateway.company_id) {
            return Err(StoreError::MissingReference("company"));
        }
        let gateway = gateway.with_id(id);
        self.gateways.insert(id, gateway.clone());
        Ok(Some(gateway))
    }

    pub fn delete_gateway(&mut self, id: i64) -> bool {
        if self.gateways.remove(&id).is_none() {
            return false;
        }
        self.rates.retain(|_, rate| rate.gateway_id != id);
        true
    }

    pub fn list_rates(&self, filter: &RateFilter) -> Vec<Rate> {
        self.rates
            .values()
            .filter(|rate| filter.matches(rate))
            .cloned()
            .collect()
    }

    pub fn write_rate(&mut self, write: RateWrite, guard: RateGuard<'_>) -> Result<Rate, StoreError> {
        let rate_id = write.rate_id();
        if let Some(id) = rate_id {
            if !self.rates.contains_key(&id) {
                return Err(StoreError::NotFound("rate"));
            }
        }

        let candidate = write.candidate();
        let scope = candidate.scope();
        let scope_rates: Vec<Rate> = self
            .rates
            .values()
            .filter(|rate| rate.in_scope(&scope))
            .cloned()
            .collect();
        let registry = DomainRegistry::from_settings(self.settings.clone());

        guard(&RateWriteContext {
            candidate,
            rate_id,
            gateway: self.gateways.get(&candidate.gateway_id),
            registry: &registry,
            scope_rates: &scope_rates,
        })?;

        let id = match rate_id {
            Some(id) => id,
            None => next_id(&mut self.sequences.rate),
        };
        let rate = match write {
            RateWrite::Create(candidate) | RateWrite::Update { candidate, .. } => candidate.with_id(id),
        };
        self.rates.insert(id, rate.clone());
        Ok(rate)
    }

    pub fn list_favorites(&self) -> Vec<Favorite> {
        let mut favorites: Vec<Favorite> = self.favorites.values().cloned().collect();
        favorites.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        favorites
    }

    pub fn create_favorite(&mut self, favorite: NewFavorite) -> Favorite {
        let favorite = favorite.with_id(next_id(&mut self.sequences.favorite), Utc::now());
        self.favorites.insert(favorite.id, favorite.clone());
        favorite
    }
}

/// Store keeping everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<CatalogState>,
}

impl MemoryStore {
    /// Empty catalogue with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: CatalogState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_companies(&self) -> Result<Vec<Company>, StoreError> {
        Ok(self.state.read().await.companies.values().cloned().collect())
    }

    async fn get_company(&self, id: i64) -> Result<Option<Company>, StoreError> {
        Ok(self.state.read().await.companies.get(&id).cloned())
    }

    async fn create_company(&self, company: NewCompany) -> Result<Company, StoreError> {
        Ok(self.state.write().await.create_company(company))
    }

    async fn update_company(
        &self,
        id: i64,
        company: NewCompany,
    ) -> Result<Option<Company>, StoreError> {
        Ok(self.state.write().await.update_company(id, company))
    }

    async fn delete_company(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.state.write().await.delete_company(id))
    }

    async fn list_gateways(&self, company_id: Option<i64>) -> Result<Vec<Gateway>, StoreError> {
        Ok(self.state.read().await.list_gateways(company_id))
    }

    async fn get_gateway(&self, id: i64) -> Result<Option<Gateway>, StoreError> {
        Ok(self.state.read().await.gateways.get(&id).cloned())
    }

    async fn create_gateway(&self, gateway: NewGateway) -> Result<Gateway, StoreError> {
        self.state.write().await.create_gateway(gateway)
    }

    async fn update_gateway(
        &self,
        id: i64,
        gateway: NewGateway,
    ) -> Result<Option<Gateway>, StoreError> {
        self.state.write().await.update_gateway(id, gateway)
    }

    async fn delete_gateway(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.state.write().await.delete_gateway(id))
    }

    async fn list_rates(&self, filter: &RateFilter) -> Result<Vec<Rate>, StoreError> {
        Ok(self.state.read().await.list_rates(filter))
    }

    async fn get_rate(&self, id: i64) -> Result<Option<Rate>, StoreError> {
        Ok(self.state.read().await.rates.get(&id).cloned())
    }

    async fn write_rate(&self, write: RateWrite, guard: RateGuard<'_>) -> Result<Rate, StoreError> {
        self.state.write().await.write_rate(write, guard)
    }

    async fn delete_rate(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.state.write().await.rates.remove(&id).is_some())
    }

    async fn get_settings(&self) -> Result<RateSettings, StoreError> {
        Ok(self.state.read().await.settings.clone())
    }

    async fn replace_settings(&self, settings: RateSettings) -> Result<RateSettings, StoreError> {
        self.state.write().await.settings = settings.clone();
        Ok(settings)
    }

    async fn list_favorites(&self) -> Result<Vec<Favorite>, StoreError> {
        Ok(self.state.read().await.list_favorites())
    }

    async fn get_favorite(&self, id: i64) -> Result<Option<Favorite>, StoreError> {
        Ok(self.state.read().await.favorites.get(&id).cloned())
    }

    async fn create_favorite(&self, favorite: NewFavorite) -> Result<Favorite, StoreError> {
        Ok(self.state.write().await.create_favorite(favorite))
    }

    async fn delete_favorite(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.state.write().await.favorites.remove(&id).is_some())
    }
}
