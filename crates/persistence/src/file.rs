//! Embedded single-file store.
//!
//! Keeps the catalogue in memory and rewrites a JSON snapshot after every
//! mutation. A mutation is applied to a copy of the state and only becomes
//! visible once its snapshot is on disk.

use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use domain::models::{
    Company, Favorite, Gateway, NewCompany, NewFavorite, NewGateway, Rate, RateFilter,
    RateSettings,
};

use crate::memory::CatalogState;
use crate::metrics::record_snapshot_write;
use crate::store::{EntityStore, RateGuard, RateWrite, StoreError};

/// Store persisting to a JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    state: RwLock<CatalogState>,
}

impl FileStore {
    /// Open the store at `path`, creating it with default settings when the
    /// file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let state: CatalogState = serde_json::from_slice(&bytes)?;
                info!(
                    path = %path.display(),
                    companies = state.companies.len(),
                    gateways = state.gateways.len(),
                    rates = state.rates.len(),
                    "Loaded rate catalogue from file"
                );
                state
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let state = CatalogState::default();
                write_snapshot(&path, &state).await?;
                info!(path = %path.display(), "Created new rate catalogue file");
                state
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn mutate<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut CatalogState) -> Result<T, StoreError> + Send,
        T: Send,
    {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        let output = op(&mut next)?;
        write_snapshot(&self.path, &next).await?;
        *state = next;
        Ok(output)
    }
}

/// Write `state` next to `path`, then rename over it.
async fn write_snapshot(path: &Path, state: &CatalogState) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let start = Instant::now();
    let bytes = serde_json::to_vec_pretty(state)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, &bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    record_snapshot_write(bytes.len(), start.elapsed().as_secs_f64());
    debug!(path = %path.display(), bytes = bytes.len(), "Wrote catalogue snapshot");
    Ok(())
}

#[async_trait]
impl EntityStore for FileStore {
    async fn ping(&self) -> Result<(), StoreError> {
        tokio::fs::metadata(&self.path).await?;
        Ok(())
    }

    async fn list_companies(&self) -> Result<Vec<Company>, StoreError> {
        Ok(self.state.read().await.companies.values().cloned().collect())
    }

    async fn get_company(&self, id: i64) -> Result<Option<Company>, StoreError> {
        Ok(self.state.read().await.companies.get(&id).cloned())
    }

    async fn create_company(&self, company: NewCompany) -> Result<Company, StoreError> {
        self.mutate(|state| Ok(state.create_company(company))).await
    }

    async fn update_company(
        &self,
        id: i64,
        company: NewCompany,
    ) -> Result<Option<Company>, StoreError> {
        self.mutate(|state| Ok(state.update_company(id, company))).await
    }

    async fn delete_company(&self, id: i64) -> Result<bool, StoreError> {
        self.mutate(|state| Ok(state.delete_company(id))).await
    }

    async fn list_gateways(&self, company_id: Option<i64>) -> Result<Vec<Gateway>, StoreError> {
        Ok(self.state.read().await.list_gateways(company_id))
    }

    async fn get_gateway(&self, id: i64) -> Result<Option<Gateway>, StoreError> {
        Ok(self.state.read().await.gateways.get(&id).cloned())
    }

    async fn create_gateway(&self, gateway: NewGateway) -> Result<Gateway, StoreError> {
        self.mutate(|state| state.create_gateway(gateway)).await
    }

    async fn update_gateway(
        &self,
        id: i64,
        gateway: NewGateway,
    ) -> Result<Option<Gateway>, StoreError> {
        self.mutate(|state| state.update_gateway(id, gateway)).await
    }

    async fn delete_gateway(&self, id: i64) -> Result<bool, StoreError> {
        self.mutate(|state| Ok(state.delete_gateway(id))).await
    }

    async fn list_rates(&self, filter: &RateFilter) -> Result<Vec<Rate>, StoreError> {
        Ok(self.state.read().await.list_rates(filter))
    }

    async fn get_rate(&self, id: i64) -> Result<Option<Rate>, StoreError> {
        Ok(self.state.read().await.rates.get(&id).cloned())
    }

    async fn write_rate(&self, write: RateWrite, guard: RateGuard<'_>) -> Result<Rate, StoreError> {
        self.mutate(|state| state.write_rate(write, guard)).await
    }

    async fn delete_rate(&self, id: i64) -> Result<bool, StoreError> {
        self.mutate(|state| Ok(state.rates.remove(&id).is_some())).await
    }

    async fn get_settings(&self) -> Result<RateSettings, StoreError> {
        Ok(self.state.read().await.settings.clone())
    }

    async fn replace_settings(&self, settings: RateSettings) -> Result<RateSettings, StoreError> {
        self.mutate(|state| {
            state.settings = settings.clone();
            Ok(settings)
        })
        .await
    }

    async fn list_favorites(&self) -> Result<Vec<Favorite>, StoreError> {
        Ok(self.state.read().await.list_favorites())
    }

    async fn get_favorite(&self, id: i64) -> Result<Option<Favorite>, StoreError> {
        Ok(self.state.read().await.favorites.get(&id).cloned())
    }

    async fn create_favorite(&self, favorite: NewFavorite) -> Result<Favorite, StoreError> {
        self.mutate(|state| Ok(state.create_favorite(favorite))).await
    }

    async fn delete_favorite(&self, id: i64) -> Result<bool, StoreError> {
        self.mutate(|state| Ok(state.favorites.remove(&id).is_some())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::{EntityStatus, RateCandidate};
    use domain::services::{validate_rate, RateRejection};
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn company() -> NewCompany {
        NewCompany {
            name: "SLPE".to_string(),
            description: "SLPE Service Provider".to_string(),
            status: EntityStatus::Active,
        }
    }

    fn gateway(company_id: i64) -> NewGateway {
        NewGateway {
            name: "Payu".to_string(),
            company_id,
            pg_partner: "payu".to_string(),
            status: EntityStatus::Active,
        }
    }

    fn candidate(gateway_id: i64) -> RateCandidate {
        RateCandidate {
            gateway_id,
            card_type: "CC".to_string(),
            card_issuer: "others".to_string(),
            category: "general".to_string(),
            commission: dec!(1.2),
            surcharge: dec!(0),
            min_amount: dec!(10),
            max_amount: dec!(100000),
        }
    }

    async fn write(store: &FileStore, candidate: RateCandidate) -> Result<Rate, StoreError> {
        store
            .write_rate(RateWrite::Create(candidate), &|ctx| {
                validate_rate(ctx.validation_input())
            })
            .await
    }

    #[tokio::test]
    async fn test_open_creates_file_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("catalogue.json");

        let store = FileStore::open(&path).await.unwrap();
        assert!(path.exists());
        assert!(store.ping().await.is_ok());
        assert_eq!(store.get_settings().await.unwrap(), RateSettings::default());
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalogue.json");

        {
            let store = FileStore::open(&path).await.unwrap();
            let company = store.create_company(company()).await.unwrap();
            let gateway = store.create_gateway(gateway(company.id)).await.unwrap();
            write(&store, candidate(gateway.id)).await.unwrap();
        }

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.list_companies().await.unwrap().len(), 1);
        assert_eq!(store.list_rates(&RateFilter::default()).await.unwrap().len(), 1);

        // Sequences are persisted too.
        let second = store.create_company(company()).await.unwrap();
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_rejected_write_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalogue.json");

        let store = FileStore::open(&path).await.unwrap();
        let company = store.create_company(company()).await.unwrap();
        let gateway = store.create_gateway(gateway(company.id)).await.unwrap();
        write(&store, candidate(gateway.id)).await.unwrap();
        let before = tokio::fs::read(&path).await.unwrap();

        let result = write(&store, candidate(gateway.id)).await;
        assert!(matches!(
            result,
            Err(StoreError::Rejected(RateRejection::OverlappingRange(1)))
        ));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalogue.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let result = FileStore::open(&path).await;
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_settings_replacement_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalogue.json");

        let settings = RateSettings {
            categories: vec!["travel".to_string()],
            card_types: vec!["CC".to_string()],
            card_issuers: vec!["others".to_string()],
        };
        {
            let store = FileStore::open(&path).await.unwrap();
            store.replace_settings(settings.clone()).await.unwrap();
        }

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.get_settings().await.unwrap(), settings);
    }
}
