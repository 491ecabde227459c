//! Company entity (database row mapping).

use domain::models::{Company, EntityStatus};
use sqlx::FromRow;

/// Database enum for entity_status that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "entity_status", rename_all = "lowercase")]
pub enum EntityStatusDb {
    Active,
    Inactive,
}

impl From<EntityStatusDb> for EntityStatus {
    fn from(db_status: EntityStatusDb) -> Self {
        match db_status {
            EntityStatusDb::Active => EntityStatus::Active,
            EntityStatusDb::Inactive => EntityStatus::Inactive,
        }
    }
}

impl From<EntityStatus> for EntityStatusDb {
    fn from(status: EntityStatus) -> Self {
        match status {
            EntityStatus::Active => EntityStatusDb::Active,
            EntityStatus::Inactive => EntityStatusDb::Inactive,
        }
    }
}

/// Database row mapping for the companies table.
#[derive(Debug, Clone, FromRow)]
pub struct CompanyEntity {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub status: EntityStatusDb,
}

impl From<CompanyEntity> for Company {
    fn from(entity: CompanyEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            status: entity.status.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(EntityStatus::from(EntityStatusDb::Inactive), EntityStatus::Inactive);
        assert_eq!(EntityStatusDb::from(EntityStatus::Active), EntityStatusDb::Active);
    }

    #[test]
    fn test_company_entity_into_domain() {
        let company: Company = CompanyEntity {
            id: 1,
            name: "SLPE".to_string(),
            description: "SLPE Service Provider".to_string(),
            status: EntityStatusDb::Active,
        }
        .into();
        assert_eq!(company.id, 1);
        assert!(company.status.is_active());
    }
}
