//! Gateway entity (database row mapping).

use domain::models::Gateway;
use sqlx::FromRow;

use super::company::EntityStatusDb;

/// Database row mapping for the gateways table.
#[derive(Debug, Clone, FromRow)]
pub struct GatewayEntity {
    pub id: i64,
    pub name: String,
    pub company_id: i64,
    pub pg_partner: String,
    pub status: EntityStatusDb,
}

impl From<GatewayEntity> for Gateway {
    fn from(entity: GatewayEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            company_id: entity.company_id,
            pg_partner: entity.pg_partner,
            status: entity.status.into(),
        }
    }
}
