//! Gateway repository for database operations.

use domain::models::NewGateway;
use sqlx::{PgConnection, PgPool};

use crate::entities::{EntityStatusDb, GatewayEntity};
use crate::metrics::QueryTimer;

/// Repository for gateway-related database operations.
#[derive(Clone)]
pub struct GatewayRepository {
    pool: PgPool,
}

impl GatewayRepository {
    /// Creates a new GatewayRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List gateways, optionally only those of one company.
    pub async fn list(&self, company_id: Option<i64>) -> Result<Vec<GatewayEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_gateways");
        let result = sqlx::query_as::<_, GatewayEntity>(
            r#"
            SELECT id, name, company_id, pg_partner, status
            FROM gateways
            WHERE ($1::BIGINT IS NULL OR company_id = $1)
            ORDER BY id
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<GatewayEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_gateway_by_id");
        let result = sqlx::query_as::<_, GatewayEntity>(
            r#"
            SELECT id, name, company_id, pg_partner, status
            FROM gateways
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a gateway inside a transaction, locking its row against deletion.
    pub async fn find_for_share(
        conn: &mut PgConnection,
        id: i64,
    ) -> Result<Option<GatewayEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_gateway_for_share");
        let result = sqlx::query_as::<_, GatewayEntity>(
            r#"
            SELECT id, name, company_id, pg_partner, status
            FROM gateways
            WHERE id = $1
            FOR SHARE
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await;
        timer.record();
        result
    }

    pub async fn create(&self, gateway: &NewGateway) -> Result<GatewayEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_gateway");
        let result = sqlx::query_as::<_, GatewayEntity>(
            r#"
            INSERT INTO gateways (name, company_id, pg_partner, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, company_id, pg_partner, status
            "#,
        )
        .bind(&gateway.name)
        .bind(gateway.company_id)
        .bind(&gateway.pg_partner)
        .bind(EntityStatusDb::from(gateway.status))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(
        &self,
        id: i64,
        gateway: &NewGateway,
    ) -> Result<Option<GatewayEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_gateway");
        let result = sqlx::query_as::<_, GatewayEntity>(
            r#"
            UPDATE gateways
            SET name = $2, company_id = $3, pg_partner = $4, status = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, company_id, pg_partner, status
            "#,
        )
        .bind(id)
        .bind(&gateway.name)
        .bind(gateway.company_id)
        .bind(&gateway.pg_partner)
        .bind(EntityStatusDb::from(gateway.status))
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a gateway; its rates go with it via ON DELETE CASCADE.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_gateway");
        let result = sqlx::query("DELETE FROM gateways WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}
