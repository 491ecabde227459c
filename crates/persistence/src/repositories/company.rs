//! Company repository for database operations.

use domain::models::NewCompany;
use sqlx::PgPool;

use crate::entities::{CompanyEntity, EntityStatusDb};
use crate::metrics::QueryTimer;

/// Repository for company-related database operations.
#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    /// Creates a new CompanyRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<CompanyEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_companies");
        let result = sqlx::query_as::<_, CompanyEntity>(
            r#"
            SELECT id, name, description, status
            FROM companies
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<CompanyEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_company_by_id");
        let result = sqlx::query_as::<_, CompanyEntity>(
            r#"
            SELECT id, name, description, status
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn create(&self, company: &NewCompany) -> Result<CompanyEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_company");
        let result = sqlx::query_as::<_, CompanyEntity>(
            r#"
            INSERT INTO companies (name, description, status)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, status
            "#,
        )
        .bind(&company.name)
        .bind(&company.description)
        .bind(EntityStatusDb::from(company.status))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(
        &self,
        id: i64,
        company: &NewCompany,
    ) -> Result<Option<CompanyEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_company");
        let result = sqlx::query_as::<_, CompanyEntity>(
            r#"
            UPDATE companies
            SET name = $2, description = $3, status = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, status
            "#,
        )
        .bind(id)
        .bind(&company.name)
        .bind(&company.description)
        .bind(EntityStatusDb::from(company.status))
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a company; gateways and rates go with it via ON DELETE CASCADE.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_company");
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}
