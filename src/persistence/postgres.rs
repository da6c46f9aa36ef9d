use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::db::fields::FieldRow;
use crate::db::responses::ResponseRow;
use crate::models::{Answer, Field, FormRecord, FormResponse};

use super::{StoreError, Tables};

/// Tables backed by Postgres through sqlx.
pub struct PgTables {
    pool: PgPool,
}

impl PgTables {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_fields(rows: Vec<FieldRow>) -> Result<Vec<Field>, StoreError> {
    rows.into_iter()
        .map(|row| row.into_field().map_err(StoreError::Persistence))
        .collect()
}

fn into_response(row: ResponseRow) -> Result<FormResponse, StoreError> {
    let answers: Vec<Answer> = serde_json::from_value(row.answers)
        .map_err(|e| StoreError::Persistence(format!("Invalid stored answers: {e}")))?;
    Ok(FormResponse {
        id: row.id,
        form_id: row.form_id,
        answers,
        created_at: row.created_at,
    })
}

#[async_trait]
impl Tables for PgTables {
    async fn upsert_form(&self, id: Uuid, name: &str) -> Result<FormRecord, StoreError> {
        Ok(db::forms::upsert(&self.pool, id, name).await?)
    }

    async fn find_form(&self, id: Uuid) -> Result<Option<FormRecord>, StoreError> {
        Ok(db::forms::find_by_id(&self.pool, id).await?)
    }

    async fn delete_fields(&self, form_id: Uuid) -> Result<u64, StoreError> {
        Ok(db::fields::delete_by_form(&self.pool, form_id).await?)
    }

    async fn insert_fields(&self, form_id: Uuid, fields: &[Field]) -> Result<Vec<Field>, StoreError> {
        let rows = db::fields::insert_many(&self.pool, form_id, fields).await?;
        into_fields(rows)
    }

    async fn list_fields(&self, form_id: Uuid) -> Result<Vec<Field>, StoreError> {
        let rows = db::fields::list_by_form(&self.pool, form_id).await?;
        into_fields(rows)
    }

    async fn insert_response(
        &self,
        id: Uuid,
        form_id: Uuid,
        answers: &[Answer],
    ) -> Result<FormResponse, StoreError> {
        let row = db::responses::create(&self.pool, id, form_id, answers)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                    StoreError::NotFound("Form not found".to_string())
                }
                other => StoreError::from(other),
            })?;
        into_response(row)
    }
}
