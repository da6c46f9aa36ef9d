pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashSet;
use uuid::Uuid;

use crate::models::{Answer, Field, FormRecord, FormResponse, PublishedForm};

#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    NotFound(String),
    Persistence(String),
    Busy(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(msg) => write!(f, "{msg}"),
            StoreError::Persistence(msg) => write!(f, "{msg}"),
            StoreError::Busy(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("Form not found".to_string()),
            other => StoreError::Persistence(other.to_string()),
        }
    }
}

/// Primitive operations over the `forms`, `form_fields` and `form_responses` tables.
#[async_trait]
pub trait Tables: Send + Sync {
    /// Insert or update the form row by id, refreshing `updated_at`.
    async fn upsert_form(&self, id: Uuid, name: &str) -> Result<FormRecord, StoreError>;
    async fn find_form(&self, id: Uuid) -> Result<Option<FormRecord>, StoreError>;
    async fn delete_fields(&self, form_id: Uuid) -> Result<u64, StoreError>;
    /// Insert fields with `position` taken from their index in `fields`.
    async fn insert_fields(&self, form_id: Uuid, fields: &[Field]) -> Result<Vec<Field>, StoreError>;
    /// Fields of a form ordered by position.
    async fn list_fields(&self, form_id: Uuid) -> Result<Vec<Field>, StoreError>;
    async fn insert_response(
        &self,
        id: Uuid,
        form_id: Uuid,
        answers: &[Answer],
    ) -> Result<FormResponse, StoreError>;
}

/// Domain-level persistence: saving and fetching forms, saving responses.
pub struct PersistenceClient {
    tables: Arc<dyn Tables>,
    saving: DashSet<Uuid>,
}

impl PersistenceClient {
    pub fn new(tables: Arc<dyn Tables>) -> Self {
        Self {
            tables,
            saving: DashSet::new(),
        }
    }

    /// Replace the stored form and its whole field set.
    ///
    /// Runs as separate writes: upsert the form row, delete its fields, insert the new
    /// fields. A failure part way leaves the stored field set missing or stale, so
    /// callers must retry the full call.
    pub async fn save_form(
        &self,
        form: &FormRecord,
        fields: &[Field],
    ) -> Result<PublishedForm, StoreError> {
        let _guard = InFlight::acquire(&self.saving, form.id)?;

        let saved = self.tables.upsert_form(form.id, &form.name).await.map_err(|e| {
            tracing::warn!(form_id = %form.id, "Form upsert failed: {e}");
            e
        })?;
        tracing::debug!(form_id = %form.id, "Form row upserted");

        let removed = self.tables.delete_fields(form.id).await.map_err(|e| {
            tracing::warn!(form_id = %form.id, "Field delete failed after form upsert: {e}");
            e
        })?;
        tracing::debug!(form_id = %form.id, removed, "Old fields deleted");

        let saved_fields = if fields.is_empty() {
            Vec::new()
        } else {
            self.tables
                .insert_fields(form.id, fields)
                .await
                .map_err(|e| {
                    tracing::warn!(
                        form_id = %form.id,
                        "Field insert failed, stored form has no fields: {e}"
                    );
                    e
                })?
        };
        tracing::debug!(form_id = %form.id, count = saved_fields.len(), "Fields inserted");

        Ok(PublishedForm {
            form: saved,
            fields: saved_fields,
        })
    }

    pub async fn get_form(&self, id: Uuid) -> Result<PublishedForm, StoreError> {
        let form = self
            .tables
            .find_form(id)
            .await?
            .ok_or_else(|| StoreError::NotFound("Form not found".to_string()))?;

        let fields = self.tables.list_fields(id).await?;

        Ok(PublishedForm { form, fields })
    }

    pub async fn save_response(
        &self,
        form_id: Uuid,
        answers: &[Answer],
    ) -> Result<FormResponse, StoreError> {
        let response = self
            .tables
            .insert_response(Uuid::now_v7(), form_id, answers)
            .await
            .map_err(|e| {
                tracing::warn!(%form_id, "Response insert failed: {e}");
                e
            })?;
        tracing::info!(%form_id, response_id = %response.id, "Response stored");
        Ok(response)
    }
}

/// Marks a form id as being saved until dropped.
struct InFlight<'a> {
    set: &'a DashSet<Uuid>,
    id: Uuid,
}

impl<'a> InFlight<'a> {
    fn acquire(set: &'a DashSet<Uuid>, id: Uuid) -> Result<Self, StoreError> {
        if !set.insert(id) {
            return Err(StoreError::Busy(
                "This form is already being saved".to_string(),
            ));
        }
        Ok(Self { set, id })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set.remove(&self.id);
    }
}
