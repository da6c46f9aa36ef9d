use async_trait::async_trait;
use chrono::Utc;
use dashmap::{DashMap, DashSet};
use uuid::Uuid;

use crate::models::{Answer, Field, FormRecord, FormResponse};

use super::{StoreError, Tables};

/// A primitive table operation, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    UpsertForm,
    FindForm,
    DeleteFields,
    InsertFields,
    ListFields,
    InsertResponse,
}

/// Process-local tables. Used with `FORMWRIGHT_STORAGE=memory` and in tests.
pub struct MemoryTables {
    forms: DashMap<Uuid, FormRecord>,
    /// form_id -> fields in position order
    fields: DashMap<Uuid, Vec<Field>>,
    responses: DashMap<Uuid, FormResponse>,
    failing: DashSet<Operation>,
}

impl MemoryTables {
    pub fn new() -> Self {
        Self {
            forms: DashMap::new(),
            fields: DashMap::new(),
            responses: DashMap::new(),
            failing: DashSet::new(),
        }
    }

    /// Make every subsequent call of `op` fail until `clear_failures` is called.
    pub fn fail_on(&self, op: Operation) {
        self.failing.insert(op);
    }

    pub fn clear_failures(&self) {
        self.failing.clear();
    }

    /// Stored responses for a form, oldest first.
    pub fn responses_for(&self, form_id: Uuid) -> Vec<FormResponse> {
        let mut responses: Vec<FormResponse> = self
            .responses
            .iter()
            .filter(|r| r.form_id == form_id)
            .map(|r| r.value().clone())
            .collect();
        responses.sort_by_key(|r| r.created_at);
        responses
    }

    fn check(&self, op: Operation) -> Result<(), StoreError> {
        if self.failing.contains(&op) {
            return Err(StoreError::Persistence(format!("{op:?} failed")));
        }
        Ok(())
    }
}

impl Default for MemoryTables {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tables for MemoryTables {
    async fn upsert_form(&self, id: Uuid, name: &str) -> Result<FormRecord, StoreError> {
        self.check(Operation::UpsertForm)?;
        let now = Utc::now();
        let mut entry = self.forms.entry(id).or_insert_with(|| FormRecord {
            id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        });
        entry.name = name.to_string();
        entry.updated_at = now;
        Ok(entry.value().clone())
    }

    async fn find_form(&self, id: Uuid) -> Result<Option<FormRecord>, StoreError> {
        self.check(Operation::FindForm)?;
        Ok(self.forms.get(&id).map(|f| f.value().clone()))
    }

    async fn delete_fields(&self, form_id: Uuid) -> Result<u64, StoreError> {
        self.check(Operation::DeleteFields)?;
        Ok(self
            .fields
            .remove(&form_id)
            .map(|(_, fields)| fields.len() as u64)
            .unwrap_or(0))
    }

    async fn insert_fields(&self, form_id: Uuid, fields: &[Field]) -> Result<Vec<Field>, StoreError> {
        self.check(Operation::InsertFields)?;
        if !self.forms.contains_key(&form_id) {
            return Err(StoreError::Persistence(format!(
                "Form {form_id} does not exist"
            )));
        }

        let mut stored = self.fields.entry(form_id).or_default();
        for (i, field) in fields.iter().enumerate() {
            let duplicate = stored.iter().any(|f| f.id == field.id)
                || fields[..i].iter().any(|f| f.id == field.id);
            if duplicate {
                return Err(StoreError::Persistence(format!(
                    "Duplicate field id {}",
                    field.id
                )));
            }
        }
        stored.extend(fields.iter().cloned());
        Ok(fields.to_vec())
    }

    async fn list_fields(&self, form_id: Uuid) -> Result<Vec<Field>, StoreError> {
        self.check(Operation::ListFields)?;
        Ok(self
            .fields
            .get(&form_id)
            .map(|f| f.value().clone())
            .unwrap_or_default())
    }

    async fn insert_response(
        &self,
        id: Uuid,
        form_id: Uuid,
        answers: &[Answer],
    ) -> Result<FormResponse, StoreError> {
        self.check(Operation::InsertResponse)?;
        if !self.forms.contains_key(&form_id) {
            return Err(StoreError::NotFound("Form not found".to_string()));
        }

        let response = FormResponse {
            id,
            form_id,
            answers: answers.to_vec(),
            created_at: Utc::now(),
        };
        self.responses.insert(id, response.clone());
        Ok(response)
    }
}
