use serde::Serialize;
use uuid::Uuid;

use crate::drafts::DraftStore;
use crate::error::AppError;
use crate::models::{Field, FieldPatch, FormPatch, PublishedForm};
use crate::persistence::PersistenceClient;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum BuilderStatus {
    Editing { error: Option<String> },
    Saving,
    Saved { share_url: String },
}

/// Authoring controller for one draft.
///
/// Every edit to the working field list is mirrored into the draft store so that
/// in-progress work survives leaving the builder.
pub struct FormBuilder<'a> {
    drafts: &'a DraftStore,
    form_id: Uuid,
    name: String,
    fields: Vec<Field>,
    status: BuilderStatus,
}

impl<'a> FormBuilder<'a> {
    pub fn open(drafts: &'a DraftStore, form_id: Uuid) -> Result<Self, AppError> {
        let draft = drafts
            .get(form_id)
            .ok_or_else(|| AppError::NotFound("Form not found".to_string()))?;

        Ok(Self {
            drafts,
            form_id,
            name: draft.name,
            fields: draft.fields,
            status: BuilderStatus::Editing { error: None },
        })
    }

    pub fn form_id(&self) -> Uuid {
        self.form_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn status(&self) -> &BuilderStatus {
        &self.status
    }

    pub fn add_field(&mut self) -> &Field {
        self.fields.push(Field::new());
        self.mirror();
        &self.fields[self.fields.len() - 1]
    }

    pub fn change_field(&mut self, id: Uuid, patch: FieldPatch) -> Result<&Field, AppError> {
        let index = self.position(id)?;
        self.fields[index].apply(patch);
        self.mirror();
        Ok(&self.fields[index])
    }

    pub fn remove_field(&mut self, id: Uuid) -> Result<Field, AppError> {
        let index = self.position(id)?;
        let removed = self.fields.remove(index);
        self.mirror();
        Ok(removed)
    }

    /// Persist the draft. On failure the builder returns to editing with the error
    /// message and keeps every edit.
    pub async fn save(
        &mut self,
        client: &PersistenceClient,
        base_url: &str,
    ) -> Result<PublishedForm, AppError> {
        self.status = BuilderStatus::Saving;

        let record = self
            .drafts
            .get(self.form_id)
            .map(|draft| draft.record())
            .ok_or_else(|| AppError::NotFound("Form not found".to_string()));

        let result = match record {
            Ok(record) => client
                .save_form(&record, &self.fields)
                .await
                .map_err(AppError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(saved) => {
                let share_url = share_url(base_url, self.form_id);
                tracing::info!(form_id = %self.form_id, fields = saved.fields.len(), "Form saved");
                self.status = BuilderStatus::Saved { share_url };
                Ok(saved)
            }
            Err(e) => {
                tracing::warn!(form_id = %self.form_id, "Form save failed: {e}");
                self.status = BuilderStatus::Editing {
                    error: Some(format!("Failed to save form: {}", e.message())),
                };
                Err(e)
            }
        }
    }

    fn position(&self, id: Uuid) -> Result<usize, AppError> {
        self.fields
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| AppError::NotFound("Field not found".to_string()))
    }

    fn mirror(&self) {
        let patch = FormPatch {
            name: None,
            fields: Some(self.fields.clone()),
        };
        if self.drafts.update(self.form_id, patch).is_none() {
            tracing::warn!(form_id = %self.form_id, "Draft vanished while editing");
        }
    }
}

/// Public link where respondents fill out the form.
pub fn share_url(base_url: &str, form_id: Uuid) -> String {
    format!("{}/preview/{form_id}", base_url.trim_end_matches('/'))
}
