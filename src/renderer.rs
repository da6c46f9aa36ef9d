use std::collections::HashMap;

use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Answer, Field, FormResponse, PublishedForm};
use crate::persistence::PersistenceClient;

#[derive(Debug, Clone, PartialEq)]
pub enum RendererState {
    Loading,
    Error(AppError),
    Active,
    Submitted,
}

/// Fill-out controller: steps a respondent through a published form one question at
/// a time and submits the collected answers.
#[derive(Debug, Clone)]
pub struct FormRenderer {
    form_id: Uuid,
    state: RendererState,
    form: Option<PublishedForm>,
    index: usize,
    answers: HashMap<Uuid, String>,
    error: Option<String>,
}

impl FormRenderer {
    pub fn new(form_id: Uuid) -> Self {
        Self {
            form_id,
            state: RendererState::Loading,
            form: None,
            index: 0,
            answers: HashMap::new(),
            error: None,
        }
    }

    /// Fetch the form and start at the first question.
    pub async fn load(&mut self, client: &PersistenceClient) {
        match client.get_form(self.form_id).await {
            Ok(form) => {
                tracing::debug!(form_id = %self.form_id, fields = form.fields.len(), "Form loaded");
                self.form = Some(form);
                self.index = 0;
                self.state = RendererState::Active;
            }
            Err(e) => {
                tracing::debug!(form_id = %self.form_id, "Form load failed: {e}");
                self.state = RendererState::Error(AppError::from(e));
            }
        }
    }

    pub fn form_id(&self) -> Uuid {
        self.form_id
    }

    pub fn state(&self) -> &RendererState {
        &self.state
    }

    pub fn form(&self) -> Option<&PublishedForm> {
        self.form.as_ref()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.fields().len()
    }

    /// Message from the last failed submit, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn current_field(&self) -> Option<&Field> {
        self.fields().get(self.index)
    }

    pub fn current_answer(&self) -> Option<&str> {
        self.current_field().and_then(|f| self.answer_for(f.id))
    }

    pub fn answer_for(&self, field_id: Uuid) -> Option<&str> {
        self.answers.get(&field_id).map(String::as_str)
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    /// True on the final question. A form without questions counts as being on it.
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.total()
    }

    pub fn next(&mut self) {
        if self.state == RendererState::Active && !self.is_last() {
            self.index += 1;
            self.error = None;
        }
    }

    pub fn previous(&mut self) {
        if self.state == RendererState::Active && !self.is_first() {
            self.index -= 1;
            self.error = None;
        }
    }

    pub fn set_answer(&mut self, value: impl Into<String>) -> Result<(), AppError> {
        self.ensure_active()?;
        let field_id = self
            .current_field()
            .map(|f| f.id)
            .ok_or_else(|| AppError::BadRequest("This form has no questions".to_string()))?;
        self.answers.insert(field_id, value.into());
        Ok(())
    }

    /// Answers in field presentation order. Unanswered fields are left out.
    pub fn collected_answers(&self) -> Vec<Answer> {
        self.fields()
            .iter()
            .filter_map(|field| {
                self.answers.get(&field.id).map(|value| Answer {
                    field_id: field.id,
                    value: value.clone(),
                })
            })
            .collect()
    }

    pub async fn submit(&mut self, client: &PersistenceClient) -> Result<FormResponse, AppError> {
        self.ensure_active()?;
        if !self.is_last() {
            return Err(AppError::BadRequest(
                "Submit is only available on the last question".to_string(),
            ));
        }

        let answers = self.collected_answers();
        match client.save_response(self.form_id, &answers).await {
            Ok(response) => {
                self.error = None;
                self.state = RendererState::Submitted;
                Ok(response)
            }
            Err(e) => {
                let err = AppError::from(e);
                self.error = Some(format!("Failed to submit form: {}", err.message()));
                Err(err)
            }
        }
    }

    fn fields(&self) -> &[Field] {
        self.form.as_ref().map(|f| f.fields.as_slice()).unwrap_or(&[])
    }

    fn ensure_active(&self) -> Result<(), AppError> {
        match &self.state {
            RendererState::Active => Ok(()),
            RendererState::Loading => Err(AppError::BadRequest("Form is still loading".to_string())),
            RendererState::Error(err) => Err(err.clone()),
            RendererState::Submitted => {
                Err(AppError::BadRequest("Form has already been submitted".to_string()))
            }
        }
    }
}
