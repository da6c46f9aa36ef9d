use crate::drafts::DraftStore;
use crate::error::AppError;
use crate::models::Form;

/// Drafts offered by the selector, oldest first.
pub fn list_drafts(drafts: &DraftStore) -> Vec<Form> {
    drafts.list()
}

/// Create an empty draft named `name`.
pub fn create_draft(drafts: &DraftStore, name: &str) -> Result<Form, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Form name is required".to_string()));
    }

    let form = Form::new(name);
    drafts.add(form.clone());
    tracing::info!(form_id = %form.id, "Draft created");
    Ok(form)
}
