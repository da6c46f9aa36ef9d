use dashmap::DashMap;
use uuid::Uuid;

use crate::models::{Form, FormPatch};

/// Registry of forms being edited, keyed by form id.
/// Lives for the whole process; last write wins.
pub struct DraftStore {
    forms: DashMap<Uuid, Form>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self {
            forms: DashMap::new(),
        }
    }

    /// Insert a draft. An existing draft with the same id is replaced.
    pub fn add(&self, form: Form) {
        if self.forms.insert(form.id, form).is_some() {
            tracing::debug!("Draft overwritten on add");
        }
    }

    /// Merge `patch` into the draft. Returns the updated draft, or `None` if absent.
    pub fn update(&self, id: Uuid, patch: FormPatch) -> Option<Form> {
        let mut entry = self.forms.get_mut(&id)?;
        entry.apply(patch);
        Some(entry.value().clone())
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.forms.remove(&id).is_some()
    }

    pub fn get(&self, id: Uuid) -> Option<Form> {
        self.forms.get(&id).map(|f| f.value().clone())
    }

    /// All drafts, oldest first.
    pub fn list(&self) -> Vec<Form> {
        let mut forms: Vec<Form> = self.forms.iter().map(|f| f.value().clone()).collect();
        forms.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        forms
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::new()
    }
}
