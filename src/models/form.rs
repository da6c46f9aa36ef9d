use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Field;

/// A form being edited locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    pub id: Uuid,
    pub name: String,
    pub fields: Vec<Field>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Form {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            fields: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: FormPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(fields) = patch.fields {
            self.fields = fields;
        }
        self.updated_at = Utc::now();
    }

    pub fn record(&self) -> FormRecord {
        FormRecord {
            id: self.id,
            name: self.name.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<Field>>,
}

/// A row of the `forms` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct FormRecord {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored form merged with its fields in presentation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedForm {
    #[serde(flatten)]
    pub form: FormRecord,
    pub fields: Vec<Field>,
}
