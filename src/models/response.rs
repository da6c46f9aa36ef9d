use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub field_id: Uuid,
    pub value: String,
}

/// A completed fill-out. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormResponse {
    pub id: Uuid,
    pub form_id: Uuid,
    pub answers: Vec<Answer>,
    pub created_at: DateTime<Utc>,
}
