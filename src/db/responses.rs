use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Answer;

#[derive(Debug, sqlx::FromRow)]
pub struct ResponseRow {
    pub id: Uuid,
    pub form_id: Uuid,
    pub answers: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

pub async fn create(
    pool: &PgPool,
    id: Uuid,
    form_id: Uuid,
    answers: &[Answer],
) -> Result<ResponseRow, sqlx::Error> {
    let answers = serde_json::to_value(answers)
        .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

    sqlx::query_as::<_, ResponseRow>(
        "INSERT INTO form_responses (id, form_id, answers) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(id)
    .bind(form_id)
    .bind(answers)
    .fetch_one(pool)
    .await
}
