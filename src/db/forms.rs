use sqlx::PgPool;
use uuid::Uuid;

use crate::models::FormRecord;

pub async fn upsert(pool: &PgPool, id: Uuid, name: &str) -> Result<FormRecord, sqlx::Error> {
    sqlx::query_as::<_, FormRecord>(
        "INSERT INTO forms (id, name) VALUES ($1, $2)
         ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, updated_at = now()
         RETURNING *",
    )
    .bind(id)
    .bind(name)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<FormRecord>, sqlx::Error> {
    sqlx::query_as::<_, FormRecord>("SELECT * FROM forms WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}
