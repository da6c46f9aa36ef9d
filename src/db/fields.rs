use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{Field, FieldKind};

#[derive(Debug, sqlx::FromRow)]
pub struct FieldRow {
    pub id: Uuid,
    pub form_id: Uuid,
    pub position: i32,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub label: String,
    pub required: bool,
    pub options: Option<serde_json::Value>,
}

impl FieldRow {
    pub fn into_field(self) -> Result<Field, String> {
        let kind: FieldKind = self.kind.parse()?;
        let options = match self.options {
            Some(value) => Some(
                serde_json::from_value::<Vec<String>>(value)
                    .map_err(|e| format!("Invalid options for field {}: {e}", self.id))?,
            ),
            None => None,
        };
        Ok(Field {
            id: self.id,
            kind,
            label: self.label,
            required: self.required,
            options,
        })
    }
}

pub async fn delete_by_form(pool: &PgPool, form_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM form_fields WHERE form_id = $1")
        .bind(form_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn insert_many(
    pool: &PgPool,
    form_id: Uuid,
    fields: &[Field],
) -> Result<Vec<FieldRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "INSERT INTO form_fields (id, form_id, position, type, label, required, options) ",
    );
    builder.push_values(fields.iter().enumerate(), |mut row, (position, field)| {
        row.push_bind(field.id)
            .push_bind(form_id)
            .push_bind(position as i32)
            .push_bind(field.kind.as_str())
            .push_bind(field.label.clone())
            .push_bind(field.required)
            .push_bind(field.options.as_ref().map(|o| serde_json::json!(o)));
    });
    builder.push(" RETURNING *");

    let mut rows = builder
        .build_query_as::<FieldRow>()
        .fetch_all(pool)
        .await?;
    rows.sort_by_key(|r| r.position);
    Ok(rows)
}

pub async fn list_by_form(pool: &PgPool, form_id: Uuid) -> Result<Vec<FieldRow>, sqlx::Error> {
    sqlx::query_as::<_, FieldRow>(
        "SELECT * FROM form_fields WHERE form_id = $1 ORDER BY position ASC",
    )
    .bind(form_id)
    .fetch_all(pool)
    .await
}
