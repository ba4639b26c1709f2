use sqlx::PgPool;
use uuid::Uuid;

use crate::api::pagination::Pagination;
use crate::database::manager::DatabaseError;
use crate::database::models::teacher::Teacher;

pub async fn list(
    pool: &PgPool,
    pagination: Option<Pagination>,
) -> Result<(Vec<Teacher>, Option<i64>), DatabaseError> {
    match pagination {
        Some(p) => {
            let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM teachers")
                .fetch_one(pool)
                .await?;
            let rows = sqlx::query_as::<_, Teacher>(
                "SELECT * FROM teachers ORDER BY name LIMIT $1 OFFSET $2",
            )
            .bind(p.limit)
            .bind(p.from())
            .fetch_all(pool)
            .await?;
            Ok((rows, Some(total)))
        }
        None => {
            let rows = sqlx::query_as::<_, Teacher>("SELECT * FROM teachers ORDER BY name")
                .fetch_all(pool)
                .await?;
            Ok((rows, None))
        }
    }
}

/// Legacy window for the external read API.
pub async fn list_range(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<Teacher>, DatabaseError> {
    let rows = sqlx::query_as::<_, Teacher>(
        "SELECT * FROM teachers ORDER BY name LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Teacher>, DatabaseError> {
    let row = sqlx::query_as::<_, Teacher>("SELECT * FROM teachers WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    nip: &str,
    name: &str,
    subject: Option<&str>,
) -> Result<Teacher, DatabaseError> {
    let row = sqlx::query_as::<_, Teacher>(
        "INSERT INTO teachers (id, user_id, nip, name, subject) \
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(nip)
    .bind(name)
    .bind(subject)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    nip: &str,
    name: &str,
    subject: Option<&str>,
) -> Result<Option<Teacher>, DatabaseError> {
    let row = sqlx::query_as::<_, Teacher>(
        "UPDATE teachers SET nip = $2, name = $3, subject = $4 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(nip)
    .bind(name)
    .bind(subject)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, DatabaseError> {
    let result = sqlx::query("DELETE FROM teachers WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
