use sqlx::PgPool;
use uuid::Uuid;

use crate::api::pagination::Pagination;
use crate::database::manager::DatabaseError;
use crate::database::models::student::Student;

pub async fn list(
    pool: &PgPool,
    pagination: Option<Pagination>,
) -> Result<(Vec<Student>, Option<i64>), DatabaseError> {
    match pagination {
        Some(p) => {
            let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students")
                .fetch_one(pool)
                .await?;
            let rows = sqlx::query_as::<_, Student>(
                "SELECT * FROM students ORDER BY name LIMIT $1 OFFSET $2",
            )
            .bind(p.limit)
            .bind(p.from())
            .fetch_all(pool)
            .await?;
            Ok((rows, Some(total)))
        }
        None => {
            let rows = sqlx::query_as::<_, Student>("SELECT * FROM students ORDER BY name")
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
) -> Result<Vec<Student>, DatabaseError> {
    let rows = sqlx::query_as::<_, Student>(
        "SELECT * FROM students ORDER BY name LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Student>, DatabaseError> {
    let row = sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(
    pool: &PgPool,
    nis: &str,
    name: &str,
    class_name: &str,
    academic_year_id: Uuid,
) -> Result<Student, DatabaseError> {
    let row = sqlx::query_as::<_, Student>(
        "INSERT INTO students (id, nis, name, class_name, academic_year_id) \
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(nis)
    .bind(name)
    .bind(class_name)
    .bind(academic_year_id)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    nis: &str,
    name: &str,
    class_name: &str,
    academic_year_id: Uuid,
) -> Result<Option<Student>, DatabaseError> {
    let row = sqlx::query_as::<_, Student>(
        "UPDATE students SET nis = $2, name = $3, class_name = $4, academic_year_id = $5 \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(nis)
    .bind(name)
    .bind(class_name)
    .bind(academic_year_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, DatabaseError> {
    let result = sqlx::query("DELETE FROM students WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
