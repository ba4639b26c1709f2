use sqlx::PgPool;
use uuid::Uuid;

use crate::api::pagination::Pagination;
use crate::database::manager::DatabaseError;
use crate::database::models::academic_year::AcademicYear;

/// List academic years, newest first. With pagination the exact total count
/// is returned alongside the page for the response headers.
pub async fn list(
    pool: &PgPool,
    pagination: Option<Pagination>,
) -> Result<(Vec<AcademicYear>, Option<i64>), DatabaseError> {
    match pagination {
        Some(p) => {
            let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM academic_years")
                .fetch_one(pool)
                .await?;
            let rows = sqlx::query_as::<_, AcademicYear>(
                "SELECT * FROM academic_years ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            )
            .bind(p.limit)
            .bind(p.from())
            .fetch_all(pool)
            .await?;
            Ok((rows, Some(total)))
        }
        None => {
            let rows = sqlx::query_as::<_, AcademicYear>(
                "SELECT * FROM academic_years ORDER BY created_at DESC",
            )
            .fetch_all(pool)
            .await?;
            Ok((rows, None))
        }
    }
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<AcademicYear>, DatabaseError> {
    let row = sqlx::query_as::<_, AcademicYear>("SELECT * FROM academic_years WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Insert a year. Activating it deactivates every other year in the same
/// transaction, keeping "at most one active" intact.
pub async fn create(
    pool: &PgPool,
    name: &str,
    is_active: bool,
) -> Result<AcademicYear, DatabaseError> {
    let mut tx = pool.begin().await?;
    if is_active {
        sqlx::query("UPDATE academic_years SET is_active = false WHERE is_active = true")
            .execute(&mut *tx)
            .await?;
    }
    let row = sqlx::query_as::<_, AcademicYear>(
        "INSERT INTO academic_years (id, name, is_active) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(is_active)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    name: &str,
    is_active: bool,
) -> Result<Option<AcademicYear>, DatabaseError> {
    let mut tx = pool.begin().await?;
    if is_active {
        sqlx::query("UPDATE academic_years SET is_active = false WHERE is_active = true AND id <> $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }
    let row = sqlx::query_as::<_, AcademicYear>(
        "UPDATE academic_years SET name = $2, is_active = $3 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(name)
    .bind(is_active)
    .fetch_optional(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, DatabaseError> {
    let result = sqlx::query("DELETE FROM academic_years WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
