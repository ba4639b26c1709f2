use chrono::NaiveTime;
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::pagination::Pagination;
use crate::database::manager::DatabaseError;
use crate::database::models::schedule::Schedule;

/// List schedules, optionally narrowed to one day (used by `?today=true`).
pub async fn list(
    pool: &PgPool,
    day: Option<&str>,
    pagination: Option<Pagination>,
) -> Result<(Vec<Schedule>, Option<i64>), DatabaseError> {
    match (day, pagination) {
        (Some(day), Some(p)) => {
            let total =
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM schedules WHERE day = $1")
                    .bind(day)
                    .fetch_one(pool)
                    .await?;
            let rows = sqlx::query_as::<_, Schedule>(
                "SELECT * FROM schedules WHERE day = $1 ORDER BY start_time LIMIT $2 OFFSET $3",
            )
            .bind(day)
            .bind(p.limit)
            .bind(p.from())
            .fetch_all(pool)
            .await?;
            Ok((rows, Some(total)))
        }
        (Some(day), None) => {
            let rows = sqlx::query_as::<_, Schedule>(
                "SELECT * FROM schedules WHERE day = $1 ORDER BY start_time",
            )
            .bind(day)
            .fetch_all(pool)
            .await?;
            Ok((rows, None))
        }
        (None, Some(p)) => {
            let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM schedules")
                .fetch_one(pool)
                .await?;
            let rows = sqlx::query_as::<_, Schedule>(
                "SELECT * FROM schedules ORDER BY day, start_time LIMIT $1 OFFSET $2",
            )
            .bind(p.limit)
            .bind(p.from())
            .fetch_all(pool)
            .await?;
            Ok((rows, Some(total)))
        }
        (None, None) => {
            let rows =
                sqlx::query_as::<_, Schedule>("SELECT * FROM schedules ORDER BY day, start_time")
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
) -> Result<Vec<Schedule>, DatabaseError> {
    let rows = sqlx::query_as::<_, Schedule>(
        "SELECT * FROM schedules ORDER BY day, start_time LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &PgPool,
    academic_year_id: Uuid,
    teacher_id: Uuid,
    class_name: &str,
    subject: &str,
    day: &str,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<Schedule, DatabaseError> {
    let row = sqlx::query_as::<_, Schedule>(
        "INSERT INTO schedules (id, academic_year_id, teacher_id, class_name, subject, day, start_time, end_time) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(academic_year_id)
    .bind(teacher_id)
    .bind(class_name)
    .bind(subject)
    .bind(day)
    .bind(start_time)
    .bind(end_time)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

#[allow(clippy::too_many_arguments)]
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    academic_year_id: Uuid,
    teacher_id: Uuid,
    class_name: &str,
    subject: &str,
    day: &str,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<Option<Schedule>, DatabaseError> {
    let row = sqlx::query_as::<_, Schedule>(
        "UPDATE schedules SET academic_year_id = $2, teacher_id = $3, class_name = $4, \
         subject = $5, day = $6, start_time = $7, end_time = $8 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(academic_year_id)
    .bind(teacher_id)
    .bind(class_name)
    .bind(subject)
    .bind(day)
    .bind(start_time)
    .bind(end_time)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, DatabaseError> {
    let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
