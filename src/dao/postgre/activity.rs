use chrono::{DateTime, Utc};
use sqlx::error::Error;

use super::QueryResult;
use crate::model::{ActivityEvent, Table};

impl Table<ActivityEvent> {
    pub async fn insert(
        &self,
        data: &ActivityEvent,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            INSERT INTO "user_activities" ("user_id", "dao_id", "activity_type", "created_at")
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(&data.user_id)
        .bind(&data.dao_id)
        .bind(&data.activity_type)
        .bind(data.created_at)
        .execute(&self.pool)
        .await
    }

    pub async fn count_contributions(
        &self,
        user_id: &str,
        dao_id: &str,
    ) -> Result<i64, crate::error::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM "user_activities"
            WHERE "user_id" = $1 AND "dao_id" = $2 AND "activity_type" = 'contribution'
            "#,
        )
        .bind(user_id)
        .bind(dao_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Distinct users with any activity in the half-open window
    /// (`from`, `to`].
    pub async fn distinct_active_users(
        &self,
        dao_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<String>, crate::error::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT "user_id"
            FROM "user_activities"
            WHERE "dao_id" = $1 AND "created_at" > $2 AND "created_at" <= $3
            "#,
        )
        .bind(dao_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(user_id,)| user_id).collect())
    }

}
