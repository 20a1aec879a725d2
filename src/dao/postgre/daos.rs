use chrono::{DateTime, Utc};

use crate::model::{Dao, Table};

impl Table<Dao> {
    pub async fn count_all(&self) -> Result<i64, crate::error::Error> {
        let (count,): (i64,) =
            sqlx::query_as(r#"SELECT COUNT(*) FROM "daos""#)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    pub async fn exists(
        &self,
        dao_id: &str,
    ) -> Result<bool, crate::error::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"SELECT EXISTS(SELECT 1 FROM "daos" WHERE "id" = $1)"#,
        )
        .bind(dao_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn count_created_before(
        &self,
        before: DateTime<Utc>,
    ) -> Result<i64, crate::error::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"SELECT COUNT(*) FROM "daos" WHERE "created_at" <= $1"#,
        )
        .bind(before)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// First DAOs by creation order. Used by the snapshot sweep and the
    /// top-performers ranking, both of which are bounded by configuration.
    pub async fn list_first(
        &self,
        limit: i64,
    ) -> Result<Vec<Dao>, crate::error::Error> {
        let daos: Vec<Dao> = sqlx::query_as(
            r#"
            SELECT "id", "name", "creator_id", "member_count", "created_at"
            FROM "daos"
            ORDER BY "created_at" ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(daos)
    }
}
