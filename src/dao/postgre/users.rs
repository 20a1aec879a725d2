use chrono::{DateTime, Utc};

use crate::model::{Table, User};

impl Table<User> {
    pub async fn count_all(&self) -> Result<i64, crate::error::Error> {
        let (count,): (i64,) =
            sqlx::query_as(r#"SELECT COUNT(*) FROM "users""#)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    pub async fn count_created_before(
        &self,
        before: DateTime<Utc>,
    ) -> Result<i64, crate::error::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"SELECT COUNT(*) FROM "users" WHERE "created_at" <= $1"#,
        )
        .bind(before)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
