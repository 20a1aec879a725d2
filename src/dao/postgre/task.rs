use crate::model::{BountyTask, Table};

impl Table<BountyTask> {
    pub async fn count_all(
        &self,
        dao_id: Option<&str>,
    ) -> Result<i64, crate::error::Error> {
        let (count,): (i64,) = match dao_id {
            Some(dao_id) => {
                sqlx::query_as(
                    r#"SELECT COUNT(*) FROM "tasks" WHERE "dao_id" = $1"#,
                )
                .bind(dao_id)
                .fetch_one(&self.pool)
                .await?
            },
            None => {
                sqlx::query_as(r#"SELECT COUNT(*) FROM "tasks""#)
                    .fetch_one(&self.pool)
                    .await?
            },
        };

        Ok(count)
    }
}
