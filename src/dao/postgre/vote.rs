use crate::model::{Table, Vote};

impl Table<Vote> {
    /// `(vote_type, count)` rows for one proposal, to be folded into a
    /// tally by the governance aggregator.
    pub async fn tally_rows(
        &self,
        proposal_id: &str,
    ) -> Result<Vec<(String, i64)>, crate::error::Error> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT "vote_type", COUNT(*)
            FROM "votes"
            WHERE "proposal_id" = $1
            GROUP BY "vote_type"
            "#,
        )
        .bind(proposal_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count_all(
        &self,
        dao_id: Option<&str>,
    ) -> Result<i64, crate::error::Error> {
        let (count,): (i64,) = match dao_id {
            Some(dao_id) => {
                sqlx::query_as(
                    r#"SELECT COUNT(*) FROM "votes" WHERE "dao_id" = $1"#,
                )
                .bind(dao_id)
                .fetch_one(&self.pool)
                .await?
            },
            None => {
                sqlx::query_as(r#"SELECT COUNT(*) FROM "votes""#)
                    .fetch_one(&self.pool)
                    .await?
            },
        };

        Ok(count)
    }

    pub async fn count_since(
        &self,
        dao_id: Option<&str>,
        from: chrono::DateTime<chrono::Utc>,
    ) -> Result<i64, crate::error::Error> {
        let (count,): (i64,) = match dao_id {
            Some(dao_id) => {
                sqlx::query_as(
                    r#"
                    SELECT COUNT(*) FROM "votes"
                    WHERE "dao_id" = $1 AND "created_at" > $2
                    "#,
                )
                .bind(dao_id)
                .bind(from)
                .fetch_one(&self.pool)
                .await?
            },
            None => {
                sqlx::query_as(
                    r#"SELECT COUNT(*) FROM "votes" WHERE "created_at" > $1"#,
                )
                .bind(from)
                .fetch_one(&self.pool)
                .await?
            },
        };

        Ok(count)
    }

    pub async fn count_by_user(
        &self,
        user_id: &str,
        dao_id: &str,
    ) -> Result<i64, crate::error::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM "votes"
            WHERE "user_id" = $1 AND "dao_id" = $2
            "#,
        )
        .bind(user_id)
        .bind(dao_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
