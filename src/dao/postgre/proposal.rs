use chrono::{DateTime, Utc};

use crate::model::{Proposal, Table};

impl Table<Proposal> {
    pub async fn list(
        &self,
        dao_id: &str,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Proposal>, crate::error::Error> {
        let proposals: Vec<Proposal> = match status {
            Some(status) => {
                sqlx::query_as(
                    r#"
                    SELECT "id", "dao_id", "proposer_id", "title", "status", "created_at"
                    FROM "proposals"
                    WHERE "dao_id" = $1 AND "status" = $2
                    ORDER BY "created_at" DESC
                    LIMIT $3 OFFSET $4
                    "#,
                )
                .bind(dao_id)
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            },
            None => {
                sqlx::query_as(
                    r#"
                    SELECT "id", "dao_id", "proposer_id", "title", "status", "created_at"
                    FROM "proposals"
                    WHERE "dao_id" = $1
                    ORDER BY "created_at" DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(dao_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            },
        };

        Ok(proposals)
    }

    pub async fn count(
        &self,
        dao_id: &str,
        status: Option<&str>,
    ) -> Result<i64, crate::error::Error> {
        let (count,): (i64,) = match status {
            Some(status) => {
                sqlx::query_as(
                    r#"
                    SELECT COUNT(*) FROM "proposals"
                    WHERE "dao_id" = $1 AND "status" = $2
                    "#,
                )
                .bind(dao_id)
                .bind(status)
                .fetch_one(&self.pool)
                .await?
            },
            None => {
                sqlx::query_as(
                    r#"SELECT COUNT(*) FROM "proposals" WHERE "dao_id" = $1"#,
                )
                .bind(dao_id)
                .fetch_one(&self.pool)
                .await?
            },
        };

        Ok(count)
    }

    pub async fn get_by_id(
        &self,
        proposal_id: &str,
    ) -> Result<Option<Proposal>, crate::error::Error> {
        let proposal: Option<Proposal> = sqlx::query_as(
            r#"
            SELECT "id", "dao_id", "proposer_id", "title", "status", "created_at"
            FROM "proposals"
            WHERE "id" = $1
            "#,
        )
        .bind(proposal_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(proposal)
    }

    pub async fn count_all(
        &self,
        dao_id: Option<&str>,
    ) -> Result<i64, crate::error::Error> {
        let (count,): (i64,) = match dao_id {
            Some(dao_id) => {
                sqlx::query_as(
                    r#"SELECT COUNT(*) FROM "proposals" WHERE "dao_id" = $1"#,
                )
                .bind(dao_id)
                .fetch_one(&self.pool)
                .await?
            },
            None => {
                sqlx::query_as(r#"SELECT COUNT(*) FROM "proposals""#)
                    .fetch_one(&self.pool)
                    .await?
            },
        };

        Ok(count)
    }

    pub async fn count_executed(
        &self,
        dao_id: Option<&str>,
    ) -> Result<i64, crate::error::Error> {
        let (count,): (i64,) = match dao_id {
            Some(dao_id) => {
                sqlx::query_as(
                    r#"
                    SELECT COUNT(*) FROM "proposals"
                    WHERE "dao_id" = $1 AND "status" = 'executed'
                    "#,
                )
                .bind(dao_id)
                .fetch_one(&self.pool)
                .await?
            },
            None => {
                sqlx::query_as(
                    r#"SELECT COUNT(*) FROM "proposals" WHERE "status" = 'executed'"#,
                )
                .fetch_one(&self.pool)
                .await?
            },
        };

        Ok(count)
    }

    pub async fn count_between(
        &self,
        dao_id: Option<&str>,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, crate::error::Error> {
        let (count,): (i64,) = match dao_id {
            Some(dao_id) => {
                sqlx::query_as(
                    r#"
                    SELECT COUNT(*) FROM "proposals"
                    WHERE "dao_id" = $1 AND "created_at" > $2 AND "created_at" <= $3
                    "#,
                )
                .bind(dao_id)
                .bind(from)
                .bind(to)
                .fetch_one(&self.pool)
                .await?
            },
            None => {
                sqlx::query_as(
                    r#"
                    SELECT COUNT(*) FROM "proposals"
                    WHERE "created_at" > $1 AND "created_at" <= $2
                    "#,
                )
                .bind(from)
                .bind(to)
                .fetch_one(&self.pool)
                .await?
            },
        };

        Ok(count)
    }

    pub async fn count_executed_between(
        &self,
        dao_id: Option<&str>,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, crate::error::Error> {
        let (count,): (i64,) = match dao_id {
            Some(dao_id) => {
                sqlx::query_as(
                    r#"
                    SELECT COUNT(*) FROM "proposals"
                    WHERE "dao_id" = $1 AND "status" = 'executed'
                        AND "created_at" > $2 AND "created_at" <= $3
                    "#,
                )
                .bind(dao_id)
                .bind(from)
                .bind(to)
                .fetch_one(&self.pool)
                .await?
            },
            None => {
                sqlx::query_as(
                    r#"
                    SELECT COUNT(*) FROM "proposals"
                    WHERE "status" = 'executed'
                        AND "created_at" > $1 AND "created_at" <= $2
                    "#,
                )
                .bind(from)
                .bind(to)
                .fetch_one(&self.pool)
                .await?
            },
        };

        Ok(count)
    }

    pub async fn count_by_proposer(
        &self,
        user_id: &str,
        dao_id: &str,
    ) -> Result<i64, crate::error::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM "proposals"
            WHERE "proposer_id" = $1 AND "dao_id" = $2
            "#,
        )
        .bind(user_id)
        .bind(dao_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
