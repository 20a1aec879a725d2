use crate::model::{Table, VoteDelegation};

impl Table<VoteDelegation> {
    /// Rows are counted, not deduplicated: a delegator with several live
    /// delegations contributes one unit of power per row.
    pub async fn count_incoming(
        &self,
        user_id: &str,
        dao_id: &str,
    ) -> Result<i64, crate::error::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM "vote_delegations"
            WHERE "delegate_id" = $1 AND "dao_id" = $2
            "#,
        )
        .bind(user_id)
        .bind(dao_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn count_outgoing(
        &self,
        user_id: &str,
        dao_id: &str,
    ) -> Result<i64, crate::error::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM "vote_delegations"
            WHERE "delegator_id" = $1 AND "dao_id" = $2
            "#,
        )
        .bind(user_id)
        .bind(dao_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
