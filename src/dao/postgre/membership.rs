use crate::model::{Membership, Table};

impl Table<Membership> {
    pub async fn count_approved(
        &self,
        dao_id: &str,
    ) -> Result<i64, crate::error::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM "dao_memberships"
            WHERE "dao_id" = $1 AND "status" = 'approved'
            "#,
        )
        .bind(dao_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn get(
        &self,
        user_id: &str,
        dao_id: &str,
    ) -> Result<Option<Membership>, crate::error::Error> {
        let membership: Option<Membership> = sqlx::query_as(
            r#"
            SELECT "id", "user_id", "dao_id", "status", "joined_at"
            FROM "dao_memberships"
            WHERE "user_id" = $1 AND "dao_id" = $2
            "#,
        )
        .bind(user_id)
        .bind(dao_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(membership)
    }
}
