use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use crate::model::{Table, TransactionRecord};

impl Table<TransactionRecord> {
    /// Deposits and member contributions, summed over (`from`, now].
    pub async fn sum_inflow(
        &self,
        dao_id: &str,
        from: DateTime<Utc>,
    ) -> Result<BigDecimal, crate::error::Error> {
        let (amount,): (Option<BigDecimal>,) = sqlx::query_as(
            r#"
            SELECT SUM("amount")
            FROM "transactions"
            WHERE "dao_id" = $1
                AND "tx_type" IN ('deposit', 'contribution')
                AND "created_at" > $2
            "#,
        )
        .bind(dao_id)
        .bind(from)
        .fetch_one(&self.pool)
        .await?;

        let amount = amount.unwrap_or(BigDecimal::from_str("0")?);

        Ok(amount)
    }

    /// Withdrawals and disbursements, summed over (`from`, now].
    pub async fn sum_outflow(
        &self,
        dao_id: &str,
        from: DateTime<Utc>,
    ) -> Result<BigDecimal, crate::error::Error> {
        let (amount,): (Option<BigDecimal>,) = sqlx::query_as(
            r#"
            SELECT SUM("amount")
            FROM "transactions"
            WHERE "dao_id" = $1
                AND "tx_type" IN ('withdrawal', 'disbursement')
                AND "created_at" > $2
            "#,
        )
        .bind(dao_id)
        .bind(from)
        .fetch_one(&self.pool)
        .await?;

        let amount = amount.unwrap_or(BigDecimal::from_str("0")?);

        Ok(amount)
    }

    pub async fn recent(
        &self,
        dao_id: &str,
        limit: i64,
    ) -> Result<Vec<TransactionRecord>, crate::error::Error> {
        let transactions: Vec<TransactionRecord> = sqlx::query_as(
            r#"
            SELECT "id", "dao_id", "tx_type", "amount", "created_at"
            FROM "transactions"
            WHERE "dao_id" = $1
            ORDER BY "created_at" DESC
            LIMIT $2
            "#,
        )
        .bind(dao_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    pub async fn count(
        &self,
        dao_id: &str,
    ) -> Result<i64, crate::error::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"SELECT COUNT(*) FROM "transactions" WHERE "dao_id" = $1"#,
        )
        .bind(dao_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn sum_volume(
        &self,
        dao_id: Option<&str>,
    ) -> Result<BigDecimal, crate::error::Error> {
        let (amount,): (Option<BigDecimal>,) = match dao_id {
            Some(dao_id) => {
                sqlx::query_as(
                    r#"SELECT SUM("amount") FROM "transactions" WHERE "dao_id" = $1"#,
                )
                .bind(dao_id)
                .fetch_one(&self.pool)
                .await?
            },
            None => {
                sqlx::query_as(r#"SELECT SUM("amount") FROM "transactions""#)
                    .fetch_one(&self.pool)
                    .await?
            },
        };

        let amount = amount.unwrap_or(BigDecimal::from_str("0")?);

        Ok(amount)
    }

    pub async fn sum_volume_between(
        &self,
        dao_id: Option<&str>,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<BigDecimal, crate::error::Error> {
        let (amount,): (Option<BigDecimal>,) = match dao_id {
            Some(dao_id) => {
                sqlx::query_as(
                    r#"
                    SELECT SUM("amount") FROM "transactions"
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
                    SELECT SUM("amount") FROM "transactions"
                    WHERE "created_at" > $1 AND "created_at" <= $2
                    "#,
                )
                .bind(from)
                .bind(to)
                .fetch_one(&self.pool)
                .await?
            },
        };

        let amount = amount.unwrap_or(BigDecimal::from_str("0")?);

        Ok(amount)
    }
}
