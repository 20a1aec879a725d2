use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use crate::model::{Table, Vault};

impl Table<Vault> {
    /// `(summed balance, vault count, latest update)` for one DAO. A DAO
    /// with no vaults yields a zero balance and count, not an error.
    pub async fn balance_totals(
        &self,
        dao_id: &str,
    ) -> Result<(BigDecimal, i64, Option<DateTime<Utc>>), crate::error::Error>
    {
        let (balance, count, last_updated): (
            Option<BigDecimal>,
            i64,
            Option<DateTime<Utc>>,
        ) = sqlx::query_as(
            r#"
            SELECT SUM("balance"), COUNT(*), MAX("updated_at")
            FROM "vaults"
            WHERE "dao_id" = $1
            "#,
        )
        .bind(dao_id)
        .fetch_one(&self.pool)
        .await?;

        let balance = balance.unwrap_or(BigDecimal::from_str("0")?);

        Ok((balance, count, last_updated))
    }

    /// Currency of the most recently updated vault, when any exist.
    pub async fn latest_currency(
        &self,
        dao_id: &str,
    ) -> Result<Option<String>, crate::error::Error> {
        let row: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT "currency"
            FROM "vaults"
            WHERE "dao_id" = $1
            ORDER BY "updated_at" DESC
            LIMIT 1
            "#,
        )
        .bind(dao_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(currency,)| currency))
    }

    pub async fn sum_balance(
        &self,
        dao_id: &str,
    ) -> Result<BigDecimal, crate::error::Error> {
        let (balance,): (Option<BigDecimal>,) = sqlx::query_as(
            r#"SELECT SUM("balance") FROM "vaults" WHERE "dao_id" = $1"#,
        )
        .bind(dao_id)
        .fetch_one(&self.pool)
        .await?;

        let balance = balance.unwrap_or(BigDecimal::from_str("0")?);

        Ok(balance)
    }
}
