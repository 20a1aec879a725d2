//! Treasury aggregation: vault balances, ledger pages and burn/runway
//! projections over the rolling engagement window.

use bigdecimal::BigDecimal;
use chrono::{Duration, Utc};
use tracing::warn;

use crate::{
    configuration::State,
    error::Error,
    model::{Reading, TransactionPage, TreasuryBalance, TreasuryMetrics},
};

/// Reported runway, in months, when the window outflow is zero. A named
/// sentinel rather than infinity so the value stays representable in JSON
/// and CSV.
pub const RUNWAY_UNBOUNDED_MONTHS: i64 = 999;

const DAYS_PER_MONTH: i64 = 30;

/// Outflow per month, derived from the window total.
pub fn burn_rate(total_outflow: &BigDecimal, window_days: u32) -> BigDecimal {
    if window_days == 0 {
        return total_outflow.clone();
    }
    let window_months = BigDecimal::from(i64::from(window_days))
        / BigDecimal::from(DAYS_PER_MONTH);
    (total_outflow / window_months).with_scale(2)
}

/// Months until the balance is exhausted at the given burn rate, or the
/// unbounded sentinel when nothing is burning.
pub fn runway(balance: &BigDecimal, burn_rate: &BigDecimal) -> BigDecimal {
    if burn_rate > &BigDecimal::from(0) {
        (balance / burn_rate).with_scale(2)
    } else {
        BigDecimal::from(RUNWAY_UNBOUNDED_MONTHS)
    }
}

pub struct TreasuryAggregator<'a> {
    state: &'a State,
}

impl<'a> TreasuryAggregator<'a> {
    pub fn new(state: &'a State) -> Self {
        Self { state }
    }

    pub async fn balance(
        &self,
        dao_id: &str,
    ) -> Result<TreasuryBalance, Error> {
        let db = &self.state.database;
        let ((balance, vault_count, last_updated), currency) = tokio::try_join!(
            db.vault.balance_totals(dao_id),
            db.vault.latest_currency(dao_id),
        )?;

        Ok(TreasuryBalance {
            balance,
            currency: currency
                .unwrap_or_else(|| self.state.config.native_currency.clone()),
            vault_count,
            last_updated,
        })
    }

    pub async fn transactions(
        &self,
        dao_id: &str,
        limit: i64,
    ) -> Result<TransactionPage, Error> {
        let db = &self.state.database;
        let (transactions, total) = tokio::try_join!(
            db.transaction.recent(dao_id, limit),
            db.transaction.count(dao_id),
        )?;

        Ok(TransactionPage {
            transactions,
            total,
        })
    }

    pub async fn metrics(
        &self,
        dao_id: &str,
    ) -> Result<TreasuryMetrics, Error> {
        let window_days = self.state.config.engagement_window_days;
        let window_start =
            Utc::now() - Duration::days(i64::from(window_days));
        let db = &self.state.database;

        let (current_balance, total_inflow, total_outflow) = tokio::try_join!(
            db.vault.sum_balance(dao_id),
            db.transaction.sum_inflow(dao_id, window_start),
            db.transaction.sum_outflow(dao_id, window_start),
        )?;

        let net_change = &total_inflow - &total_outflow;
        let burn_rate = burn_rate(&total_outflow, window_days);
        let runway = runway(&current_balance, &burn_rate);

        Ok(TreasuryMetrics {
            current_balance,
            total_inflow,
            total_outflow,
            net_change,
            burn_rate,
            runway,
        })
    }
}

/// Degrade policy for the balance dashboard read: a storage failure is
/// logged and replaced by an empty treasury, flagged as degraded.
pub fn degrade_balance(
    result: Result<TreasuryBalance, Error>,
    dao_id: &str,
    native_currency: &str,
) -> Reading<TreasuryBalance> {
    match result {
        Ok(balance) => Reading::fresh(balance),
        Err(e) => {
            warn!("treasury balance degraded for dao {}: {}", dao_id, e);
            Reading::fallback(TreasuryBalance {
                balance: BigDecimal::from(0),
                currency: native_currency.to_owned(),
                vault_count: 0,
                last_updated: None,
            })
        },
    }
}

/// Degrade policy for the metrics dashboard read: zero flows and an
/// unbounded runway, flagged as degraded.
pub fn degrade_metrics(
    result: Result<TreasuryMetrics, Error>,
    dao_id: &str,
) -> Reading<TreasuryMetrics> {
    match result {
        Ok(metrics) => Reading::fresh(metrics),
        Err(e) => {
            warn!("treasury metrics degraded for dao {}: {}", dao_id, e);
            Reading::fallback(TreasuryMetrics {
                current_balance: BigDecimal::from(0),
                total_inflow: BigDecimal::from(0),
                total_outflow: BigDecimal::from(0),
                net_change: BigDecimal::from(0),
                burn_rate: BigDecimal::from(0),
                runway: BigDecimal::from(RUNWAY_UNBOUNDED_MONTHS),
            })
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn burn_rate_over_thirty_days_equals_window_outflow() {
        let outflow = BigDecimal::from_str("1200").unwrap();
        let rate = burn_rate(&outflow, 30);
        assert_eq!(rate, BigDecimal::from_str("1200.00").unwrap());
    }

    #[test]
    fn burn_rate_scales_with_window_length() {
        let outflow = BigDecimal::from_str("1200").unwrap();
        let rate = burn_rate(&outflow, 60);
        assert_eq!(rate, BigDecimal::from_str("600.00").unwrap());
    }

    #[test]
    fn runway_divides_balance_by_burn() {
        let balance = BigDecimal::from_str("5000").unwrap();
        let burn = BigDecimal::from_str("1000").unwrap();
        assert_eq!(
            runway(&balance, &burn),
            BigDecimal::from_str("5.00").unwrap()
        );
    }

    #[test]
    fn zero_burn_yields_sentinel_not_a_division_artifact() {
        let balance = BigDecimal::from_str("5000").unwrap();
        let burn = BigDecimal::from(0);
        assert_eq!(
            runway(&balance, &burn),
            BigDecimal::from(RUNWAY_UNBOUNDED_MONTHS)
        );
    }

    #[test]
    fn degraded_balance_is_flagged_and_empty() {
        let reading = degrade_balance(
            Err(Error::TaskError("pool down".to_string())),
            "dao-1",
            "cUSD",
        );
        assert!(reading.degraded);
        assert_eq!(reading.value.balance, BigDecimal::from(0));
        assert_eq!(reading.value.vault_count, 0);
        assert_eq!(reading.value.currency, "cUSD");
    }

    #[test]
    fn healthy_balance_is_not_flagged() {
        let reading = degrade_balance(
            Ok(TreasuryBalance {
                balance: BigDecimal::from(7),
                currency: "cUSD".to_string(),
                vault_count: 1,
                last_updated: None,
            }),
            "dao-1",
            "cUSD",
        );
        assert!(!reading.degraded);
        assert_eq!(reading.value.balance, BigDecimal::from(7));
    }

    #[test]
    fn degraded_metrics_carry_the_runway_sentinel() {
        let reading =
            degrade_metrics(Err(Error::TaskError("down".to_string())), "dao-1");
        assert!(reading.degraded);
        assert_eq!(
            reading.value.runway,
            BigDecimal::from(RUNWAY_UNBOUNDED_MONTHS)
        );
    }
}
