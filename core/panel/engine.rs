


/*
    the aggregation engine turns what the repository hands back into
    the statistics report, it never caches anything, every call reads
    the current state of the withdrawals through the repository

    sums come back as NULL for empty sets and are normalized to zero
    here, the average is worked out from the exact total and count
    and rounded to cents, half up
*/


use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{DateTime, Months, Utc};
use log::info;
use crate::constants::*;
use crate::error::{ErrorKind, StorageError};
use crate::models::stats::*;
use crate::models::withdrawals::{StatusChange, WithdrawalData, WithdrawalStatus};
use crate::storage::Repository;


pub struct AggregationEngine<'r>{
    repo: &'r mut dyn Repository,
}

impl<'r> AggregationEngine<'r>{

    pub fn new(repo: &'r mut dyn Repository) -> Self{
        AggregationEngine{ repo }
    }

    pub fn compute_report(&mut self, now: DateTime<Utc>) -> Result<StatisticsReport, StorageError>{

        let summary = summarize(self.repo.summary()?);

        /* the trend window reaches back TREND_WINDOW_MONTHS calendar months from now */
        let since = now
            .checked_sub_months(Months::new(TREND_WINDOW_MONTHS))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let monthly = self.repo.monthly(since)?
            .into_iter()
            .map(|row| TrendBucket{ month: row.month, count: row.count, total: row.total.unwrap_or_default() })
            .collect();

        let by_method = self.repo.by_method()?
            .into_iter()
            .map(|row| MethodBreakdown{ method: row.method, count: row.count, total: row.total.unwrap_or_default() })
            .collect();

        let top_users = self.repo.top_users(TOP_USERS_LIMIT)?
            .into_iter()
            .map(|row| UserRanking{
                name: row.name,
                email: row.email,
                withdrawal_count: row.withdrawal_count,
                total_amount: row.total_amount.unwrap_or_default(),
            })
            .collect();

        Ok(StatisticsReport{ summary, monthly, by_method, top_users })
    }

    pub fn list_withdrawals(&mut self, filter: Option<WithdrawalStatus>) -> Result<Vec<WithdrawalData>, StorageError>{
        let rows = self.repo.list_withdrawals(filter)?;
        Ok(rows.into_iter().map(WithdrawalData::from).collect())
    }

    /* zero affected rows means the id doesn't exist */
    pub fn update_status(&mut self, change: &StatusChange) -> Result<(), ErrorKind>{
        let updated = self.repo.update_withdrawal(change)?;
        if updated == 0{
            return Err(ErrorKind::NotFound(WITHDRAWAL_NOT_FOUND));
        }
        info!(
            "✅ withdrawal {} set to {} by admin {}",
            change.withdrawal_id, change.status.as_str(), change.processed_by
        );
        Ok(())
    }

}

pub fn summarize(row: SummaryRow) -> Summary{

    let total_amount = row.total_amount.unwrap_or_default();
    let avg_amount = if row.total_withdrawals > 0{
        (&total_amount / BigDecimal::from(row.total_withdrawals)).with_scale_round(MONEY_SCALE, RoundingMode::HalfUp)
    } else{
        BigDecimal::default()
    };

    Summary{
        total_withdrawals: row.total_withdrawals,
        pending_count: row.pending_count,
        approved_count: row.approved_count,
        rejected_count: row.rejected_count,
        total_amount,
        approved_amount: row.approved_amount.unwrap_or_default(),
        avg_amount,
    }
}
