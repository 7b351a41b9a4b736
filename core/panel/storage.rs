


/*  > ---------------------------------------------------------------------------------------------
    | the persistence collaborator seen from the panel, a request checks one
    | repository out of a ConnectionSource, runs its queries on it and drops
    | it before returning which gives the connection back on every path
    |
    |   pg     ---> diesel postgres repository on top of the storereq pool
    |   memory ---> in memory repository the tests run against
    |
*/


use chrono::{DateTime, Utc};
use crate::error::StorageError;
use crate::models::admin_users::AdminUser;
use crate::models::stats::{MethodRow, MonthlyRow, SummaryRow, TopUserRow};
use crate::models::withdrawals::{StatusChange, WithdrawalListRow, WithdrawalStatus};

pub mod pg;
#[cfg(test)]
pub mod memory;


pub trait Repository{

    fn find_admin(&mut self, username: &str) -> Result<Option<AdminUser>, StorageError>;

    fn touch_last_login(&mut self, admin_id: i32, at: DateTime<Utc>) -> Result<(), StorageError>;

    /* newest first, joined with the owning user */
    fn list_withdrawals(&mut self, filter: Option<WithdrawalStatus>) -> Result<Vec<WithdrawalListRow>, StorageError>;

    /* returns how many rows got updated, zero means no such withdrawal */
    fn update_withdrawal(&mut self, change: &StatusChange) -> Result<usize, StorageError>;

    fn summary(&mut self) -> Result<SummaryRow, StorageError>;

    fn monthly(&mut self, since: DateTime<Utc>) -> Result<Vec<MonthlyRow>, StorageError>;

    fn by_method(&mut self) -> Result<Vec<MethodRow>, StorageError>;

    fn top_users(&mut self, limit: i64) -> Result<Vec<TopUserRow>, StorageError>;

}

pub trait ConnectionSource: Send + Sync{

    fn acquire(&self) -> Result<Box<dyn Repository>, StorageError>;

}
