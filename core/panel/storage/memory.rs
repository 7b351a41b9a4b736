


use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use crate::error::StorageError;
use crate::models::admin_users::AdminUser;
use crate::models::stats::{MethodRow, MonthlyRow, SummaryRow, TopUserRow};
use crate::models::withdrawals::{StatusChange, WithdrawalListRow, WithdrawalStatus};
use super::{ConnectionSource, Repository};


#[derive(Clone, Debug, PartialEq)]
pub struct MemoryUser{
    pub id: i32,
    pub name: String,
    pub email: String,
}

/* a whole row of the withdrawals table */
#[derive(Clone, Debug, PartialEq)]
pub struct WithdrawalRecord{
    pub id: i32,
    pub user_id: i32, // many withdrawals per user
    pub amount: BigDecimal,
    pub status: WithdrawalStatus,
    pub method: String,
    pub payment_details: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processed_by: Option<i32>,
    pub notes: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/* rows are kept in insertion order which stands in for the table order */
#[derive(Clone, Debug, Default)]
pub struct MemoryData{
    pub users: Vec<MemoryUser>,
    pub admins: Vec<AdminUser>,
    pub withdrawals: Vec<WithdrawalRecord>,
}

impl MemoryData{

    pub fn with_user(mut self, id: i32, name: &str, email: &str) -> Self{
        self.users.push(MemoryUser{ id, name: name.to_string(), email: email.to_string() });
        self
    }

    pub fn with_admin(mut self, admin: AdminUser) -> Self{
        self.admins.push(admin);
        self
    }

    pub fn with_withdrawal(mut self, record: WithdrawalRecord) -> Self{
        self.withdrawals.push(record);
        self
    }

}

pub fn withdrawal(id: i32, user_id: i32, amount: &str, status: WithdrawalStatus, method: &str, created_at: DateTime<Utc>) -> WithdrawalRecord{
    WithdrawalRecord{
        id,
        user_id,
        amount: amount.parse().unwrap_or_default(),
        status,
        method: method.to_string(),
        payment_details: None,
        created_at,
        processed_at: None,
        processed_by: None,
        notes: None,
        updated_at: None,
    }
}

#[derive(Clone, Default)]
pub struct MemorySource{
    data: Arc<Mutex<MemoryData>>,
    acquired: Arc<AtomicUsize>,
    failing: bool,
}

impl MemorySource{

    pub fn new(data: MemoryData) -> Self{
        MemorySource{ data: Arc::new(Mutex::new(data)), ..Default::default() }
    }

    /* every checkout fails, like a database that went away */
    pub fn failing() -> Self{
        MemorySource{ failing: true, ..Default::default() }
    }

    pub fn acquired(&self) -> usize{
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> MemoryData{
        match self.data.lock(){
            Ok(data) => data.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

}

impl ConnectionSource for MemorySource{

    fn acquire(&self) -> Result<Box<dyn Repository>, StorageError>{
        self.acquired.fetch_add(1, Ordering::SeqCst);
        if self.failing{
            return Err(StorageError::Unavailable("connection refused".to_string()));
        }
        Ok(Box::new(MemoryRepository{ data: self.data.clone() }))
    }

}

pub struct MemoryRepository{
    data: Arc<Mutex<MemoryData>>,
}

impl MemoryRepository{

    fn lock(&self) -> Result<MutexGuard<'_, MemoryData>, StorageError>{
        self.data.lock().map_err(|_| StorageError::Unavailable("memory storage is poisoned".to_string()))
    }

}

/* SUM over no rows is NULL in sql, keep that here too */
fn sum<'a>(amounts: impl Iterator<Item = &'a BigDecimal>) -> Option<BigDecimal>{
    amounts.fold(None, |acc, a| Some(acc.unwrap_or_default() + a))
}

impl Repository for MemoryRepository{

    fn find_admin(&mut self, username: &str) -> Result<Option<AdminUser>, StorageError>{
        Ok(self.lock()?.admins.iter().find(|a| a.username == username).cloned())
    }

    fn touch_last_login(&mut self, admin_id: i32, at: DateTime<Utc>) -> Result<(), StorageError>{
        let mut data = self.lock()?;
        if let Some(admin) = data.admins.iter_mut().find(|a| a.id == admin_id){
            admin.last_login = Some(at);
        }
        Ok(())
    }

    fn list_withdrawals(&mut self, filter: Option<WithdrawalStatus>) -> Result<Vec<WithdrawalListRow>, StorageError>{
        let data = self.lock()?;
        let mut rows = data.withdrawals
            .iter()
            .filter(|w| filter.map_or(true, |status| w.status == status))
            .filter_map(|w| {
                let owner = data.users.iter().find(|u| u.id == w.user_id)?; // inner join
                Some(WithdrawalListRow{
                    id: w.id,
                    amount: w.amount.clone(),
                    status: w.status.as_str().to_string(),
                    method: w.method.clone(),
                    payment_details: w.payment_details.clone(),
                    created_at: w.created_at,
                    notes: w.notes.clone(),
                    processed_at: w.processed_at,
                    user_name: owner.name.clone(),
                    user_email: owner.email.clone(),
                })
            })
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    fn update_withdrawal(&mut self, change: &StatusChange) -> Result<usize, StorageError>{
        let mut data = self.lock()?;
        let Some(record) = data.withdrawals.iter_mut().find(|w| w.id == change.withdrawal_id) else{
            return Ok(0);
        };
        record.status = change.status;
        record.notes = Some(change.notes.clone());
        record.processed_at = Some(change.processed_at);
        record.processed_by = Some(change.processed_by);
        record.updated_at = Some(change.processed_at);
        Ok(1)
    }

    fn summary(&mut self) -> Result<SummaryRow, StorageError>{
        let data = self.lock()?;
        let count = |status: WithdrawalStatus| data.withdrawals.iter().filter(|w| w.status == status).count() as i64;
        Ok(
            SummaryRow{
                total_withdrawals: data.withdrawals.len() as i64,
                pending_count: count(WithdrawalStatus::Pending),
                approved_count: count(WithdrawalStatus::Approved),
                rejected_count: count(WithdrawalStatus::Rejected),
                total_amount: sum(data.withdrawals.iter().map(|w| &w.amount)),
                approved_amount: sum(
                    data.withdrawals
                        .iter()
                        .filter(|w| w.status == WithdrawalStatus::Approved)
                        .map(|w| &w.amount)
                ),
            }
        )
    }

    fn monthly(&mut self, since: DateTime<Utc>) -> Result<Vec<MonthlyRow>, StorageError>{
        let data = self.lock()?;
        let mut buckets: BTreeMap<String, (i64, BigDecimal)> = BTreeMap::new();
        for w in data.withdrawals.iter().filter(|w| w.created_at >= since){
            let bucket = buckets.entry(w.created_at.format("%Y-%m").to_string()).or_default();
            bucket.0 += 1;
            bucket.1 += &w.amount;
        }
        Ok(
            buckets
                .into_iter()
                .rev()
                .map(|(month, (count, total))| MonthlyRow{ month, count, total: Some(total) })
                .collect()
        )
    }

    fn by_method(&mut self) -> Result<Vec<MethodRow>, StorageError>{
        let data = self.lock()?;
        let mut methods: HashMap<&str, (i64, BigDecimal)> = HashMap::new();
        for w in &data.withdrawals{
            let entry = methods.entry(w.method.as_str()).or_default();
            entry.0 += 1;
            entry.1 += &w.amount;
        }
        let mut rows = methods
            .into_iter()
            .map(|(method, (count, total))| MethodRow{ method: method.to_string(), count, total: Some(total) })
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.method.cmp(&b.method)));
        Ok(rows)
    }

    fn top_users(&mut self, limit: i64) -> Result<Vec<TopUserRow>, StorageError>{
        let data = self.lock()?;
        let mut rows = data.users
            .iter()
            .map(|u| {
                let owned = data.withdrawals.iter().filter(|w| w.user_id == u.id);
                TopUserRow{
                    name: u.name.clone(),
                    email: u.email.clone(),
                    withdrawal_count: owned.clone().count() as i64,
                    total_amount: Some(sum(owned.map(|w| &w.amount)).unwrap_or_default()), // left join + coalesce
                }
            })
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| b.total_amount.cmp(&a.total_amount)); // stable, ties keep user order
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

}
