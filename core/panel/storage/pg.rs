


use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Timestamptz};
use storereq::{PgPooledConnection, Storage};
use crate::error::StorageError;
use crate::models::admin_users::AdminUser;
use crate::models::stats::{MethodRow, MonthlyRow, SummaryRow, TopUserRow};
use crate::models::withdrawals::{StatusChange, WithdrawalListRow, WithdrawalStatus};
use crate::schema::{admin_users, users, withdrawals};
use super::{ConnectionSource, Repository};


const SUMMARY_QUERY: &str = r#"
    SELECT
        COUNT(*) AS total_withdrawals,
        COUNT(*) FILTER (WHERE status = 'pending') AS pending_count,
        COUNT(*) FILTER (WHERE status = 'approved') AS approved_count,
        COUNT(*) FILTER (WHERE status = 'rejected') AS rejected_count,
        SUM(amount) AS total_amount,
        SUM(amount) FILTER (WHERE status = 'approved') AS approved_amount
    FROM withdrawals
"#;

const MONTHLY_QUERY: &str = r#"
    SELECT
        TO_CHAR(created_at, 'YYYY-MM') AS month,
        COUNT(*) AS count,
        SUM(amount) AS total
    FROM withdrawals
    WHERE created_at >= $1
    GROUP BY TO_CHAR(created_at, 'YYYY-MM')
    ORDER BY month DESC
"#;

const BY_METHOD_QUERY: &str = r#"
    SELECT
        method,
        COUNT(*) AS count,
        SUM(amount) AS total
    FROM withdrawals
    GROUP BY method
    ORDER BY count DESC, method ASC
"#;

/* users without any withdrawal still show up, with a zero total */
const TOP_USERS_QUERY: &str = r#"
    SELECT
        u.name,
        u.email,
        COUNT(w.id) AS withdrawal_count,
        COALESCE(SUM(w.amount), 0) AS total_amount
    FROM users u
    LEFT JOIN withdrawals w ON u.id = w.user_id
    GROUP BY u.id, u.name, u.email
    ORDER BY total_amount DESC, u.id ASC
    LIMIT $1
"#;


pub struct PgSource{
    storage: Storage,
}

impl PgSource{

    pub fn new(storage: Storage) -> Self{
        PgSource{ storage }
    }

}

impl ConnectionSource for PgSource{

    fn acquire(&self) -> Result<Box<dyn Repository>, StorageError>{
        let Some(checkout) = self.storage.checkout() else{
            return Err(StorageError::Unavailable("postgres storage is detached".to_string()));
        };
        let conn = checkout?;
        Ok(Box::new(PgRepository{ conn }))
    }

}

pub struct PgRepository{
    conn: PgPooledConnection, // back to the pool on drop
}

impl Repository for PgRepository{

    fn find_admin(&mut self, username: &str) -> Result<Option<AdminUser>, StorageError>{
        let admin = admin_users::table
            .filter(admin_users::username.eq(username))
            .select(AdminUser::as_select())
            .first::<AdminUser>(&mut self.conn)
            .optional()?;
        Ok(admin)
    }

    fn touch_last_login(&mut self, admin_id: i32, at: DateTime<Utc>) -> Result<(), StorageError>{
        diesel::update(admin_users::table.filter(admin_users::id.eq(admin_id)))
            .set(admin_users::last_login.eq(at))
            .execute(&mut self.conn)?;
        Ok(())
    }

    fn list_withdrawals(&mut self, filter: Option<WithdrawalStatus>) -> Result<Vec<WithdrawalListRow>, StorageError>{

        let mut query = withdrawals::table
            .inner_join(users::table)
            .select((
                withdrawals::id,
                withdrawals::amount,
                withdrawals::status,
                withdrawals::method,
                withdrawals::payment_details,
                withdrawals::created_at,
                withdrawals::notes,
                withdrawals::processed_at,
                users::name,
                users::email,
            ))
            .order(withdrawals::created_at.desc())
            .into_boxed();

        if let Some(status) = filter{
            query = query.filter(withdrawals::status.eq(status.as_str()));
        }

        Ok(query.load::<WithdrawalListRow>(&mut self.conn)?)
    }

    fn update_withdrawal(&mut self, change: &StatusChange) -> Result<usize, StorageError>{
        let updated = diesel::update(withdrawals::table.filter(withdrawals::id.eq(change.withdrawal_id)))
            .set((
                withdrawals::status.eq(change.status.as_str()),
                withdrawals::notes.eq(change.notes.as_str()),
                withdrawals::processed_at.eq(change.processed_at),
                withdrawals::processed_by.eq(change.processed_by),
                withdrawals::updated_at.eq(change.processed_at),
            ))
            .execute(&mut self.conn)?;
        Ok(updated)
    }

    fn summary(&mut self) -> Result<SummaryRow, StorageError>{
        Ok(sql_query(SUMMARY_QUERY).get_result::<SummaryRow>(&mut self.conn)?)
    }

    fn monthly(&mut self, since: DateTime<Utc>) -> Result<Vec<MonthlyRow>, StorageError>{
        Ok(
            sql_query(MONTHLY_QUERY)
                .bind::<Timestamptz, _>(since)
                .load::<MonthlyRow>(&mut self.conn)?
        )
    }

    fn by_method(&mut self) -> Result<Vec<MethodRow>, StorageError>{
        Ok(sql_query(BY_METHOD_QUERY).load::<MethodRow>(&mut self.conn)?)
    }

    fn top_users(&mut self, limit: i64) -> Result<Vec<TopUserRow>, StorageError>{
        Ok(
            sql_query(TOP_USERS_QUERY)
                .bind::<BigInt, _>(limit)
                .load::<TopUserRow>(&mut self.conn)?
        )
    }

}


/*
    these run the repository against a real postgres, point
    TEST_DATABASE_URL at a scratch database to enable them, every
    test works inside a transaction that is never committed
*/
