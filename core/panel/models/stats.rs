


use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable, Numeric, Text};


/*  ---------------------------------------------------------
   | raw aggregate rows as the persistence layer hands them
   | back, sums are nullable since postgres gives NULL for a
   | SUM over no rows, the engine normalizes them to zero
   |
*/

#[derive(QueryableByName, Clone, Debug, Default, PartialEq)]
pub struct SummaryRow{
    #[diesel(sql_type = BigInt)]
    pub total_withdrawals: i64,
    #[diesel(sql_type = BigInt)]
    pub pending_count: i64,
    #[diesel(sql_type = BigInt)]
    pub approved_count: i64,
    #[diesel(sql_type = BigInt)]
    pub rejected_count: i64,
    #[diesel(sql_type = Nullable<Numeric>)]
    pub total_amount: Option<BigDecimal>,
    #[diesel(sql_type = Nullable<Numeric>)]
    pub approved_amount: Option<BigDecimal>,
}

#[derive(QueryableByName, Clone, Debug, PartialEq)]
pub struct MonthlyRow{
    #[diesel(sql_type = Text)]
    pub month: String, // YYYY-MM
    #[diesel(sql_type = BigInt)]
    pub count: i64,
    #[diesel(sql_type = Nullable<Numeric>)]
    pub total: Option<BigDecimal>,
}

#[derive(QueryableByName, Clone, Debug, PartialEq)]
pub struct MethodRow{
    #[diesel(sql_type = Text)]
    pub method: String,
    #[diesel(sql_type = BigInt)]
    pub count: i64,
    #[diesel(sql_type = Nullable<Numeric>)]
    pub total: Option<BigDecimal>,
}

#[derive(QueryableByName, Clone, Debug, PartialEq)]
pub struct TopUserRow{
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Text)]
    pub email: String,
    #[diesel(sql_type = BigInt)]
    pub withdrawal_count: i64,
    #[diesel(sql_type = Nullable<Numeric>)]
    pub total_amount: Option<BigDecimal>,
}


/*  ---------------------------------------------------------
   | the report itself, rebuilt on every request and never
   | stored, money stays exact in here and only turns into
   | floats once it gets serialized
   |
*/

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary{
    pub total_withdrawals: i64,
    pub pending_count: i64,
    pub approved_count: i64,
    pub rejected_count: i64,
    pub total_amount: BigDecimal,
    pub approved_amount: BigDecimal,
    pub avg_amount: BigDecimal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrendBucket{
    pub month: String,
    pub count: i64,
    pub total: BigDecimal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodBreakdown{
    pub method: String,
    pub count: i64,
    pub total: BigDecimal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UserRanking{
    pub name: String,
    pub email: String,
    pub withdrawal_count: i64,
    pub total_amount: BigDecimal,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatisticsReport{
    pub summary: Summary,
    pub monthly: Vec<TrendBucket>, // most recent month first
    pub by_method: Vec<MethodBreakdown>, // most used first
    pub top_users: Vec<UserRanking>, // biggest total first
}
