


use std::str::FromStr;
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use crate::error::ValidationError;
use crate::passport::Principal;



/*

    diesel migration run   ---> apply every up.sql under migrations to db
    diesel migration redo  ---> drop and recreate the tables

    status is a plain varchar in the table with a check constraint,
    it gets parsed into WithdrawalStatus at the edges

*/

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus{
    Pending,
    Approved,
    Rejected,
}

impl WithdrawalStatus{

    pub const ALL: [WithdrawalStatus; 3] = [
        WithdrawalStatus::Pending,
        WithdrawalStatus::Approved,
        WithdrawalStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str{
        match self{
            WithdrawalStatus::Pending => "pending",
            WithdrawalStatus::Approved => "approved",
            WithdrawalStatus::Rejected => "rejected",
        }
    }

}

impl FromStr for WithdrawalStatus{

    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err>{
        match s{
            "pending" => Ok(WithdrawalStatus::Pending),
            "approved" => Ok(WithdrawalStatus::Approved),
            "rejected" => Ok(WithdrawalStatus::Rejected),
            other => Err(ValidationError::InvalidStatus(other.to_string())),
        }
    }
}

/* the `status` query param of the listing, `all` or absent means no filter */
pub fn parse_status_filter(raw: Option<&str>) -> Result<Option<WithdrawalStatus>, ValidationError>{
    match raw.map(str::trim){
        None | Some("") | Some("all") => Ok(None),
        Some(s) => s.parse::<WithdrawalStatus>().map(Some),
    }
}

/* one line of the listing, a withdrawal joined with its owner */
#[derive(Queryable, Clone, Debug, PartialEq)]
pub struct WithdrawalListRow{ /* ordering of fields must match the select tuple */
    pub id: i32,
    pub amount: BigDecimal,
    pub status: String,
    pub method: String,
    pub payment_details: Option<String>,
    pub created_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub user_name: String,
    pub user_email: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalData{
    pub id: i32,
    pub user: String,
    pub email: String,
    pub amount: f64,
    pub status: String,
    pub method: String,
    pub payment_details: Option<String>,
    pub date: String,
    pub notes: Option<String>,
    pub processed_at: Option<String>,
}

impl From<WithdrawalListRow> for WithdrawalData{
    fn from(row: WithdrawalListRow) -> Self{
        WithdrawalData{
            id: row.id,
            user: row.user_name,
            email: row.user_email,
            amount: row.amount.to_f64().unwrap_or_default(),
            status: row.status,
            method: row.method,
            payment_details: row.payment_details,
            date: row.created_at.format("%Y-%m-%d").to_string(),
            notes: row.notes,
            processed_at: row.processed_at.map(|at| at.format("%Y-%m-%d %H:%M").to_string()),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WithdrawalListResponse{
    pub withdrawals: Vec<WithdrawalData>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct UpdateWithdrawalRequest{
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UpdateWithdrawalResponse{
    pub success: bool,
    pub message: String,
}

/* a validated status update, ready to be written */
#[derive(Clone, Debug, PartialEq)]
pub struct StatusChange{
    pub withdrawal_id: i32,
    pub status: WithdrawalStatus,
    pub notes: String,
    pub processed_at: DateTime<Utc>,
    pub processed_by: i32,
}

impl UpdateWithdrawalRequest{

    /*
        checked before any connection gets checked out, a zero id or
        an empty status counts as missing, transitions aren't checked
        so any status can overwrite any other one
    */
    pub fn validate(self, actor: &Principal, now: DateTime<Utc>) -> Result<StatusChange, ValidationError>{

        let id = self.id.filter(|id| *id > 0);
        let status = self.status.filter(|s| !s.trim().is_empty());
        let (Some(withdrawal_id), Some(status)) = (id, status) else{
            return Err(ValidationError::MissingFields);
        };

        Ok(
            StatusChange{
                withdrawal_id,
                status: status.trim().parse::<WithdrawalStatus>()?,
                notes: self.notes.unwrap_or_default(),
                processed_at: now,
                processed_by: actor.subject_id,
            }
        )
    }

}


#[cfg(test)]
mod tests{

    use super::*;
    use std::collections::BTreeMap;
    use chrono::TimeZone;

    fn actor() -> Principal{
        Principal{ subject_id: 42, claims: BTreeMap::new(), expiry: Utc::now() }
    }

    #[test]
    fn every_known_status_is_accepted(){
        for status in WithdrawalStatus::ALL{
            let req = UpdateWithdrawalRequest{ id: Some(1), status: Some(status.as_str().to_string()), notes: None };
            let change = req.validate(&actor(), Utc::now()).unwrap();
            assert_eq!(change.status, status);
            assert_eq!(change.processed_by, 42);
            assert_eq!(change.notes, "");
        }
    }

    #[test]
    fn missing_fields_come_before_status_checks(){
        let req = UpdateWithdrawalRequest{ id: None, status: Some("bogus".into()), notes: None };
        assert_eq!(req.validate(&actor(), Utc::now()), Err(ValidationError::MissingFields));
        let req = UpdateWithdrawalRequest{ id: Some(0), status: Some("approved".into()), notes: None };
        assert_eq!(req.validate(&actor(), Utc::now()), Err(ValidationError::MissingFields));
        let req = UpdateWithdrawalRequest{ id: Some(3), status: Some("".into()), notes: None };
        assert_eq!(req.validate(&actor(), Utc::now()), Err(ValidationError::MissingFields));
    }

    #[test]
    fn unknown_statuses_are_rejected(){
        let req = UpdateWithdrawalRequest{ id: Some(3), status: Some("paid".into()), notes: None };
        assert_eq!(req.validate(&actor(), Utc::now()), Err(ValidationError::InvalidStatus("paid".into())));
    }

    #[test]
    fn status_filter_understands_all(){
        assert_eq!(parse_status_filter(None), Ok(None));
        assert_eq!(parse_status_filter(Some("all")), Ok(None));
        assert_eq!(parse_status_filter(Some("approved")), Ok(Some(WithdrawalStatus::Approved)));
        assert!(parse_status_filter(Some("Approved")).is_err());
    }

    #[test]
    fn list_rows_render_the_wire_dates(){
        let row = WithdrawalListRow{
            id: 9,
            amount: "120.50".parse().unwrap(),
            status: "approved".into(),
            method: "card".into(),
            payment_details: Some("4111 **** 1111".into()),
            created_at: Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap(),
            notes: None,
            processed_at: Some(Utc.with_ymd_and_hms(2024, 3, 6, 14, 7, 59).unwrap()),
            user_name: "Ann".into(),
            user_email: "ann@example.com".into(),
        };
        let data = WithdrawalData::from(row);
        assert_eq!(data.date, "2024-03-05");
        assert_eq!(data.processed_at.as_deref(), Some("2024-03-06 14:07"));
        assert_eq!(data.amount, 120.5);
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["paymentDetails"], "4111 **** 1111");
        assert_eq!(json["processedAt"], "2024-03-06 14:07");
        assert!(json["notes"].is_null());
    }

}
