


use chrono::Utc;
use crate::constants::*;
use crate::engine::AggregationEngine;
use crate::envelope::ResponseEnvelope;
use crate::error::PanelError;
use crate::models::withdrawals::{parse_status_filter, UpdateWithdrawalRequest, UpdateWithdrawalResponse, WithdrawalListResponse};
use super::{json_body, method_not_allowed, HttpMethod, Panel, PanelRequest, PanelResult};


pub fn handle(panel: &Panel, req: &PanelRequest) -> PanelResult{

    let principal = panel.authorize(req, "withdrawals")?;
    panel.require_database("withdrawals")?;

    match req.method{
        HttpMethod::Get => get_withdrawals(panel, req),
        HttpMethod::Put => {
            /* validated fully before a connection gets checked out */
            let update_info = json_body::<UpdateWithdrawalRequest>(req, "update_withdrawal")?;
            let change = update_info
                .validate(&principal, Utc::now())
                .map_err(|e| PanelError::new(e, "update_withdrawal"))?;

            let mut repo = panel.repository("update_withdrawal")?;
            AggregationEngine::new(repo.as_mut())
                .update_status(&change)
                .map_err(|e| PanelError::new(e, "update_withdrawal"))?;

            Ok(
                ResponseEnvelope::json(200, &UpdateWithdrawalResponse{
                    success: true,
                    message: WITHDRAWAL_UPDATED.to_string(),
                })
            )
        },
        _ => Err(method_not_allowed(req, "withdrawals")),
    }
}

/* GET /withdrawals?status=all|pending|approved|rejected */
pub fn get_withdrawals(panel: &Panel, req: &PanelRequest) -> PanelResult{

    let filter = parse_status_filter(req.query_param("status"))
        .map_err(|e| PanelError::new(e, "get_withdrawals"))?;

    let mut repo = panel.repository("get_withdrawals")?;
    let withdrawals = AggregationEngine::new(repo.as_mut())
        .list_withdrawals(filter)
        .map_err(|e| PanelError::new(e, "get_withdrawals"))?;

    Ok(ResponseEnvelope::json(200, &WithdrawalListResponse{ withdrawals }))
}


#[cfg(test)]
mod tests{

    use super::*;
    use chrono::Duration;
    use crate::apis::tests::*;
    use crate::models::withdrawals::WithdrawalStatus::{self, *};
    use crate::storage::memory::{withdrawal, MemoryData, MemorySource};

    fn seeded() -> MemorySource{
        let now = Utc::now();
        MemorySource::new(
            MemoryData::default()
                .with_admin(admin())
                .with_user(1, "Ann", "ann@example.com")
                .with_user(2, "Bob", "bob@example.com")
                .with_withdrawal(withdrawal(1, 1, "100.00", Pending, "card", now - Duration::days(2)))
                .with_withdrawal(withdrawal(2, 2, "40.50", Approved, "crypto", now - Duration::days(1)))
        )
    }

    fn put(token: &str, body: &str) -> PanelRequest{
        PanelRequest::new(HttpMethod::Put, "/withdrawals")
            .with_header(AUTH_TOKEN_HEADER, token)
            .with_body(body)
    }

    fn status_of(source: &MemorySource, id: i32) -> WithdrawalStatus{
        source.snapshot().withdrawals.iter().find(|w| w.id == id).map(|w| w.status).unwrap()
    }

    #[test]
    fn listing_is_newest_first_and_filterable(){
        let source = seeded();
        let panel = panel_with(&source, None);
        let token = token_for(&panel, &admin());

        let res = panel.dispatch(&PanelRequest::new(HttpMethod::Get, "/withdrawals").with_header(AUTH_TOKEN_HEADER, &token));
        assert_eq!(res.status_code(), 200);
        let body = body_of(&res);
        assert_eq!(body["withdrawals"][0]["id"], 2);
        assert_eq!(body["withdrawals"][0]["user"], "Bob");
        assert_eq!(body["withdrawals"][0]["amount"], 40.5);
        assert!(body["withdrawals"][1]["processedAt"].is_null());

        let res = panel.dispatch(
            &PanelRequest::new(HttpMethod::Get, "/withdrawals")
                .with_header(AUTH_TOKEN_HEADER, &token)
                .with_query("status", "pending")
        );
        let body = body_of(&res);
        assert_eq!(body["withdrawals"].as_array().unwrap().len(), 1);
        assert_eq!(body["withdrawals"][0]["status"], "pending");
    }

    #[test]
    fn unknown_filters_are_rejected(){
        let source = seeded();
        let panel = panel_with(&source, None);
        let token = token_for(&panel, &admin());
        let res = panel.dispatch(
            &PanelRequest::new(HttpMethod::Get, "/withdrawals")
                .with_header(AUTH_TOKEN_HEADER, &token)
                .with_query("status", "paid")
        );
        assert_eq!(res.status_code(), 400);
        assert_eq!(body_of(&res)["error"], INVALID_STATUS);
        assert_eq!(source.acquired(), 0);
    }

    #[test]
    fn valid_updates_stamp_the_processing_admin(){
        let source = seeded();
        let panel = panel_with(&source, None);
        let token = token_for(&panel, &admin());

        let res = panel.dispatch(&put(&token, r#"{"id":1,"status":"approved","notes":"paid out"}"#));
        assert_eq!(res.status_code(), 200);
        assert_eq!(body_of(&res), serde_json::json!({ "success": true, "message": WITHDRAWAL_UPDATED }));

        let data = source.snapshot();
        let record = data.withdrawals.iter().find(|w| w.id == 1).unwrap();
        assert_eq!(record.status, Approved);
        assert_eq!(record.notes.as_deref(), Some("paid out"));
        assert_eq!(record.processed_by, Some(admin().id));
        assert!(record.processed_at.is_some());
        assert_eq!(record.updated_at, record.processed_at);
    }

    #[test]
    fn any_status_can_overwrite_any_other(){
        let source = seeded();
        let panel = panel_with(&source, None);
        let token = token_for(&panel, &admin());
        let res = panel.dispatch(&put(&token, r#"{"id":2,"status":"pending"}"#));
        assert_eq!(res.status_code(), 200);
        assert_eq!(status_of(&source, 2), Pending);
        assert_eq!(source.snapshot().withdrawals[1].notes.as_deref(), Some(""));
    }

    #[test]
    fn bad_updates_leave_the_row_untouched(){
        let source = seeded();
        let panel = panel_with(&source, None);
        let token = token_for(&panel, &admin());

        let res = panel.dispatch(&put(&token, r#"{"id":1,"status":"paid"}"#));
        assert_eq!(res.status_code(), 400);
        assert_eq!(body_of(&res)["error"], INVALID_STATUS);

        let res = panel.dispatch(&put(&token, r#"{"status":"approved"}"#));
        assert_eq!(res.status_code(), 400);
        assert_eq!(body_of(&res)["error"], MISSING_REQUIRED_FIELDS);

        assert_eq!(status_of(&source, 1), Pending);
        assert_eq!(source.acquired(), 0);
    }

    #[test]
    fn unknown_ids_are_404(){
        let source = seeded();
        let panel = panel_with(&source, None);
        let token = token_for(&panel, &admin());
        let res = panel.dispatch(&put(&token, r#"{"id":77,"status":"rejected"}"#));
        assert_eq!(res.status_code(), 404);
        assert_eq!(body_of(&res)["error"], WITHDRAWAL_NOT_FOUND);
    }

    #[test]
    fn no_valid_token_means_no_mutation_and_no_checkout(){
        let source = seeded();
        let panel = panel_with(&source, None);
        let expired = panel.authority().issue(1, admin().identity_claims(), Duration::hours(-1)).unwrap();

        for token in ["", "garbage", expired.as_str()]{
            let res = panel.dispatch(&put(token, r#"{"id":1,"status":"rejected"}"#));
            assert_eq!(res.status_code(), 401);
            assert_eq!(body_of(&res)["error"], UNAUTHORIZED);
        }

        assert_eq!(status_of(&source, 1), Pending);
        assert_eq!(source.acquired(), 0);
    }

}
