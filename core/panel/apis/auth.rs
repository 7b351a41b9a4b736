


use chrono::Utc;
use log::{error, info};
use crate::constants::*;
use crate::envelope::ResponseEnvelope;
use crate::error::{AuthError, ErrorKind, PanelError};
use crate::models::admin_users::{AdminUserData, LoginRequest, LoginResponse, WhoamiResponse};
use crate::passport::Passport;
use super::{json_body, method_not_allowed, HttpMethod, Panel, PanelRequest, PanelResult};


pub fn handle(panel: &Panel, req: &PanelRequest) -> PanelResult{
    match req.method{
        HttpMethod::Post => login(panel, req),
        HttpMethod::Get => whoami(panel, req),
        _ => Err(method_not_allowed(req, "auth")),
    }
}

/*
    POST /auth {username, password}

    the password is checked against the argon2 hash stored for the admin,
    an unknown username and a wrong password answer exactly the same
*/
pub fn login(panel: &Panel, req: &PanelRequest) -> PanelResult{

    let login_info = json_body::<LoginRequest>(req, "login")?;
    let (username, password) = login_info.validate().map_err(|e| PanelError::new(e, "login"))?;

    panel.require_database("login")?;
    let mut repo = panel.repository("login")?;

    let Some(admin) = repo.find_admin(username).map_err(|e| PanelError::new(e, "login"))? else{
        return Err(PanelError::new(ErrorKind::InvalidCredentials, "login"));
    };

    let verified = match admin.verify_pswd(password){
        Ok(verified) => verified,
        Err(e) => {
            error!("password hash of admin {} can't be verified due to: {}", admin.id, e);
            false
        }
    };
    if !verified{
        return Err(PanelError::new(ErrorKind::InvalidCredentials, "login"));
    }

    let token = panel.authority()
        .issue(admin.id, admin.identity_claims(), panel.token_ttl())
        .map_err(|e| PanelError::new(ErrorKind::Internal(e.to_string()), "login"))?;

    repo.touch_last_login(admin.id, Utc::now()).map_err(|e| PanelError::new(e, "login"))?;
    info!("🔓 admin {} logged in", admin.username);

    Ok(
        ResponseEnvelope::json(200, &LoginResponse{
            token,
            user: admin.data(),
        })
    )
}

/*
    GET /auth with X-Auth-Token

    unlike the protected routes this one tells the client why its token
    got rejected, it never touches the database
*/
pub fn whoami(panel: &Panel, req: &PanelRequest) -> PanelResult{

    let principal = req.authorize(panel.authority()).map_err(|e| {
        let msg = match e{
            AuthError::Missing => NO_TOKEN_PROVIDED,
            AuthError::Expired => TOKEN_EXPIRED,
            AuthError::Malformed | AuthError::Unreadable => INVALID_TOKEN,
        };
        PanelError::new(e, "whoami").with_message(msg)
    })?;

    Ok(
        ResponseEnvelope::json(200, &WhoamiResponse{
            valid: true,
            user: AdminUserData::from(&principal),
        })
    )
}
