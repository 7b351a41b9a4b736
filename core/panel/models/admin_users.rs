


use std::collections::BTreeMap;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use crate::error::ValidationError;
use crate::passport::Principal;
use crate::schema::admin_users;


#[derive(Identifiable, Selectable, Queryable, Clone, Debug, PartialEq)]
#[diesel(table_name=admin_users)]
pub struct AdminUser{ /* ordering of fields must match the table in up.sql */
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String, // argon2 encoded
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct LoginRequest{
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AdminUserData{
    pub id: i32,
    pub username: String,
    pub email: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LoginResponse{
    pub token: String,
    pub user: AdminUserData,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WhoamiResponse{
    pub valid: bool,
    pub user: AdminUserData,
}

impl LoginRequest{

    /* both fields must be there before we even look the admin up */
    pub fn validate(&self) -> Result<(&str, &str), ValidationError>{
        if self.username.is_empty() || self.password.is_empty(){
            return Err(ValidationError::MissingCredentials);
        }
        Ok((self.username.as_str(), self.password.as_str()))
    }

}

impl AdminUser{

    pub fn hash_pswd(password: &str) -> Result<String, argon2::Error>{ /* argon2 as the kdf */
        let salt: [u8; 16] = rand::random();
        argon2::hash_encoded(password.as_bytes(), &salt, &argon2::Config::default())
    }

    pub fn verify_pswd(&self, raw_pswd: &str) -> Result<bool, argon2::Error>{ /* argon2 as the kdf */
        argon2::verify_encoded(&self.password_hash, raw_pswd.as_bytes())
    }

    /* what goes into the token next to the subject id */
    pub fn identity_claims(&self) -> BTreeMap<String, String>{
        BTreeMap::from([
            ("username".to_string(), self.username.clone()),
            ("email".to_string(), self.email.clone()),
        ])
    }

    pub fn data(&self) -> AdminUserData{
        AdminUserData{
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }

}

impl From<&Principal> for AdminUserData{
    fn from(principal: &Principal) -> Self{
        AdminUserData{
            id: principal.subject_id,
            username: principal.claim("username").unwrap_or_default().to_string(),
            email: principal.claim("email").unwrap_or_default().to_string(),
        }
    }
}
