


use std::collections::BTreeMap;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use serde::{Deserialize, Serialize};
use crate::apis::PanelRequest;
use crate::constants::AUTH_TOKEN_HEADER;
use crate::error::AuthError;


#[derive(Debug, Serialize, Deserialize)]
pub struct JWTClaims{
    pub user_id: i32,
    #[serde(flatten)]
    pub claims: BTreeMap<String, serde_json::Value>, // username, email and whatever else got issued
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued timestamp
}

/* who is calling, built from a verified token only */
#[derive(Clone, Debug, PartialEq)]
pub struct Principal{
    pub subject_id: i32,
    pub claims: BTreeMap<String, String>,
    pub expiry: DateTime<Utc>,
}

impl Principal{

    pub fn claim(&self, key: &str) -> Option<&str>{
        self.claims.get(key).map(String::as_str)
    }

}

/*
    signs and checks HS256 tokens with the process wide secret, there
    is no revocation list, a token dies at its exp and not before
*/
#[derive(Clone)]
pub struct TokenAuthority{
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenAuthority{

    pub fn new(secret: &str) -> Self{
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0; // now < exp, no grace period
        TokenAuthority{
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, subject_id: i32, claims: BTreeMap<String, String>, ttl: Duration) -> Result<String, jsonwebtoken::errors::Error>{
        self.issue_at(subject_id, claims, ttl, Utc::now())
    }

    pub fn issue_at(&self, subject_id: i32, claims: BTreeMap<String, String>, ttl: Duration, now: DateTime<Utc>) -> Result<String, jsonwebtoken::errors::Error>{

        /* a ttl past the calendar can't be encoded as an exp claim */
        let Some(expiry) = now.checked_add_signed(ttl) else{
            return Err(JwtErrorKind::MissingRequiredClaim("exp".to_string()).into());
        };

        let payload = JWTClaims{
            user_id: subject_id,
            claims: claims
                .into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect(),
            exp: expiry.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
    }

    /* callers must reject an empty token before getting here */
    pub fn verify(&self, token: &str) -> Result<Principal, AuthError>{

        let token_data = decode::<JWTClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind(){
                JwtErrorKind::ExpiredSignature => AuthError::Expired,
                JwtErrorKind::InvalidToken
                | JwtErrorKind::Base64(_)
                | JwtErrorKind::Json(_)
                | JwtErrorKind::Utf8(_) => AuthError::Unreadable,
                _ => AuthError::Malformed,
            })?;

        let JWTClaims{ user_id, claims, exp, .. } = token_data.claims;
        let Some(expiry) = DateTime::<Utc>::from_timestamp(exp, 0) else{
            return Err(AuthError::Malformed);
        };

        /* jsonwebtoken lets exp == now through, we don't */
        if expiry <= Utc::now(){
            return Err(AuthError::Expired);
        }

        Ok(
            Principal{
                subject_id: user_id,
                claims: claims
                    .into_iter()
                    .map(|(k, v)| match v{
                        serde_json::Value::String(s) => (k, s),
                        other => (k, other.to_string()),
                    })
                    .collect(),
                expiry,
            }
        )
    }

}

/*
    the authorization gate, every protected route calls authorize()
    once before it touches any data
*/
pub trait Passport{

    fn get_token(&self) -> Option<&str>;

    fn authorize(&self, authority: &TokenAuthority) -> Result<Principal, AuthError>{
        let token = self.get_token()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::Missing)?;
        authority.verify(token)
    }

}

impl Passport for PanelRequest{

    fn get_token(&self) -> Option<&str>{
        self.header(AUTH_TOKEN_HEADER)
    }

}
