


/*
    the envelope is the only thing a route hands back to the host, it
    carries the status code, the ordered headers and a body which is
    either plain text or a base64 string of some binary bytes, the
    is_binary flag tells the host which one it is so it can decode
    the body before putting it on the wire
*/


use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use crate::constants::*;


#[derive(Clone, Debug, Default, PartialEq)]
pub struct Headers(Vec<(String, String)>);

impl Headers{

    pub fn with(mut self, name: &str, value: &str) -> Self{
        self.insert(name, value);
        self
    }

    /* replaces an existing header in place to keep the order stable */
    pub fn insert(&mut self, name: &str, value: &str){
        match self.0.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)){
            Some(entry) => entry.1 = value.to_string(),
            None => self.0.push((name.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str>{
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)>{
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

}

impl Serialize for Headers{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error>{
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0{
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope{
    status_code: u16,
    headers: Headers,
    #[serde(rename = "isBase64Encoded")]
    is_binary: bool,
    body: String,
}

impl ResponseEnvelope{

    fn cors() -> Headers{
        Headers::default().with(ALLOW_ORIGIN, "*")
    }

    /* answer to the browser pre-flight check, never needs a token */
    pub fn preflight(allowed_methods: &str) -> Self{
        ResponseEnvelope{
            status_code: 200,
            headers: Self::cors()
                .with(ALLOW_METHODS, allowed_methods)
                .with(ALLOW_HEADERS, ALLOWED_REQUEST_HEADERS)
                .with(MAX_AGE, PREFLIGHT_MAX_AGE),
            is_binary: false,
            body: String::new(),
        }
    }

    pub fn text(status_code: u16, body: String, content_type: &str) -> Self{
        ResponseEnvelope{
            status_code,
            headers: Headers::default()
                .with(CONTENT_TYPE, content_type)
                .with(ALLOW_ORIGIN, "*"),
            is_binary: false,
            body,
        }
    }

    pub fn json<T: Serialize>(status_code: u16, data: &T) -> Self{
        match serde_json::to_string(data){
            Ok(body) => Self::text(status_code, body, JSON_CONTENT_TYPE),
            Err(e) => {
                log::error!("can't encode response body due to: {}", e);
                Self::error(500, INTERNAL_SERVER_ERROR)
            }
        }
    }

    pub fn error(status_code: u16, message: &str) -> Self{
        Self::json(status_code, &serde_json::json!({ "error": message }))
    }

    /* binary payloads always travel as base64 with the flag set */
    pub fn binary(status_code: u16, bytes: &[u8], content_type: &str, extra: Headers) -> Self{
        let mut headers = Headers::default().with(CONTENT_TYPE, content_type);
        for (k, v) in extra.iter(){
            headers.insert(k, v);
        }
        headers.insert(ALLOW_ORIGIN, "*");
        ResponseEnvelope{
            status_code,
            headers,
            is_binary: true,
            body: general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn status_code(&self) -> u16{
        self.status_code
    }

    pub fn headers(&self) -> &Headers{
        &self.headers
    }

    pub fn is_binary(&self) -> bool{
        self.is_binary
    }

    pub fn body(&self) -> &str{
        &self.body
    }

    /* the bytes the host has to send, decoding base64 for binary bodies */
    pub fn body_bytes(&self) -> Result<Vec<u8>, base64::DecodeError>{
        if self.is_binary{
            general_purpose::STANDARD.decode(&self.body)
        } else{
            Ok(self.body.as_bytes().to_vec())
        }
    }

}
