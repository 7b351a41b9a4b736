


/*  > ---------------------------------------------------------------------------------------------
    | the request router of the back office, every request coming from the
    | transport is turned into a PanelRequest and goes through dispatch()
    | which always answers with a ResponseEnvelope
    |
    |   OPTIONS any path     ---> cors pre-flight, no token needed
    |   GET|POST /auth       ---> whoami and login
    |   GET|PUT /withdrawals ---> listing and status updates
    |   GET /analytics       ---> statistics report as json or excel
    |
*/


use std::collections::HashMap;
use std::sync::Arc;
use chrono::Duration;
use serde::de::DeserializeOwned;
use crate::config::Env;
use crate::constants::*;
use crate::envelope::ResponseEnvelope;
use crate::error::{ConfigError, ErrorKind, PanelError, StorageError, ValidationError};
use crate::passport::{Passport, Principal, TokenAuthority};
use crate::report::WorkbookWriter;
use crate::storage::{ConnectionSource, Repository};

pub mod auth;
pub mod withdrawals;
pub mod analytics;


#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HttpMethod{
    Get,
    Post,
    Put,
    Options,
    Other(String),
}

impl From<&str> for HttpMethod{
    fn from(method: &str) -> Self{
        match method.to_ascii_uppercase().as_str(){
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "OPTIONS" => HttpMethod::Options,
            other => HttpMethod::Other(other.to_string()),
        }
    }
}

impl HttpMethod{

    pub fn as_str(&self) -> &str{
        match self{
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Other(m) => m.as_str(),
        }
    }

}

/* what a route gets to see of the incoming request, transport agnostic */
#[derive(Clone, Debug)]
pub struct PanelRequest{
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub query: HashMap<String, String>,
    pub body: Option<String>,
}

impl PanelRequest{

    pub fn new(method: HttpMethod, path: &str) -> Self{
        PanelRequest{
            method,
            path: path.to_string(),
            headers: vec![],
            query: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self{
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self{
        self.query.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: &str) -> Self{
        self.body = Some(body.to_string());
        self
    }

    /* header names are case insensitive on the wire */
    pub fn header(&self, name: &str) -> Option<&str>{
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn query_param(&self, key: &str) -> Option<&str>{
        self.query.get(key).map(String::as_str)
    }

}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route{
    Auth,
    Withdrawals,
    Analytics,
    Unknown,
}

impl Route{

    pub fn resolve(path: &str) -> Self{
        let trimmed = path.trim_end_matches('/');
        match trimmed{
            "/auth" => Route::Auth,
            "/withdrawals" => Route::Withdrawals,
            "/analytics" => Route::Analytics,
            _ => Route::Unknown,
        }
    }

    /* what the pre-flight answer advertises */
    pub fn allowed_methods(&self) -> &'static str{
        match self{
            Route::Auth => "GET, POST, OPTIONS",
            Route::Withdrawals => "GET, POST, PUT, OPTIONS",
            Route::Analytics => "GET, OPTIONS",
            Route::Unknown => "GET, POST, PUT, OPTIONS",
        }
    }

}

pub type PanelResult = Result<ResponseEnvelope, PanelError>;

/*
    everything a request needs and nothing it could mutate, built once
    in main() and shared across the workers behind an Arc
*/
pub struct Panel{
    env: Env,
    authority: TokenAuthority,
    source: Option<Arc<dyn ConnectionSource>>,
    workbook: Option<Arc<dyn WorkbookWriter>>,
    token_ttl: Duration,
}

impl Panel{

    pub fn new(env: Env, source: Option<Arc<dyn ConnectionSource>>, workbook: Option<Arc<dyn WorkbookWriter>>) -> Self{
        let authority = TokenAuthority::new(&env.jwt_secret());
        /* from_lookup bounds the ttl, an Env built by hand may not */
        let token_ttl = Duration::try_hours(env.TOKEN_TTL_HOURS)
            .filter(|ttl| *ttl > Duration::zero())
            .unwrap_or_else(|| Duration::hours(DEFAULT_TOKEN_TTL_HOURS));
        Panel{ env, authority, source, workbook, token_ttl }
    }

    pub fn authority(&self) -> &TokenAuthority{
        &self.authority
    }

    pub fn token_ttl(&self) -> Duration{
        self.token_ttl
    }

    pub fn workbook(&self) -> Option<&dyn WorkbookWriter>{
        self.workbook.as_deref()
    }

    /* the gate of every protected route, runs before anything touches storage */
    pub fn authorize(&self, req: &PanelRequest, method_name: &str) -> Result<Principal, PanelError>{
        req.authorize(&self.authority).map_err(|e| PanelError::new(e, method_name))
    }

    /* a route that needs the database can't do anything without a configured one */
    pub fn require_database(&self, method_name: &str) -> Result<(), PanelError>{
        self.env.database_url().map_err(|e| PanelError::new(e, method_name))?;
        if self.source.is_none(){
            return Err(PanelError::new(ConfigError::MissingDatabaseUrl, method_name));
        }
        Ok(())
    }

    /*
        checks one repository out of the source, the caller owns it for
        the rest of the request and dropping it releases the connection
    */
    pub fn repository(&self, method_name: &str) -> Result<Box<dyn Repository>, PanelError>{
        let Some(source) = self.source.as_ref() else{
            return Err(PanelError::new(ConfigError::MissingDatabaseUrl, method_name));
        };
        source.acquire().map_err(|e: StorageError| PanelError::new(e, method_name))
    }

    pub fn dispatch(&self, req: &PanelRequest) -> ResponseEnvelope{

        let route = Route::resolve(&req.path);
        if req.method == HttpMethod::Options{
            return ResponseEnvelope::preflight(route.allowed_methods());
        }

        let res = match route{
            Route::Auth => auth::handle(self, req),
            Route::Withdrawals => withdrawals::handle(self, req),
            Route::Analytics => analytics::handle(self, req),
            Route::Unknown => Err(PanelError::new(ErrorKind::NotFound(ROUTE_NOT_FOUND), "dispatch")),
        };

        res.unwrap_or_else(PanelError::respond)
    }

}

/* an absent or blank body reads as an empty json object */
pub fn json_body<T: DeserializeOwned>(req: &PanelRequest, method_name: &str) -> Result<T, PanelError>{
    let raw = req.body.as_deref().filter(|b| !b.trim().is_empty()).unwrap_or("{}");
    serde_json::from_str::<T>(raw)
        .map_err(|e| PanelError::new(ValidationError::InvalidBody(e.to_string()), method_name))
}

pub fn method_not_allowed(req: &PanelRequest, method_name: &str) -> PanelError{
    PanelError::new(ErrorKind::MethodNotSupported(req.method.as_str().to_string()), method_name)
}
