


/*
   -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=
        BACKOFFICE PANEL CUSTOM ERROR HANDLER
   -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=

   every failure of a request ends up as a PanelError which
   carries the status code and the message the client sees,
   the kind keeps the real cause for the logs only
*/


use log::{error, warn};
use thiserror::Error;
use crate::constants::*;
use crate::envelope::ResponseEnvelope;


#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError{
    #[error("no token in the request")]
    Missing,
    #[error("token signature or claims are invalid")]
    Malformed,
    #[error("token has expired")]
    Expired,
    #[error("token can't be decoded")]
    Unreadable,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError{
    #[error("missing required fields")]
    MissingFields,
    #[error("username or password is empty")]
    MissingCredentials,
    #[error("`{0}` is not a withdrawal status")]
    InvalidStatus(String),
    #[error("can't decode request body: {0}")]
    InvalidBody(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError{
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,
    #[error("invalid value `{value}` for {key}")]
    InvalidValue{
        key: &'static str,
        value: String,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError{
    #[error("no workbook writer is available")]
    Unavailable,
    #[error("workbook writer failed: {0}")]
    Writer(String),
}

#[derive(Debug, Error)]
pub enum StorageError{
    #[error("can't check out a connection: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("query failed: {0}")]
    Diesel(#[from] diesel::result::Error),
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ErrorKind{
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("wrong username or password")]
    InvalidCredentials,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("method `{0}` is not supported on this route")]
    MethodNotSupported(String),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Internal(String),
}

#[derive(Debug)]
pub struct PanelError{
    pub code: u16,
    pub msg: String, // what the client gets
    pub kind: ErrorKind, // due to what
    pub method_name: String, // in what method
}

impl ErrorKind{

    fn code_and_message(&self) -> (u16, &'static str){
        match self{
            ErrorKind::Auth(_) => (401, UNAUTHORIZED),
            ErrorKind::InvalidCredentials => (401, INVALID_CREDENTIALS),
            ErrorKind::Validation(v) => match v{
                ValidationError::MissingFields => (400, MISSING_REQUIRED_FIELDS),
                ValidationError::MissingCredentials => (400, CREDENTIALS_REQUIRED),
                ValidationError::InvalidStatus(_) => (400, INVALID_STATUS),
                ValidationError::InvalidBody(_) => (400, INVALID_BODY),
            },
            ErrorKind::Config(ConfigError::MissingDatabaseUrl) => (500, DB_CONFIG_ERROR),
            ErrorKind::Config(_) => (500, INTERNAL_SERVER_ERROR),
            ErrorKind::Export(ExportError::Unavailable) => (500, EXPORT_NOT_AVAILABLE),
            ErrorKind::Export(_) => (500, INTERNAL_SERVER_ERROR),
            ErrorKind::Storage(_) => (500, INTERNAL_SERVER_ERROR),
            ErrorKind::MethodNotSupported(_) => (405, METHOD_NOT_ALLOWED),
            ErrorKind::NotFound(msg) => (404, *msg),
            ErrorKind::Internal(_) => (500, INTERNAL_SERVER_ERROR),
        }
    }
}

impl From<(ErrorKind, &str)> for PanelError{
    fn from(kind_method: (ErrorKind, &str)) -> PanelError{
        let (code, msg) = kind_method.0.code_and_message();
        PanelError{ code, msg: msg.to_string(), kind: kind_method.0, method_name: kind_method.1.to_string() }
    }
}

impl PanelError{

    pub fn new(kind: impl Into<ErrorKind>, method_name: &str) -> Self{
        PanelError::from((kind.into(), method_name))
    }

    /* the whoami route tells the client why its token got rejected */
    pub fn with_message(mut self, msg: &str) -> Self{
        self.msg = msg.to_string();
        self
    }

    pub fn write(&self){
        let Self{ code, msg, kind, method_name } = self;
        if *code >= 500{
            error!("code: {} | message: {} | due to: {} | method name: {}", code, msg, kind, method_name);
        } else{
            warn!("code: {} | message: {} | due to: {} | method name: {}", code, msg, kind, method_name);
        }
    }

    /* logs the error then turns it into what goes back to the client */
    pub fn respond(self) -> ResponseEnvelope{
        self.write();
        ResponseEnvelope::error(self.code, &self.msg)
    }

}
