//! Error types for entity API
use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;

use sea_orm::error::DbErr;

/// Errors while executing operations related to entities.
/// The intent is to categorize errors into two major types:
///  * Errors related to data. Ex a record that violates a column constraint
///  * Errors related to interactions with the database itself. Ex DbErr::Conn
#[derive(Debug, PartialEq)]
pub struct Error {
    // Underlying error emitted from seaORM internals
    pub source: Option<DbErr>,
    // Enum representing which category of error
    pub error_kind: EntityApiErrorKind,
}

#[derive(Debug, PartialEq, Serialize)]
pub enum EntityApiErrorKind {
    // A connection could not be established or acquired from the pool in time
    ConnectionUnavailable,
    // Record rejected before reaching the database
    ValidationError,
    // Errors raised while executing a statement. Ex DbErr::Exec
    SystemError,
    // Other errors
    Other,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Entity API Error: {:?}", self)
    }
}

impl StdError for Error {}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        let error_kind = match err {
            DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
                EntityApiErrorKind::ConnectionUnavailable
            }
            DbErr::Exec(_) | DbErr::Query(_) => EntityApiErrorKind::SystemError,
            _ => EntityApiErrorKind::Other,
        };

        Error {
            source: Some(err),
            error_kind,
        }
    }
}
