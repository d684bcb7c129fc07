// src/error.rs

use thiserror::Error;
//
use crate::view::BoxId;

/// Every failure the view and its sources can surface.
#[derive(Error, Debug)]
pub enum ViewError {
    /// Transport failure or timeout talking to the supplier endpoint.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("{url} returned {status}")]
    Status { status: u16, url: String },

    /// The response body was not a JSON array of suppliers.
    #[error("malformed supplier list: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("tracing init failed: {0}")]
    Tracing(String),

    #[error("catalog: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A catalog row carried a contract start that is not `YYYY-MM-DD`.
    #[error("supplier {supplier:?} has invalid contract start {value:?}")]
    InvalidDate { supplier: String, value: String },

    #[error("no supplier box with id {0}")]
    UnknownBox(BoxId),
}

pub type Result<T> = std::result::Result<T, ViewError>;
