//! Flickr photo search client.
//!
//! # Responsibility
//! - Build the single `flickr.photos.search` GET request for a coordinate.
//! - Parse the nested JSON response into medium-resolution image URLs.
//!
//! # Invariants
//! - The request carries exactly the fixed parameter set plus `lat`/`lon`.
//! - Any transport, status or parse failure is reported as one `FlickrError`;
//!   no partial URL list is ever returned alongside an error.
//! - No pagination, retry or rate limiting.

mod client;
mod config;
mod response;
mod transport;

pub use client::{FlickrClient, PhotoSearch, SearchDisabled};
pub use config::{FlickrConfig, DEFAULT_ENDPOINT};
pub use response::{parse_search_response, FlickrPhoto};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};

use crate::model::coordinate::CoordinateError;
use thiserror::Error;

pub type FlickrResult<T> = Result<T, FlickrError>;

/// Failure of a photo search call.
#[derive(Debug, Error)]
pub enum FlickrError {
    #[error("photo search request failed: {0}")]
    Transport(#[from] TransportError),
    #[error("photo search returned HTTP status {0}")]
    Status(u16),
    #[error("photo search reported failure {code}: {message}")]
    Api { code: i64, message: String },
    #[error("could not parse photo search response: {0}")]
    Parse(String),
    #[error(transparent)]
    InvalidCoordinate(#[from] CoordinateError),
    #[error("photo search is not configured: {0}")]
    Config(String),
}
