//! Search response decoding.
//!
//! Expected shape: `{"photos": {"photo": [{"url_m": "..."}, ...]}, "stat": "ok"}`.
//! Entries are decoded leniently: a missing or non-string `url_m` becomes
//! `None`, but every entry must be a JSON object.

use super::{FlickrError, FlickrResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const MEDIUM_URL_KEY: &str = "url_m";

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlickrPhoto {
    /// Medium-resolution image URL, when the API provided one.
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
struct SearchEnvelope {
    stat: Option<String>,
    code: Option<i64>,
    message: Option<String>,
    photos: Option<PhotoPage>,
}

#[derive(Deserialize)]
struct PhotoPage {
    photo: Option<Vec<Value>>,
}

/// Decodes a search response body into hits, preserving response order.
pub fn parse_search_response(body: &[u8]) -> FlickrResult<Vec<FlickrPhoto>> {
    let envelope: SearchEnvelope =
        serde_json::from_slice(body).map_err(|err| FlickrError::Parse(err.to_string()))?;

    if envelope.stat.as_deref() == Some("fail") {
        return Err(FlickrError::Api {
            code: envelope.code.unwrap_or_default(),
            message: envelope.message.unwrap_or_default(),
        });
    }

    let entries = envelope
        .photos
        .and_then(|page| page.photo)
        .ok_or_else(|| FlickrError::Parse("missing `photos.photo` array".to_string()))?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            entry
                .as_object()
                .map(photo_from_object)
                .ok_or_else(|| FlickrError::Parse(format!("photo entry {index} is not an object")))
        })
        .collect()
}

fn photo_from_object(object: &Map<String, Value>) -> FlickrPhoto {
    FlickrPhoto {
        image_url: object
            .get(MEDIUM_URL_KEY)
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}
