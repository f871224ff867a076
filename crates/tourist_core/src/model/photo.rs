//! Photo domain model.
//!
//! A photo row stores an opaque byte blob. Album population writes the UTF-8
//! bytes of a medium-resolution image URL, never image bytes.

use super::now_epoch_ms;
use super::pin::PinId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(pub Uuid);

impl PhotoId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(value.trim()).map(Self)
    }
}

impl Default for PhotoId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PhotoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// One stored album entry belonging to a pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    pub pin_id: PinId,
    pub image_data: Vec<u8>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Photo {
    /// Creates a photo whose blob is the UTF-8 encoding of `url`.
    pub fn from_url(pin_id: PinId, url: &str) -> Self {
        Self {
            id: PhotoId::new(),
            pin_id,
            image_data: url.as_bytes().to_vec(),
            created_at: now_epoch_ms(),
        }
    }

    /// Decodes the blob as a URL string; `None` when it is not valid UTF-8.
    pub fn image_url(&self) -> Option<&str> {
        std::str::from_utf8(&self.image_data).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::{Photo, PhotoId};
    use crate::model::pin::PinId;

    #[test]
    fn photo_id_parses_its_display_form() {
        let id = PhotoId::new();
        assert_eq!(PhotoId::parse(&format!(" {id} ")).unwrap(), id);
        assert!(PhotoId::parse("cell-3").is_err());
    }

    #[test]
    fn url_blob_decodes_back_to_text() {
        let photo = Photo::from_url(PinId::new(), "https://live.staticflickr.com/1/2_m.jpg");
        assert_eq!(
            photo.image_url(),
            Some("https://live.staticflickr.com/1/2_m.jpg")
        );
    }

    #[test]
    fn non_utf8_blob_has_no_url() {
        let mut photo = Photo::from_url(PinId::new(), "x");
        photo.image_data = vec![0xff, 0xfe];
        assert_eq!(photo.image_url(), None);
    }
}
