use super::config::FlickrConfig;
use super::response::{parse_search_response, FlickrPhoto};
use super::transport::{HttpTransport, ReqwestTransport};
use super::{FlickrError, FlickrResult};
use crate::model::coordinate::Coordinate;
use log::{info, warn};
use std::time::Instant;
use url::Url;

const SEARCH_METHOD: &str = "flickr.photos.search";
const EXTRAS_MEDIUM_URL: &str = "url_m";
const RESPONSE_FORMAT: &str = "json";

/// Photo lookup by coordinate, implemented by [`FlickrClient`] and by fakes.
pub trait PhotoSearch {
    fn search_photos(&self, coordinate: Coordinate) -> FlickrResult<Vec<FlickrPhoto>>;
}

impl<S: PhotoSearch + ?Sized> PhotoSearch for &S {
    fn search_photos(&self, coordinate: Coordinate) -> FlickrResult<Vec<FlickrPhoto>> {
        (**self).search_photos(coordinate)
    }
}

/// Stand-in for album edits that never search; every call fails with
/// [`FlickrError::Config`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchDisabled;

impl PhotoSearch for SearchDisabled {
    fn search_photos(&self, _coordinate: Coordinate) -> FlickrResult<Vec<FlickrPhoto>> {
        Err(FlickrError::Config(
            "photo search is disabled for this call".to_string(),
        ))
    }
}

/// Single-endpoint search client.
pub struct FlickrClient<T: HttpTransport = ReqwestTransport> {
    config: FlickrConfig,
    transport: T,
}

impl FlickrClient<ReqwestTransport> {
    /// Client backed by a real HTTP transport.
    pub fn connect(config: FlickrConfig) -> FlickrResult<Self> {
        Ok(Self::with_transport(config, ReqwestTransport::new()?))
    }
}

impl<T: HttpTransport> FlickrClient<T> {
    pub fn with_transport(config: FlickrConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &FlickrConfig {
        &self.config
    }

    /// Builds the search URL for `coordinate`.
    ///
    /// Coordinates are rendered with Rust's shortest round-trip float
    /// formatting, so `lat`/`lon` parse back to the exact input.
    pub fn search_url(&self, coordinate: Coordinate) -> Url {
        let mut url = self.config.endpoint.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("method", SEARCH_METHOD)
            .append_pair("api_key", &self.config.api_key)
            .append_pair("lat", &coordinate.latitude.to_string())
            .append_pair("lon", &coordinate.longitude.to_string())
            .append_pair("extras", EXTRAS_MEDIUM_URL)
            .append_pair("format", RESPONSE_FORMAT)
            .append_pair("nojsoncallback", "1");
        url
    }
}

impl<T: HttpTransport> PhotoSearch for FlickrClient<T> {
    fn search_photos(&self, coordinate: Coordinate) -> FlickrResult<Vec<FlickrPhoto>> {
        coordinate.validate()?;

        let started_at = Instant::now();
        let url = self.search_url(coordinate);
        let result = self
            .transport
            .get(&url)
            .map_err(FlickrError::from)
            .and_then(|response| {
                if !(200..300).contains(&response.status) {
                    return Err(FlickrError::Status(response.status));
                }
                parse_search_response(&response.body)
            });

        match &result {
            Ok(photos) => info!(
                "event=photo_search module=flickr status=ok results={} with_url={} duration_ms={}",
                photos.len(),
                photos.iter().filter(|photo| photo.image_url.is_some()).count(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=photo_search module=flickr status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}
