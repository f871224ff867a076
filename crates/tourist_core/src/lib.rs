//! Core domain logic for Virtual Tourist.
//! Pins, their Flickr-sourced photo albums and the saved map viewport live
//! here; UI shells only render what these services return.

pub mod db;
pub mod feed;
pub mod flickr;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use feed::{
    ChangeEvent, ChangeHub, ChangeKind, ChangeListener, ChangeRecorder, Collection, SubscriptionId,
};
pub use flickr::{
    FlickrClient, FlickrConfig, FlickrError, FlickrPhoto, HttpResponse, HttpTransport, PhotoSearch,
    ReqwestTransport, SearchDisabled, TransportError,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::coordinate::{Coordinate, CoordinateError};
pub use model::photo::{Photo, PhotoId};
pub use model::pin::{Pin, PinId};
pub use model::region::{MapRegion, RegionSpan, SavedMapRegion};
pub use repo::photo_repo::{PhotoRepository, SqlitePhotoRepository};
pub use repo::pin_repo::{PinRepository, SqlitePinRepository};
pub use repo::preference_repo::{PreferenceRepository, SqlitePreferenceRepository};
pub use repo::{RepoError, RepoResult};
pub use service::album_service::{AlbumError, AlbumPage, AlbumService, AlbumSource};
pub use service::pin_service::{PinService, PinServiceError};
pub use service::region_service::RegionService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
