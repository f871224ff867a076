//! Photo album use-case service.
//!
//! # Responsibility
//! - Serve a pin's stored album, populating it from photo search on a miss.
//! - Replace an album with a fresh search result on request.
//!
//! # Invariants
//! - `new_collection` removes every stored photo of the pin before the search
//!   is issued, so no old photo survives next to new ones.
//! - Album writes are not grouped in a transaction. A failed write is logged
//!   and counted; the loop continues with the next URL.
//! - A failed search leaves the album empty. Transport, status and parse
//!   failures are reported as retryable.

use crate::feed::{ChangeEvent, ChangeHub, Collection};
use crate::flickr::{FlickrError, PhotoSearch};
use crate::model::photo::{Photo, PhotoId};
use crate::model::pin::{Pin, PinId};
use crate::repo::photo_repo::PhotoRepository;
use crate::repo::pin_repo::PinRepository;
use crate::repo::{RepoError, RepoResult};
use log::{info, warn};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlbumError {
    #[error("pin not found: {0}")]
    PinNotFound(PinId),
    #[error("photo not found: {0}")]
    PhotoNotFound(PhotoId),
    #[error(transparent)]
    Search(#[from] FlickrError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl AlbumError {
    /// Whether re-invoking the same call may succeed.
    ///
    /// True for transport, HTTP status and parse failures of the search.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Search(
                FlickrError::Transport(_) | FlickrError::Status(_) | FlickrError::Parse(_)
            )
        )
    }
}

/// Where the photos of an [`AlbumPage`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbumSource {
    Stored,
    Fetched,
}

/// Album contents after a load or refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumPage {
    pub pin: Pin,
    /// Photos in album order.
    pub photos: Vec<Photo>,
    pub source: AlbumSource,
    /// Photo writes that failed during population.
    pub failed_writes: usize,
}

impl AlbumPage {
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn image_urls(&self) -> Vec<&str> {
        self.photos.iter().filter_map(Photo::image_url).collect()
    }
}

pub struct AlbumService<P, R, S>
where
    P: PinRepository,
    R: PhotoRepository,
    S: PhotoSearch,
{
    pins: P,
    photos: R,
    search: S,
    feed: Arc<ChangeHub>,
}

impl<P, R, S> AlbumService<P, R, S>
where
    P: PinRepository,
    R: PhotoRepository,
    S: PhotoSearch,
{
    pub fn new(pins: P, photos: R, search: S, feed: Arc<ChangeHub>) -> Self {
        Self {
            pins,
            photos,
            search,
            feed,
        }
    }

    /// Returns the stored album, searching only when it is empty.
    pub fn load_album(&self, pin_id: PinId) -> Result<AlbumPage, AlbumError> {
        let pin = self.require_pin(pin_id)?;
        let stored = self.photos.list_photos(pin_id)?;
        if !stored.is_empty() {
            return Ok(AlbumPage {
                pin,
                photos: stored,
                source: AlbumSource::Stored,
                failed_writes: 0,
            });
        }

        self.populate(pin)
    }

    /// Discards the current album and fills it from a new search.
    pub fn new_collection(&self, pin_id: PinId) -> Result<AlbumPage, AlbumError> {
        let pin = self.require_pin(pin_id)?;
        let removed = self.clear(pin_id)?;
        info!(
            "event=album_reset module=album status=ok pin_id={} removed={}",
            pin_id, removed
        );
        self.populate(pin)
    }

    /// Removes all photos of a pin without searching again.
    pub fn clear_album(&self, pin_id: PinId) -> Result<usize, AlbumError> {
        self.require_pin(pin_id)?;
        Ok(self.clear(pin_id)?)
    }

    /// Removes a single photo from a pin's album.
    pub fn remove_photo(&self, pin_id: PinId, photo_id: PhotoId) -> Result<(), AlbumError> {
        self.require_pin(pin_id)?;
        let index = self
            .photos
            .list_photos(pin_id)?
            .iter()
            .position(|photo| photo.id == photo_id)
            .ok_or(AlbumError::PhotoNotFound(photo_id))?;
        self.photos.delete_photo(photo_id)?;
        self.feed.publish(ChangeEvent::delete(
            Collection::Album(pin_id),
            index,
            photo_id.0,
        ));
        Ok(())
    }

    fn require_pin(&self, pin_id: PinId) -> Result<Pin, AlbumError> {
        self.pins
            .get_pin(pin_id)?
            .ok_or(AlbumError::PinNotFound(pin_id))
    }

    fn clear(&self, pin_id: PinId) -> RepoResult<usize> {
        let removed = self.photos.delete_photos_for_pin(pin_id)?;
        let collection = Collection::Album(pin_id);
        self.feed.publish_all(
            removed
                .iter()
                .enumerate()
                .rev()
                .map(|(index, id)| ChangeEvent::delete(collection, index, id.0)),
        );
        Ok(removed.len())
    }

    /// Searches at the pin and writes one photo per returned URL.
    ///
    /// Expects the album to be empty on entry.
    fn populate(&self, pin: Pin) -> Result<AlbumPage, AlbumError> {
        let hits = self.search.search_photos(pin.coordinate())?;
        let collection = Collection::Album(pin.id);
        let mut written = 0usize;
        let mut failed_writes = 0usize;

        for url in hits.iter().filter_map(|hit| hit.image_url.as_deref()) {
            let photo = Photo::from_url(pin.id, url);
            match self.photos.create_photo(&photo) {
                Ok(photo_id) => {
                    self.feed
                        .publish(ChangeEvent::insert(collection, written, photo_id.0));
                    written += 1;
                }
                Err(err) => {
                    failed_writes += 1;
                    warn!(
                        "event=photo_create module=album status=error pin_id={} error={}",
                        pin.id, err
                    );
                }
            }
        }

        info!(
            "event=album_populate module=album status=ok pin_id={} hits={} written={} failed={}",
            pin.id,
            hits.len(),
            written,
            failed_writes
        );
        let photos = self.photos.list_photos(pin.id)?;
        Ok(AlbumPage {
            pin,
            photos,
            source: AlbumSource::Fetched,
            failed_writes,
        })
    }
}
