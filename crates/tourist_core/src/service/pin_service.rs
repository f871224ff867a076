//! Pin use-case service.
//!
//! # Invariants
//! - Every successful write or delete publishes exactly one `Pins` change.
//! - Deleting one pin leaves the remaining pins in unchanged relative order.

use crate::feed::{ChangeEvent, ChangeHub, Collection};
use crate::model::coordinate::{Coordinate, CoordinateError};
use crate::model::pin::{Pin, PinId};
use crate::repo::pin_repo::PinRepository;
use crate::repo::{RepoError, RepoResult};
use log::info;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PinServiceError {
    #[error(transparent)]
    InvalidCoordinate(#[from] CoordinateError),
    #[error("pin not found: {0}")]
    PinNotFound(PinId),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for PinServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::InvalidCoordinate(err),
            RepoError::NotFound { entity: "pin", id } => Self::PinNotFound(PinId(id)),
            other => Self::Repo(other),
        }
    }
}

/// Pin service facade over a repository and the shared change feed.
pub struct PinService<R: PinRepository> {
    repo: R,
    feed: Arc<ChangeHub>,
}

impl<R: PinRepository> PinService<R> {
    pub fn new(repo: R, feed: Arc<ChangeHub>) -> Self {
        Self { repo, feed }
    }

    /// Persists a pin at `coordinate` and announces its list position.
    pub fn drop_pin(&self, coordinate: Coordinate) -> Result<Pin, PinServiceError> {
        let pin = Pin::new(coordinate)?;
        self.repo.create_pin(&pin)?;

        let index = self
            .repo
            .list_pins()?
            .iter()
            .position(|stored| stored.id == pin.id)
            .unwrap_or(0);
        info!(
            "event=pin_create module=pin status=ok pin_id={} index={}",
            pin.id, index
        );
        self.feed
            .publish(ChangeEvent::insert(Collection::Pins, index, pin.id.0));
        Ok(pin)
    }

    /// All pins, newest first.
    pub fn list_pins(&self) -> RepoResult<Vec<Pin>> {
        self.repo.list_pins()
    }

    pub fn get_pin(&self, id: PinId) -> RepoResult<Option<Pin>> {
        self.repo.get_pin(id)
    }

    /// Resolves a selected map annotation back to its stored pin.
    pub fn pin_at(&self, coordinate: Coordinate) -> RepoResult<Option<Pin>> {
        self.repo.find_pin_at(coordinate)
    }

    /// Deletes a pin and its album.
    pub fn delete_pin(&self, id: PinId) -> Result<(), PinServiceError> {
        let index = self
            .repo
            .list_pins()?
            .iter()
            .position(|pin| pin.id == id)
            .ok_or(PinServiceError::PinNotFound(id))?;
        self.repo.delete_pin(id)?;

        info!(
            "event=pin_delete module=pin status=ok pin_id={} index={}",
            id, index
        );
        self.feed
            .publish(ChangeEvent::delete(Collection::Pins, index, id.0));
        Ok(())
    }
}
