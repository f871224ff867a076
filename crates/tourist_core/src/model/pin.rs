//! Pin domain model.
//!
//! # Responsibility
//! - Represent one saved map coordinate and its creation time.
//!
//! # Invariants
//! - `id` is stable and never reused for another pin.
//! - A pin is never mutated after creation; it is only deleted.

use super::coordinate::{Coordinate, CoordinateError};
use super::now_epoch_ms;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinId(pub Uuid);

impl PinId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses the hyphenated string form used by the bridge and CLI.
    pub fn parse(value: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(value.trim()).map(Self)
    }
}

impl Default for PinId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PinId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// A saved map coordinate owning zero or more photos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub id: PinId,
    pub latitude: f64,
    pub longitude: f64,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Pin {
    /// Creates a pin at `coordinate` stamped with the current time.
    pub fn new(coordinate: Coordinate) -> Result<Self, CoordinateError> {
        coordinate.validate()?;
        Ok(Self {
            id: PinId::new(),
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            created_at: now_epoch_ms(),
        })
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Exact-match test used to resolve a selected map annotation to its pin.
    pub fn is_at(&self, coordinate: Coordinate) -> bool {
        self.latitude == coordinate.latitude && self.longitude == coordinate.longitude
    }
}
