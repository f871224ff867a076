//! Saved map viewport.
//!
//! The viewport is persisted as four independent scalars, so a read may find
//! only some of them. Center and span are restored independently, each only
//! when both of its components are present.

use super::coordinate::{Coordinate, CoordinateError};
use serde::{Deserialize, Serialize};

/// Visible extent of the map in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionSpan {
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl RegionSpan {
    pub fn new(latitude_delta: f64, longitude_delta: f64) -> Result<Self, CoordinateError> {
        let valid = |value: f64| value.is_finite() && value >= 0.0;
        if !valid(latitude_delta) || !valid(longitude_delta) {
            return Err(CoordinateError::InvalidSpan {
                latitude_delta,
                longitude_delta,
            });
        }
        Ok(Self {
            latitude_delta,
            longitude_delta,
        })
    }
}

/// A full map viewport as reported by the map view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapRegion {
    pub center: Coordinate,
    pub span: RegionSpan,
}

/// Viewport restored from preferences; either half may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedMapRegion {
    pub center: Option<Coordinate>,
    pub span: Option<RegionSpan>,
}

impl SavedMapRegion {
    pub fn is_empty(&self) -> bool {
        self.center.is_none() && self.span.is_none()
    }
}
