//! Saved map viewport service.
//!
//! The viewport is written as four scalar preferences and only when the
//! region change came from the user, so programmatic recentering never
//! overwrites the user's last view.

use crate::model::coordinate::{Coordinate, CoordinateError};
use crate::model::region::{MapRegion, RegionSpan, SavedMapRegion};
use crate::repo::preference_repo::PreferenceRepository;
use crate::repo::RepoResult;
use log::{debug, warn};

pub const LATITUDE_KEY: &str = "latitude";
pub const LONGITUDE_KEY: &str = "longitude";
pub const LATITUDE_DELTA_KEY: &str = "latitudeDelta";
pub const LONGITUDE_DELTA_KEY: &str = "longitudeDelta";

pub struct RegionService<R: PreferenceRepository> {
    repo: R,
}

impl<R: PreferenceRepository> RegionService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores `region` when the change was user-driven.
    ///
    /// Returns whether anything was written.
    pub fn record_region_change(
        &self,
        region: &MapRegion,
        from_user_interaction: bool,
    ) -> RepoResult<bool> {
        if !from_user_interaction {
            return Ok(false);
        }
        region.center.validate()?;
        RegionSpan::new(region.span.latitude_delta, region.span.longitude_delta)?;

        self.repo.set_f64(LATITUDE_KEY, region.center.latitude)?;
        self.repo.set_f64(LONGITUDE_KEY, region.center.longitude)?;
        self.repo
            .set_f64(LATITUDE_DELTA_KEY, region.span.latitude_delta)?;
        self.repo
            .set_f64(LONGITUDE_DELTA_KEY, region.span.longitude_delta)?;
        debug!("event=region_save module=region status=ok");
        Ok(true)
    }

    /// Reads back whatever part of the viewport is stored.
    pub fn saved_region(&self) -> RepoResult<SavedMapRegion> {
        let center = match (
            self.repo.get_f64(LATITUDE_KEY)?,
            self.repo.get_f64(LONGITUDE_KEY)?,
        ) {
            (Some(latitude), Some(longitude)) => Coordinate::new(latitude, longitude)
                .map_err(|err| skip_invalid("center", &err))
                .ok(),
            _ => None,
        };
        let span = match (
            self.repo.get_f64(LATITUDE_DELTA_KEY)?,
            self.repo.get_f64(LONGITUDE_DELTA_KEY)?,
        ) {
            (Some(latitude_delta), Some(longitude_delta)) => {
                RegionSpan::new(latitude_delta, longitude_delta)
                    .map_err(|err| skip_invalid("span", &err))
                    .ok()
            }
            _ => None,
        };
        Ok(SavedMapRegion { center, span })
    }
}

fn skip_invalid(part: &str, err: &CoordinateError) {
    warn!("event=region_load module=region status=skip part={part} error={err}");
}
