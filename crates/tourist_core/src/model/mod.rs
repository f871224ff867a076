//! Domain model for pins, their photo albums and the saved map region.
//!
//! # Responsibility
//! - Define the records shared by storage, services and the bridge layer.
//! - Validate coordinates before they reach persistence.
//!
//! # Invariants
//! - Every pin and photo is identified by a stable UUID.
//! - Photos always belong to exactly one pin.

pub mod coordinate;
pub mod photo;
pub mod pin;
pub mod region;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in Unix epoch milliseconds.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
