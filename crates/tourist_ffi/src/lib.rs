//! Flutter-facing bridge over `tourist_core`.

pub mod api;
