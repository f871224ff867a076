//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate repositories, the photo search client and the change feed
//!   into the operations a map/album UI performs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod album_service;
pub mod pin_service;
pub mod region_service;
