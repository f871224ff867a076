//! Change subscription for observed pin and album lists.
//!
//! # Responsibility
//! - Describe row-level insert/delete changes with list positions a view can
//!   apply incrementally.
//! - Fan events out to registered listeners in subscription order.
//!
//! # Invariants
//! - Pin list positions are newest-first; album positions follow insertion
//!   order.
//! - Delete positions refer to the list before removal. Batched deletes are
//!   published from the highest position down.

mod hub;
mod recorder;

pub use hub::{ChangeHub, SubscriptionId};
pub use recorder::ChangeRecorder;

use crate::model::pin::PinId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which observed list a change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "pin_id")]
pub enum Collection {
    Pins,
    Album(PinId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Delete,
}

/// One row-level change of an observed list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub collection: Collection,
    pub kind: ChangeKind,
    pub index: usize,
    /// Id of the pin or photo that changed.
    pub record_id: Uuid,
}

impl ChangeEvent {
    pub fn insert(collection: Collection, index: usize, record_id: Uuid) -> Self {
        Self {
            collection,
            kind: ChangeKind::Insert,
            index,
            record_id,
        }
    }

    pub fn delete(collection: Collection, index: usize, record_id: Uuid) -> Self {
        Self {
            collection,
            kind: ChangeKind::Delete,
            index,
            record_id,
        }
    }
}

/// Receiver of change events. Called synchronously on the publishing thread.
pub trait ChangeListener: Send + Sync {
    fn on_change(&self, event: &ChangeEvent);
}
