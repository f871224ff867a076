//! Pin repository contract and SQLite implementation.
//!
//! # Invariants
//! - Pins are listed newest first; rows created in the same millisecond fall
//!   back to reverse insertion order.
//! - Deleting a pin cascades to its photos through the foreign key.

use super::{parse_uuid, RepoError, RepoResult};
use crate::model::coordinate::Coordinate;
use crate::model::pin::{Pin, PinId};
use rusqlite::{params, Connection, Row};

const PIN_SELECT_SQL: &str = "SELECT uuid, latitude, longitude, created_at FROM pins";
const PIN_ORDER_SQL: &str = "ORDER BY created_at DESC, rowid DESC";

/// Repository interface for pin persistence.
pub trait PinRepository {
    fn create_pin(&self, pin: &Pin) -> RepoResult<PinId>;
    fn get_pin(&self, id: PinId) -> RepoResult<Option<Pin>>;
    /// All pins, newest first.
    fn list_pins(&self) -> RepoResult<Vec<Pin>>;
    fn delete_pin(&self, id: PinId) -> RepoResult<()>;
    /// Newest pin whose coordinate equals `coordinate` exactly.
    fn find_pin_at(&self, coordinate: Coordinate) -> RepoResult<Option<Pin>>;
}

/// SQLite-backed pin repository.
pub struct SqlitePinRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePinRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PinRepository for SqlitePinRepository<'_> {
    fn create_pin(&self, pin: &Pin) -> RepoResult<PinId> {
        pin.coordinate().validate()?;

        self.conn.execute(
            "INSERT INTO pins (uuid, latitude, longitude, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                pin.id.to_string(),
                pin.latitude,
                pin.longitude,
                pin.created_at
            ],
        )?;

        Ok(pin.id)
    }

    fn get_pin(&self, id: PinId) -> RepoResult<Option<Pin>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PIN_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_pin_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_pins(&self) -> RepoResult<Vec<Pin>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PIN_SELECT_SQL} {PIN_ORDER_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut pins = Vec::new();
        while let Some(row) = rows.next()? {
            pins.push(parse_pin_row(row)?);
        }
        Ok(pins)
    }

    fn delete_pin(&self, id: PinId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM pins WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "pin",
                id: id.0,
            });
        }
        Ok(())
    }

    fn find_pin_at(&self, coordinate: Coordinate) -> RepoResult<Option<Pin>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PIN_SELECT_SQL}
             WHERE latitude = ?1 AND longitude = ?2
             {PIN_ORDER_SQL}
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query(params![coordinate.latitude, coordinate.longitude])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_pin_row(row)?)),
            None => Ok(None),
        }
    }
}

fn parse_pin_row(row: &Row<'_>) -> RepoResult<Pin> {
    let uuid_text: String = row.get("uuid")?;
    let pin = Pin {
        id: PinId(parse_uuid(&uuid_text, "pins.uuid")?),
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        created_at: row.get("created_at")?,
    };
    pin.coordinate().validate().map_err(|err| {
        RepoError::InvalidData(format!("pin {uuid_text} has invalid coordinate: {err}"))
    })?;
    Ok(pin)
}
