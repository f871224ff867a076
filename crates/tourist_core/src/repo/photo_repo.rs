//! Photo repository contract and SQLite implementation.
//!
//! # Invariants
//! - Album listing is in insertion order (`created_at ASC`, then rowid).
//! - A photo can only be written for an existing pin (foreign key).

use super::{parse_uuid, RepoError, RepoResult};
use crate::model::photo::{Photo, PhotoId};
use crate::model::pin::PinId;
use rusqlite::{params, Connection, Row};

const PHOTO_SELECT_SQL: &str = "SELECT uuid, pin_uuid, image_data, created_at FROM photos";
const PHOTO_ORDER_SQL: &str = "ORDER BY created_at ASC, rowid ASC";

/// Repository interface for album photo persistence.
pub trait PhotoRepository {
    fn create_photo(&self, photo: &Photo) -> RepoResult<PhotoId>;
    /// Photos of one pin in insertion order.
    fn list_photos(&self, pin_id: PinId) -> RepoResult<Vec<Photo>>;
    fn count_photos(&self, pin_id: PinId) -> RepoResult<u32>;
    fn delete_photo(&self, id: PhotoId) -> RepoResult<()>;
    /// Removes the whole album and returns removed ids in album order.
    fn delete_photos_for_pin(&self, pin_id: PinId) -> RepoResult<Vec<PhotoId>>;
}

/// SQLite-backed photo repository.
pub struct SqlitePhotoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePhotoRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PhotoRepository for SqlitePhotoRepository<'_> {
    fn create_photo(&self, photo: &Photo) -> RepoResult<PhotoId> {
        self.conn.execute(
            "INSERT INTO photos (uuid, pin_uuid, image_data, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                photo.id.to_string(),
                photo.pin_id.to_string(),
                photo.image_data.as_slice(),
                photo.created_at
            ],
        )?;
        Ok(photo.id)
    }

    fn list_photos(&self, pin_id: PinId) -> RepoResult<Vec<Photo>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PHOTO_SELECT_SQL} WHERE pin_uuid = ?1 {PHOTO_ORDER_SQL};"
        ))?;
        let mut rows = stmt.query([pin_id.to_string()])?;
        let mut photos = Vec::new();
        while let Some(row) = rows.next()? {
            photos.push(parse_photo_row(row)?);
        }
        Ok(photos)
    }

    fn count_photos(&self, pin_id: PinId) -> RepoResult<u32> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM photos WHERE pin_uuid = ?1;",
            [pin_id.to_string()],
            |row| row.get::<_, u32>(0),
        )?;
        Ok(count)
    }

    fn delete_photo(&self, id: PhotoId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM photos WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "photo",
                id: id.0,
            });
        }
        Ok(())
    }

    fn delete_photos_for_pin(&self, pin_id: PinId) -> RepoResult<Vec<PhotoId>> {
        let removed = self
            .list_photos(pin_id)?
            .into_iter()
            .map(|photo| photo.id)
            .collect::<Vec<_>>();
        self.conn.execute(
            "DELETE FROM photos WHERE pin_uuid = ?1;",
            [pin_id.to_string()],
        )?;
        Ok(removed)
    }
}

fn parse_photo_row(row: &Row<'_>) -> RepoResult<Photo> {
    let uuid_text: String = row.get("uuid")?;
    let pin_text: String = row.get("pin_uuid")?;
    Ok(Photo {
        id: PhotoId(parse_uuid(&uuid_text, "photos.uuid")?),
        pin_id: PinId(parse_uuid(&pin_text, "photos.pin_uuid")?),
        image_data: row.get("image_data")?,
        created_at: row.get("created_at")?,
    })
}
