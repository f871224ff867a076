//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose map, pin and album use-cases to Dart via FRB.
//! - Keep error semantics simple: every call returns a plain envelope.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Photo search runs only in non-`sync` functions, so FRB executes it on a
//!   worker thread and hands the result back to the UI isolate.
//! - All change events flow through one process-wide hub and are buffered
//!   until the UI drains them.

use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use tourist_core::db::open_db;
use tourist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AlbumError, AlbumPage, AlbumService, ChangeEvent, ChangeHub, ChangeKind, ChangeRecorder,
    Collection, Coordinate, FlickrClient, FlickrConfig, MapRegion, Photo, PhotoId, Pin, PinId,
    PinService, RegionService, RegionSpan, ReqwestTransport, SearchDisabled,
    SqlitePhotoRepository, SqlitePinRepository, SqlitePreferenceRepository,
};

const DB_FILE_NAME: &str = "virtual_tourist.sqlite3";
const DB_PATH_ENV: &str = "TOURIST_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

static CHANGE_FEED: Lazy<Arc<ChangeHub>> = Lazy::new(|| Arc::new(ChangeHub::new()));
/// Pending UI changes. Unbounded: the UI must call `changes_drain` after every
/// call that changes pins or photos.
static CHANGE_BUFFER: Lazy<Arc<ChangeRecorder>> = Lazy::new(|| {
    let recorder = Arc::new(ChangeRecorder::new());
    CHANGE_FEED.subscribe(recorder.clone());
    recorder
});

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pin as rendered by the map view.
#[derive(Debug, Clone, PartialEq)]
pub struct PinItem {
    pub pin_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: i64,
}

/// Album cell content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoItem {
    pub photo_id: String,
    /// `None` when the stored blob is not a UTF-8 URL.
    pub image_url: Option<String>,
}

/// One incremental list update for the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeItem {
    /// `pins` or `album`.
    pub collection: String,
    /// Owning pin for album changes.
    pub pin_id: Option<String>,
    /// `insert` or `delete`.
    pub kind: String,
    pub index: u32,
    pub record_id: String,
}

/// Saved viewport; each half is present only when fully stored.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRegionItem {
    pub center_latitude: Option<f64>,
    pub center_longitude: Option<f64>,
    pub latitude_delta: Option<f64>,
    pub longitude_delta: Option<f64>,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}

/// Response of pin creation and lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct PinResponse {
    pub ok: bool,
    pub pin: Option<PinItem>,
    pub message: String,
}

/// Response of album load/refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumResponse {
    pub ok: bool,
    pub photos: Vec<PhotoItem>,
    /// Set when the UI should offer "retry" next to "cancel".
    pub retryable: bool,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

impl PinResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            pin: None,
            message: message.into(),
        }
    }
}

impl AlbumResponse {
    fn failure(message: impl Into<String>, retryable: bool) -> Self {
        Self {
            ok: false,
            photos: Vec::new(),
            retryable,
            message: message.into(),
        }
    }

    fn from_page(page: AlbumPage) -> Self {
        let message = if page.is_empty() {
            "No photos found for this location.".to_string()
        } else {
            format!("{} photo(s).", page.photos.len())
        };
        Self {
            ok: true,
            photos: page.photos.iter().map(to_photo_item).collect(),
            retryable: false,
            message,
        }
    }
}

/// Persists a pin dropped by a long-press at the given coordinate.
#[flutter_rust_bridge::frb(sync)]
pub fn pin_drop(latitude: f64, longitude: f64) -> PinResponse {
    let coordinate = match Coordinate::new(latitude, longitude) {
        Ok(coordinate) => coordinate,
        Err(err) => return PinResponse::failure(format!("pin_drop failed: {err}")),
    };
    match with_pin_service(|service| service.drop_pin(coordinate).map_err(|err| err.to_string())) {
        Ok(pin) => PinResponse {
            ok: true,
            pin: Some(to_pin_item(&pin)),
            message: "Pin saved.".to_string(),
        },
        Err(err) => PinResponse::failure(format!("pin_drop failed: {err}")),
    }
}

/// Lists all pins, newest first. Returns an empty list when storage fails.
#[flutter_rust_bridge::frb(sync)]
pub fn pins_list() -> Vec<PinItem> {
    with_pin_service(|service| service.list_pins().map_err(|err| err.to_string()))
        .map(|pins| pins.iter().map(to_pin_item).collect())
        .unwrap_or_else(|err| {
            log::warn!("event=pins_list module=ffi status=error error={err}");
            Vec::new()
        })
}

/// Resolves a selected annotation back to its pin by exact coordinate.
#[flutter_rust_bridge::frb(sync)]
pub fn pin_at(latitude: f64, longitude: f64) -> PinResponse {
    let coordinate = match Coordinate::new(latitude, longitude) {
        Ok(coordinate) => coordinate,
        Err(err) => return PinResponse::failure(format!("pin_at failed: {err}")),
    };
    match with_pin_service(|service| service.pin_at(coordinate).map_err(|err| err.to_string())) {
        Ok(Some(pin)) => PinResponse {
            ok: true,
            pin: Some(to_pin_item(&pin)),
            message: "Pin found.".to_string(),
        },
        Ok(None) => PinResponse::failure("No pin at this coordinate."),
        Err(err) => PinResponse::failure(format!("pin_at failed: {err}")),
    }
}

/// Deletes a pin together with its album.
#[flutter_rust_bridge::frb(sync)]
pub fn pin_delete(pin_id: String) -> ActionResponse {
    let result = parse_pin_id(&pin_id).and_then(|id| {
        with_pin_service(|service| service.delete_pin(id).map_err(|err| err.to_string()))
    });
    match result {
        Ok(()) => ActionResponse::success("Pin deleted."),
        Err(err) => ActionResponse::failure(format!("pin_delete failed: {err}")),
    }
}

/// Returns the stored album, searching Flickr when it is empty.
pub fn album_load(pin_id: String) -> AlbumResponse {
    run_album(&pin_id, "album_load", |service, id| service.load_album(id))
}

/// Replaces the album with a fresh search result.
///
/// Also serves as the alert's "retry" action after a failed load.
pub fn album_new_collection(pin_id: String) -> AlbumResponse {
    run_album(&pin_id, "album_new_collection", |service, id| {
        service.new_collection(id)
    })
}

/// Removes every photo of a pin's album without searching again.
#[flutter_rust_bridge::frb(sync)]
pub fn album_clear(pin_id: String) -> ActionResponse {
    match with_album_editor(&pin_id, |service, id| service.clear_album(id)) {
        Ok(removed) => ActionResponse::success(format!("Removed {removed} photo(s).")),
        Err(err) => ActionResponse::failure(format!("album_clear failed: {err}")),
    }
}

/// Removes one photo from a pin's album.
#[flutter_rust_bridge::frb(sync)]
pub fn photo_remove(pin_id: String, photo_id: String) -> ActionResponse {
    let photo_id = match PhotoId::parse(&photo_id) {
        Ok(id) => id,
        Err(_) => {
            return ActionResponse::failure(format!(
                "photo_remove failed: invalid photo id `{}`",
                photo_id.trim()
            ));
        }
    };
    match with_album_editor(&pin_id, |service, id| service.remove_photo(id, photo_id)) {
        Ok(()) => ActionResponse::success("Photo removed."),
        Err(err) => ActionResponse::failure(format!("photo_remove failed: {err}")),
    }
}

/// Stores the map viewport when the change came from the user.
#[flutter_rust_bridge::frb(sync)]
pub fn map_region_save(
    center_latitude: f64,
    center_longitude: f64,
    latitude_delta: f64,
    longitude_delta: f64,
    from_user_interaction: bool,
) -> ActionResponse {
    let region = Coordinate::new(center_latitude, center_longitude).and_then(|center| {
        RegionSpan::new(latitude_delta, longitude_delta).map(|span| MapRegion { center, span })
    });
    let region = match region {
        Ok(region) => region,
        Err(err) => return ActionResponse::failure(format!("map_region_save failed: {err}")),
    };

    let result = with_connection(|conn| {
        RegionService::new(SqlitePreferenceRepository::new(conn))
            .record_region_change(&region, from_user_interaction)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(true) => ActionResponse::success("Map region saved."),
        Ok(false) => ActionResponse::success("Map region unchanged."),
        Err(err) => ActionResponse::failure(format!("map_region_save failed: {err}")),
    }
}

/// Loads the saved viewport; `None` when nothing usable is stored.
#[flutter_rust_bridge::frb(sync)]
pub fn map_region_load() -> Option<MapRegionItem> {
    let saved = with_connection(|conn| {
        RegionService::new(SqlitePreferenceRepository::new(conn))
            .saved_region()
            .map_err(|err| err.to_string())
    })
    .map_err(|err| log::warn!("event=map_region_load module=ffi status=error error={err}"))
    .ok()?;

    if saved.is_empty() {
        return None;
    }
    Some(MapRegionItem {
        center_latitude: saved.center.map(|center| center.latitude),
        center_longitude: saved.center.map(|center| center.longitude),
        latitude_delta: saved.span.map(|span| span.latitude_delta),
        longitude_delta: saved.span.map(|span| span.longitude_delta),
    })
}

/// Takes all pin/album changes published since the previous drain.
#[flutter_rust_bridge::frb(sync)]
pub fn changes_drain() -> Vec<ChangeItem> {
    CHANGE_BUFFER.drain().iter().map(to_change_item).collect()
}

fn run_album(
    pin_id: &str,
    operation: &str,
    f: impl FnOnce(
        &AlbumService<SqlitePinRepository<'_>, SqlitePhotoRepository<'_>, FlickrClient>,
        PinId,
    ) -> Result<AlbumPage, AlbumError>,
) -> AlbumResponse {
    let id = match parse_pin_id(pin_id) {
        Ok(id) => id,
        Err(err) => return AlbumResponse::failure(format!("{operation} failed: {err}"), false),
    };
    let client = match FlickrConfig::from_env().and_then(FlickrClient::<ReqwestTransport>::connect)
    {
        Ok(client) => client,
        Err(err) => return AlbumResponse::failure(format!("{operation} failed: {err}"), false),
    };

    let result = with_connection(|conn| {
        let service = AlbumService::new(
            SqlitePinRepository::new(conn),
            SqlitePhotoRepository::new(conn),
            client,
            feed(),
        );
        Ok(f(&service, id))
    });
    match result {
        Ok(Ok(page)) => AlbumResponse::from_page(page),
        Ok(Err(err)) => {
            AlbumResponse::failure(format!("{operation} failed: {err}"), err.is_retryable())
        }
        Err(err) => AlbumResponse::failure(format!("{operation} failed: {err}"), false),
    }
}

fn with_album_editor<T>(
    pin_id: &str,
    f: impl FnOnce(
        &AlbumService<SqlitePinRepository<'_>, SqlitePhotoRepository<'_>, SearchDisabled>,
        PinId,
    ) -> Result<T, AlbumError>,
) -> Result<T, String> {
    let id = parse_pin_id(pin_id)?;
    with_connection(|conn| {
        let service = AlbumService::new(
            SqlitePinRepository::new(conn),
            SqlitePhotoRepository::new(conn),
            SearchDisabled,
            feed(),
        );
        f(&service, id).map_err(|err| err.to_string())
    })
}

fn feed() -> Arc<ChangeHub> {
    Lazy::force(&CHANGE_BUFFER);
    CHANGE_FEED.clone()
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_connection<T>(
    f: impl FnOnce(&rusqlite::Connection) -> Result<T, String>,
) -> Result<T, String> {
    let conn = open_db(resolve_db_path()).map_err(|err| format!("DB open failed: {err}"))?;
    f(&conn)
}

fn with_pin_service<T>(
    f: impl FnOnce(&PinService<SqlitePinRepository<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    with_connection(|conn| f(&PinService::new(SqlitePinRepository::new(conn), feed())))
}

fn parse_pin_id(value: &str) -> Result<PinId, String> {
    PinId::parse(value).map_err(|_| format!("invalid pin id `{}`", value.trim()))
}

fn to_pin_item(pin: &Pin) -> PinItem {
    PinItem {
        pin_id: pin.id.to_string(),
        latitude: pin.latitude,
        longitude: pin.longitude,
        created_at: pin.created_at,
    }
}

fn to_photo_item(photo: &Photo) -> PhotoItem {
    PhotoItem {
        photo_id: photo.id.to_string(),
        image_url: photo.image_url().map(str::to_string),
    }
}

fn to_change_item(event: &ChangeEvent) -> ChangeItem {
    let (collection, pin_id) = match event.collection {
        Collection::Pins => ("pins", None),
        Collection::Album(pin_id) => ("album", Some(pin_id.to_string())),
    };
    ChangeItem {
        collection: collection.to_string(),
        pin_id,
        kind: match event.kind {
            ChangeKind::Insert => "insert",
            ChangeKind::Delete => "delete",
        }
        .to_string(),
        index: u32::try_from(event.index).unwrap_or(u32::MAX),
        record_id: event.record_id.to_string(),
    }
}
