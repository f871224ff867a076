use rusqlite::Connection;
use std::cell::Cell;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tourist_core::db::open_db_in_memory;
use tourist_core::flickr::FlickrResult;
use tourist_core::{
    AlbumError, AlbumService, AlbumSource, ChangeEvent, ChangeHub, ChangeKind, ChangeListener,
    ChangeRecorder, Collection, Coordinate, FlickrError, FlickrPhoto, Photo, PhotoRepository,
    PhotoId, PhotoSearch, Pin, PinId, PinRepository, RepoError, SearchDisabled,
    SqlitePhotoRepository, SqlitePinRepository, TransportError,
};
use tourist_core::repo::RepoResult;

/// Replays scripted search results and counts calls.
#[derive(Default)]
struct ScriptedSearch {
    responses: Mutex<VecDeque<FlickrResult<Vec<FlickrPhoto>>>>,
    calls: Mutex<Vec<Coordinate>>,
}

impl ScriptedSearch {
    fn push_urls(&self, urls: &[Option<&str>]) {
        let photos = urls
            .iter()
            .map(|url| FlickrPhoto {
                image_url: url.map(str::to_string),
            })
            .collect();
        self.responses.lock().unwrap().push_back(Ok(photos));
    }

    fn push_error(&self, err: FlickrError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl PhotoSearch for ScriptedSearch {
    fn search_photos(&self, coordinate: Coordinate) -> FlickrResult<Vec<FlickrPhoto>> {
        self.calls.lock().unwrap().push(coordinate);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

fn seed_pin(conn: &Connection) -> Pin {
    let pin = Pin::new(Coordinate::new(40.7128, -74.0060).unwrap()).unwrap();
    SqlitePinRepository::new(conn).create_pin(&pin).unwrap();
    pin
}

fn album_service<'a>(
    conn: &'a Connection,
    search: &'a ScriptedSearch,
    feed: Arc<ChangeHub>,
) -> AlbumService<SqlitePinRepository<'a>, SqlitePhotoRepository<'a>, &'a ScriptedSearch> {
    AlbumService::new(
        SqlitePinRepository::new(conn),
        SqlitePhotoRepository::new(conn),
        search,
        feed,
    )
}

#[test]
fn load_album_fetches_on_miss_and_reuses_stored_photos() {
    let conn = open_db_in_memory().unwrap();
    let pin = seed_pin(&conn);
    let search = ScriptedSearch::default();
    search.push_urls(&[Some("https://a/1_m.jpg"), Some("https://a/2_m.jpg")]);
    let service = album_service(&conn, &search, Arc::new(ChangeHub::new()));

    let first = service.load_album(pin.id).unwrap();
    assert_eq!(first.source, AlbumSource::Fetched);
    assert_eq!(first.image_urls(), vec!["https://a/1_m.jpg", "https://a/2_m.jpg"]);

    let second = service.load_album(pin.id).unwrap();
    assert_eq!(second.source, AlbumSource::Stored);
    assert_eq!(second.photos, first.photos);
    assert_eq!(search.call_count(), 1);
}

#[test]
fn search_uses_pin_coordinate() {
    let conn = open_db_in_memory().unwrap();
    let pin = seed_pin(&conn);
    let search = ScriptedSearch::default();
    let service = album_service(&conn, &search, Arc::new(ChangeHub::new()));

    service.load_album(pin.id).unwrap();
    assert_eq!(*search.calls.lock().unwrap(), vec![pin.coordinate()]);
}

#[test]
fn entries_without_url_are_skipped() {
    let conn = open_db_in_memory().unwrap();
    let pin = seed_pin(&conn);
    let search = ScriptedSearch::default();
    search.push_urls(&[Some("https://a/1_m.jpg"), None, Some("https://a/3_m.jpg")]);
    let service = album_service(&conn, &search, Arc::new(ChangeHub::new()));

    let page = service.load_album(pin.id).unwrap();
    assert_eq!(page.image_urls(), vec!["https://a/1_m.jpg", "https://a/3_m.jpg"]);
    assert_eq!(page.failed_writes, 0);
}

#[test]
fn empty_search_result_is_an_empty_album_not_an_error() {
    let conn = open_db_in_memory().unwrap();
    let pin = seed_pin(&conn);
    let search = ScriptedSearch::default();
    search.push_urls(&[]);
    let service = album_service(&conn, &search, Arc::new(ChangeHub::new()));

    let page = service.load_album(pin.id).unwrap();
    assert!(page.is_empty());
    assert_eq!(page.source, AlbumSource::Fetched);
}

#[test]
fn new_collection_deletes_old_photos_before_writing_new_ones() {
    let conn = open_db_in_memory().unwrap();
    let pin = seed_pin(&conn);
    let search = ScriptedSearch::default();
    search.push_urls(&[Some("https://old/1.jpg"), Some("https://old/2.jpg")]);
    search.push_urls(&[Some("https://new/1.jpg")]);
    let feed = Arc::new(ChangeHub::new());
    let service = album_service(&conn, &search, feed.clone());

    let old = service.load_album(pin.id).unwrap();
    let recorder = Arc::new(ChangeRecorder::new());
    feed.subscribe(recorder.clone());

    let fresh = service.new_collection(pin.id).unwrap();
    assert_eq!(fresh.image_urls(), vec!["https://new/1.jpg"]);

    let album = Collection::Album(pin.id);
    assert_eq!(
        recorder.drain(),
        vec![
            ChangeEvent::delete(album, 1, old.photos[1].id.0),
            ChangeEvent::delete(album, 0, old.photos[0].id.0),
            ChangeEvent::insert(album, 0, fresh.photos[0].id.0),
        ]
    );
}

/// Counts stored photos at the moment each album insert is announced.
struct StoredCountProbe {
    conn: Mutex<Connection>,
    pin_id: PinId,
    counts_at_insert: Mutex<Vec<u32>>,
}

impl ChangeListener for StoredCountProbe {
    fn on_change(&self, event: &ChangeEvent) {
        if event.kind == ChangeKind::Insert {
            let conn = self.conn.lock().unwrap();
            let count = SqlitePhotoRepository::new(&conn)
                .count_photos(self.pin_id)
                .unwrap();
            self.counts_at_insert.lock().unwrap().push(count);
        }
    }
}

#[test]
fn new_collection_never_mixes_old_and_new_photos() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("album.db");
    let conn = tourist_core::db::open_db(&path).unwrap();
    let pin = seed_pin(&conn);
    let search = ScriptedSearch::default();
    search.push_urls(&[
        Some("https://old/1.jpg"),
        Some("https://old/2.jpg"),
        Some("https://old/3.jpg"),
    ]);
    search.push_urls(&[Some("https://new/1.jpg"), Some("https://new/2.jpg")]);
    let feed = Arc::new(ChangeHub::new());
    let service = album_service(&conn, &search, feed.clone());
    service.load_album(pin.id).unwrap();

    let probe = Arc::new(StoredCountProbe {
        conn: Mutex::new(tourist_core::db::open_db(&path).unwrap()),
        pin_id: pin.id,
        counts_at_insert: Mutex::new(Vec::new()),
    });
    feed.subscribe(probe.clone());
    service.new_collection(pin.id).unwrap();

    assert_eq!(*probe.counts_at_insert.lock().unwrap(), vec![1, 2]);
}

#[test]
fn failed_search_leaves_album_empty_and_is_retryable() {
    let conn = open_db_in_memory().unwrap();
    let pin = seed_pin(&conn);
    let search = ScriptedSearch::default();
    search.push_urls(&[Some("https://old/1.jpg")]);
    search.push_error(FlickrError::Transport(TransportError(
        "connection reset".to_string(),
    )));
    search.push_urls(&[Some("https://retry/1.jpg")]);
    let service = album_service(&conn, &search, Arc::new(ChangeHub::new()));
    service.load_album(pin.id).unwrap();

    let err = service.new_collection(pin.id).unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(err, AlbumError::Search(FlickrError::Transport(_))));
    assert_eq!(
        SqlitePhotoRepository::new(&conn).count_photos(pin.id).unwrap(),
        0
    );

    let retried = service.new_collection(pin.id).unwrap();
    assert_eq!(retried.image_urls(), vec!["https://retry/1.jpg"]);
}

#[test]
fn only_transient_search_failures_are_retryable() {
    let conn = open_db_in_memory().unwrap();
    let pin = seed_pin(&conn);
    let search = ScriptedSearch::default();
    search.push_error(FlickrError::Status(503));
    search.push_error(FlickrError::Parse("expected value".to_string()));
    search.push_error(FlickrError::Api {
        code: 100,
        message: "Invalid API Key".to_string(),
    });
    search.push_error(FlickrError::Config("missing api key".to_string()));
    let service = album_service(&conn, &search, Arc::new(ChangeHub::new()));

    assert!(service.load_album(pin.id).unwrap_err().is_retryable());
    assert!(service.load_album(pin.id).unwrap_err().is_retryable());
    assert!(!service.load_album(pin.id).unwrap_err().is_retryable());
    assert!(!service.load_album(pin.id).unwrap_err().is_retryable());
}

/// Delegates to SQLite but rejects the n-th photo write.
struct FailingNthWrite<'conn> {
    inner: SqlitePhotoRepository<'conn>,
    fail_on: usize,
    attempts: Cell<usize>,
}

impl PhotoRepository for FailingNthWrite<'_> {
    fn create_photo(&self, photo: &Photo) -> RepoResult<PhotoId> {
        let attempt = self.attempts.get() + 1;
        self.attempts.set(attempt);
        if attempt == self.fail_on {
            return Err(RepoError::InvalidData("disk full".to_string()));
        }
        self.inner.create_photo(photo)
    }

    fn list_photos(&self, pin_id: PinId) -> RepoResult<Vec<Photo>> {
        self.inner.list_photos(pin_id)
    }

    fn count_photos(&self, pin_id: PinId) -> RepoResult<u32> {
        self.inner.count_photos(pin_id)
    }

    fn delete_photo(&self, id: PhotoId) -> RepoResult<()> {
        self.inner.delete_photo(id)
    }

    fn delete_photos_for_pin(&self, pin_id: PinId) -> RepoResult<Vec<PhotoId>> {
        self.inner.delete_photos_for_pin(pin_id)
    }
}

#[test]
fn failed_write_mid_album_keeps_the_rest_and_is_counted() {
    let conn = open_db_in_memory().unwrap();
    let pin = seed_pin(&conn);
    let search = ScriptedSearch::default();
    search.push_urls(&[
        Some("https://a/1.jpg"),
        Some("https://a/2.jpg"),
        Some("https://a/3.jpg"),
    ]);
    let feed = Arc::new(ChangeHub::new());
    let recorder = Arc::new(ChangeRecorder::new());
    feed.subscribe(recorder.clone());
    let service = AlbumService::new(
        SqlitePinRepository::new(&conn),
        FailingNthWrite {
            inner: SqlitePhotoRepository::new(&conn),
            fail_on: 2,
            attempts: Cell::new(0),
        },
        &search,
        feed,
    );

    let page = service.load_album(pin.id).unwrap();
    assert_eq!(page.image_urls(), vec!["https://a/1.jpg", "https://a/3.jpg"]);
    assert_eq!(page.failed_writes, 1);

    let album = Collection::Album(pin.id);
    assert_eq!(
        recorder.drain(),
        vec![
            ChangeEvent::insert(album, 0, page.photos[0].id.0),
            ChangeEvent::insert(album, 1, page.photos[1].id.0),
        ]
    );
}

#[test]
fn unknown_pin_is_reported_without_searching() {
    let conn = open_db_in_memory().unwrap();
    let search = ScriptedSearch::default();
    let service = album_service(&conn, &search, Arc::new(ChangeHub::new()));

    let missing = PinId::new();
    let err = service.load_album(missing).unwrap_err();
    assert!(matches!(err, AlbumError::PinNotFound(id) if id == missing));
    assert!(!err.is_retryable());
    assert_eq!(search.call_count(), 0);
}

#[test]
fn clear_and_remove_photo_publish_deletes() {
    let conn = open_db_in_memory().unwrap();
    let pin = seed_pin(&conn);
    let search = ScriptedSearch::default();
    search.push_urls(&[Some("https://a/1.jpg"), Some("https://a/2.jpg"), Some("https://a/3.jpg")]);
    let feed = Arc::new(ChangeHub::new());
    let service = album_service(&conn, &search, feed.clone());
    let page = service.load_album(pin.id).unwrap();

    let recorder = Arc::new(ChangeRecorder::new());
    feed.subscribe(recorder.clone());

    service.remove_photo(pin.id, page.photos[1].id).unwrap();
    let removed = service.clear_album(pin.id).unwrap();
    assert_eq!(removed, 2);

    let album = Collection::Album(pin.id);
    assert_eq!(
        recorder.drain(),
        vec![
            ChangeEvent::delete(album, 1, page.photos[1].id.0),
            ChangeEvent::delete(album, 1, page.photos[2].id.0),
            ChangeEvent::delete(album, 0, page.photos[0].id.0),
        ]
    );
    assert!(matches!(
        service.remove_photo(pin.id, page.photos[0].id),
        Err(AlbumError::PhotoNotFound(_))
    ));
}

#[test]
fn album_edits_work_with_search_disabled() {
    let conn = open_db_in_memory().unwrap();
    let pin = seed_pin(&conn);
    let photos = SqlitePhotoRepository::new(&conn);
    let kept = Photo::from_url(pin.id, "https://a/1.jpg");
    let dropped = Photo::from_url(pin.id, "https://a/2.jpg");
    photos.create_photo(&kept).unwrap();
    photos.create_photo(&dropped).unwrap();
    let service = AlbumService::new(
        SqlitePinRepository::new(&conn),
        photos,
        SearchDisabled,
        Arc::new(ChangeHub::new()),
    );

    service.remove_photo(pin.id, dropped.id).unwrap();
    assert_eq!(service.load_album(pin.id).unwrap().photos, vec![kept]);
    assert_eq!(service.clear_album(pin.id).unwrap(), 1);

    let err = service.load_album(pin.id).unwrap_err();
    assert!(matches!(err, AlbumError::Search(FlickrError::Config(_))));
    assert!(!err.is_retryable());
}

#[test]
fn photos_store_url_bytes_verbatim() {
    let conn = open_db_in_memory().unwrap();
    let pin = seed_pin(&conn);
    let repo = SqlitePhotoRepository::new(&conn);

    let photo = Photo::from_url(pin.id, "https://live.staticflickr.com/65535/1_abc_m.jpg");
    repo.create_photo(&photo).unwrap();

    let blob: Vec<u8> = conn
        .query_row(
            "SELECT image_data FROM photos WHERE uuid = ?1",
            [photo.id.to_string()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(blob, b"https://live.staticflickr.com/65535/1_abc_m.jpg".to_vec());
}
