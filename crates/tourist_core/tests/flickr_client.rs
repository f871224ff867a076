use std::collections::BTreeMap;
use std::sync::Mutex;
use tourist_core::{
    Coordinate, FlickrClient, FlickrConfig, FlickrError, HttpResponse, HttpTransport, PhotoSearch,
    TransportError,
};
use url::Url;

/// Returns one canned outcome and remembers requested URLs.
struct CannedTransport {
    outcome: Mutex<Option<Result<HttpResponse, TransportError>>>,
    requested: Mutex<Vec<Url>>,
}

impl CannedTransport {
    fn ok(status: u16, body: &str) -> Self {
        Self::with(Ok(HttpResponse {
            status,
            body: body.as_bytes().to_vec(),
        }))
    }

    fn failing(message: &str) -> Self {
        Self::with(Err(TransportError(message.to_string())))
    }

    fn with(outcome: Result<HttpResponse, TransportError>) -> Self {
        Self {
            outcome: Mutex::new(Some(outcome)),
            requested: Mutex::new(Vec::new()),
        }
    }
}

impl HttpTransport for CannedTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        self.requested.lock().unwrap().push(url.clone());
        self.outcome
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(TransportError("no canned response left".to_string())))
    }
}

fn client(transport: CannedTransport) -> FlickrClient<CannedTransport> {
    FlickrClient::with_transport(FlickrConfig::new("test-key").unwrap(), transport)
}

fn query_map(url: &Url) -> BTreeMap<String, String> {
    url.query_pairs()
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

#[test]
fn search_url_carries_exactly_the_fixed_parameters() {
    let client = client(CannedTransport::ok(200, "{}"));
    let url = client.search_url(Coordinate::new(51.5074, -0.1278).unwrap());

    assert_eq!(url.scheme(), "https");
    assert_eq!(url.host_str(), Some("www.flickr.com"));
    assert_eq!(url.path(), "/services/rest/");

    let expected = [
        ("api_key", "test-key"),
        ("extras", "url_m"),
        ("format", "json"),
        ("lat", "51.5074"),
        ("lon", "-0.1278"),
        ("method", "flickr.photos.search"),
        ("nojsoncallback", "1"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect::<BTreeMap<_, _>>();
    assert_eq!(query_map(&url), expected);
    assert_eq!(url.query_pairs().count(), expected.len());
}

#[test]
fn search_url_replaces_query_of_configured_endpoint() {
    let config =
        FlickrConfig::with_endpoint("http://127.0.0.1:9/services/rest/?stale=1", "k").unwrap();
    let client = FlickrClient::with_transport(config, CannedTransport::ok(200, "{}"));
    let url = client.search_url(Coordinate::new(0.0, 0.0).unwrap());

    assert!(!query_map(&url).contains_key("stale"));
    assert_eq!(url.host_str(), Some("127.0.0.1"));
}

#[test]
fn search_returns_urls_in_response_order() {
    let body = r#"{"photos":{"page":1,"pages":1,"photo":[
        {"id":"a","url_m":"https://live.staticflickr.com/1/a_m.jpg"},
        {"id":"b"},
        {"id":"c","url_m":"https://live.staticflickr.com/1/c_m.jpg"}
    ]},"stat":"ok"}"#;
    let client = client(CannedTransport::ok(200, body));

    let photos = client
        .search_photos(Coordinate::new(10.0, 20.0).unwrap())
        .unwrap();
    let urls = photos
        .iter()
        .map(|photo| photo.image_url.as_deref())
        .collect::<Vec<_>>();
    assert_eq!(
        urls,
        vec![
            Some("https://live.staticflickr.com/1/a_m.jpg"),
            None,
            Some("https://live.staticflickr.com/1/c_m.jpg"),
        ]
    );
}

#[test]
fn transport_error_yields_failure_without_photos() {
    let transport = CannedTransport::failing("dns lookup failed");
    let client = client(transport);

    let err = client
        .search_photos(Coordinate::new(10.0, 20.0).unwrap())
        .unwrap_err();
    assert!(matches!(err, FlickrError::Transport(_)));
}

#[test]
fn non_success_status_is_an_error() {
    let client = client(CannedTransport::ok(503, "<html>unavailable</html>"));
    let err = client
        .search_photos(Coordinate::new(10.0, 20.0).unwrap())
        .unwrap_err();
    assert!(matches!(err, FlickrError::Status(503)));
}

#[test]
fn unparseable_body_is_an_error() {
    let client = client(CannedTransport::ok(200, r#"{"photos":{}}"#));
    let err = client
        .search_photos(Coordinate::new(10.0, 20.0).unwrap())
        .unwrap_err();
    assert!(matches!(err, FlickrError::Parse(_)));
}

#[test]
fn invalid_coordinate_is_rejected_before_any_request() {
    let client = client(CannedTransport::ok(200, "{}"));
    let err = client
        .search_photos(Coordinate {
            latitude: 120.0,
            longitude: 0.0,
        })
        .unwrap_err();
    assert!(matches!(err, FlickrError::InvalidCoordinate(_)));
}
