//! Integration test: full download actions against a local fake of the site,
//! the API and the CDN.
//!
//! Each test starts its own server, builds a `Downloader` pointing at it, and
//! asserts on the saved file, the observed states and the requests made.

mod common;

use std::sync::{Arc, Mutex};

use common::api_server::{self, ApiServer, Route};
use scdl_core::api::ApiClient;
use scdl_core::credential::{ClientId, CookieJar};
use scdl_core::http::HttpOptions;
use scdl_core::page::{acquire_client_id, WebPage};
use scdl_core::pipeline::{
    run_download, DownloadObserver, DownloadRequest, DownloadState, Downloader, NoopObserver,
};
use scdl_core::save::DirectorySink;
use scdl_core::select::SelectionKind;
use scdl_core::{DownloadError, FailureKind};
use tempfile::tempdir;

const CLIENT_ID: &str = "a1B2c3D4e5F6g7H8i9J0k1L2m3N4o5P6";
const PAGE: &str = "https://soundcloud.com/choicescarf/departure-remix";
const AUDIO: &[u8] = b"ID3\x04\x00fake mp3 payload";

#[derive(Default)]
struct Recorder(Mutex<Vec<DownloadState>>);

impl Recorder {
    fn states(&self) -> Vec<DownloadState> {
        self.0.lock().unwrap().clone()
    }
}

impl DownloadObserver for Recorder {
    fn on_state(&self, _page_url: &str, state: DownloadState) {
        self.0.lock().unwrap().push(state);
    }
}

fn progressive_track(base: &str) -> String {
    format!(
        r#"{{
            "id": 123456,
            "kind": "track",
            "title": "Departure Remix",
            "downloadable": false,
            "has_downloads_left": true,
            "track_authorization": "trackauth",
            "user": {{ "username": "choicescarf" }},
            "media": {{ "transcodings": [
                {{ "url": "{base}/media/123456/hls", "quality": "sq",
                   "format": {{ "protocol": "hls", "mime_type": "audio/mpeg" }} }},
                {{ "url": "{base}/media/123456/progressive", "quality": "sq",
                   "format": {{ "protocol": "progressive", "mime_type": "audio/mpeg" }} }}
            ] }}
        }}"#
    )
}

fn progressive_routes(base: &str) -> Vec<(&'static str, Route)> {
    vec![
        ("/resolve", Route::json(progressive_track(base))),
        (
            "/media/123456/progressive",
            Route::json(format!(r#"{{ "url": "{base}/cdn/departure.mp3?Policy=x" }}"#)),
        ),
        ("/cdn/departure.mp3", Route::bytes("audio/mpeg", AUDIO)),
    ]
}

fn downloader(server: &ApiServer, dir: &std::path::Path) -> Downloader {
    let api = ApiClient::new(server.base.clone(), HttpOptions::default());
    Downloader::new(api, ClientId::new(CLIENT_ID), DirectorySink::new(dir, false))
}

#[test]
fn progressive_rendition_is_fetched_and_saved() {
    let server = api_server::start(progressive_routes);
    let out = tempdir().unwrap();
    let recorder = Recorder::default();

    let saved = downloader(&server, out.path())
        .download(&DownloadRequest::new(PAGE, false), &recorder)
        .expect("download");

    assert_eq!(saved.filename, "choicescarf - Departure Remix.mp3");
    assert_eq!(saved.selection, SelectionKind::Rendition(scdl_core::model::Quality::Sq));
    assert_eq!(std::fs::read(&saved.path).unwrap(), AUDIO);
    assert_eq!(saved.path, out.path().join("choicescarf - Departure Remix.mp3"));
    assert_eq!(
        recorder.states(),
        vec![
            DownloadState::Resolving,
            DownloadState::SelectingRendition,
            DownloadState::Fetching,
            DownloadState::Saved,
        ]
    );

    // One resolve, one finalize, exactly one media GET; the HLS URL is never touched.
    assert_eq!(server.hits("/resolve"), 1);
    assert_eq!(server.hits("/media/123456/progressive"), 1);
    assert_eq!(server.hits("/cdn/departure.mp3"), 1);
    assert_eq!(server.hits("/media/123456/hls"), 0);

    let resolve = &server.requests_to("/resolve")[0];
    assert!(resolve.query.contains(&format!("client_id={}", CLIENT_ID)));
    assert!(resolve.query.contains("url=https%3A%2F%2Fsoundcloud.com%2Fchoicescarf%2Fdeparture-remix"));
    let finalize = &server.requests_to("/media/123456/progressive")[0];
    assert!(finalize.query.contains("track_authorization=trackauth"));
    assert!(finalize.query.contains(&format!("client_id={}", CLIENT_ID)));
}

/// Resolve record of a native-download track whose title already names the
/// artist, uploaded by a label account.
fn native_track(base: &str) -> String {
    format!(
        r#"{{
            "id": 777, "kind": "track", "title": "DJ Snake - Night Drive",
            "downloadable": true, "has_downloads_left": true,
            "user": {{ "username": "Night Drive Records" }},
            "media": {{ "transcodings": [
                {{ "url": "{base}/media/777/progressive", "quality": "sq",
                   "format": {{ "protocol": "progressive", "mime_type": "audio/mpeg" }} }}
            ] }}
        }}"#
    )
}

fn native_routes(
    base: &str,
    redirect_path: &'static str,
    media: Route,
) -> Vec<(&'static str, Route)> {
    vec![
        ("/resolve", Route::json(native_track(base))),
        (
            "/tracks/777/download",
            Route::json(format!(r#"{{ "redirectUri": "{base}{redirect_path}?sig=1" }}"#)),
        ),
        (redirect_path, media),
    ]
}

const NATIVE_PAGE: &str = "https://soundcloud.com/nightdriverecords/night-drive";

#[test]
fn native_download_takes_precedence() {
    let server = api_server::start(|base| {
        native_routes(base, "/cdn/original.wav", Route::bytes("audio/wav", b"RIFF....WAVE"))
    });
    let out = tempdir().unwrap();

    let saved = downloader(&server, out.path())
        .download(&DownloadRequest::new(NATIVE_PAGE, false), &NoopObserver)
        .expect("download");

    assert_eq!(saved.selection, SelectionKind::Native);
    assert_eq!(saved.filename, "DJ Snake - Night Drive.wav");
    assert_eq!(saved.uploader, "Night Drive Records");
    assert_eq!(std::fs::read(&saved.path).unwrap(), b"RIFF....WAVE");
    assert_eq!(server.hits("/tracks/777/download"), 1);
    assert_eq!(server.hits("/media/777/progressive"), 0);
    assert_eq!(server.hits("/cdn/original.wav"), 1);
}

#[test]
fn native_file_without_url_suffix_is_named_from_content_type() {
    let server = api_server::start(|base| {
        native_routes(base, "/originals/Xy9QwE", Route::bytes("audio/wav", b"RIFF....WAVE"))
    });
    let out = tempdir().unwrap();

    let saved = downloader(&server, out.path())
        .download(&DownloadRequest::new(NATIVE_PAGE, false), &NoopObserver)
        .expect("download");

    assert_eq!(saved.filename, "DJ Snake - Night Drive.wav");
    assert_eq!(server.hits("/originals/Xy9QwE"), 1);
}

#[test]
fn native_file_named_from_content_disposition() {
    let server = api_server::start(|base| {
        native_routes(
            base,
            "/originals/Xy9QwE",
            Route::bytes("application/octet-stream", b"fLaC")
                .with_header("Content-Disposition", r#"attachment; filename="night drive master.flac""#),
        )
    });
    let out = tempdir().unwrap();

    let saved = downloader(&server, out.path())
        .download(&DownloadRequest::new(NATIVE_PAGE, false), &NoopObserver)
        .expect("download");

    assert_eq!(saved.filename, "DJ Snake - Night Drive.flac");
}

#[test]
fn redirected_media_is_named_from_the_final_url() {
    let server = api_server::start(|base| {
        let mut routes = native_routes(
            base,
            "/originals/Xy9QwE",
            Route::redirect(format!("{base}/cdn/night-drive.aiff")),
        );
        routes.push((
            "/cdn/night-drive.aiff",
            Route::bytes("application/octet-stream", b"FORM....AIFF"),
        ));
        routes
    });
    let out = tempdir().unwrap();

    let saved = downloader(&server, out.path())
        .download(&DownloadRequest::new(NATIVE_PAGE, false), &NoopObserver)
        .expect("download");

    assert_eq!(saved.filename, "DJ Snake - Night Drive.aiff");
    assert_eq!(std::fs::read(&saved.path).unwrap(), b"FORM....AIFF");
    assert_eq!(server.hits("/cdn/night-drive.aiff"), 1);
}

#[test]
fn resolve_404_fails_without_further_requests() {
    let server = api_server::start(|_| vec![("/resolve", Route::status(404))]);
    let out = tempdir().unwrap();
    let recorder = Recorder::default();

    let err = downloader(&server, out.path())
        .download(&DownloadRequest::new(PAGE, false), &recorder)
        .unwrap_err();

    assert!(matches!(err, DownloadError::ResolutionFailed { status: Some(404), .. }));
    assert_eq!(
        recorder.states(),
        vec![
            DownloadState::Resolving,
            DownloadState::Failed(FailureKind::ResolutionFailed),
        ]
    );
    assert_eq!(server.requests().len(), 1);
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn playlist_url_is_a_resolution_failure() {
    let server = api_server::start(|_| {
        vec![(
            "/resolve",
            Route::json(r#"{ "id": 5, "kind": "playlist", "title": "Set", "user": { "username": "u" } }"#),
        )]
    });
    let out = tempdir().unwrap();

    let err = downloader(&server, out.path())
        .download(&DownloadRequest::new("https://soundcloud.com/u/sets/set", false), &NoopObserver)
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::ResolutionFailed);
}

#[test]
fn streaming_only_track_has_no_eligible_rendition() {
    let server = api_server::start(|base| {
        vec![(
            "/resolve",
            Route::json(format!(
                r#"{{
                    "id": 9, "kind": "track", "title": "Stream Only",
                    "user": {{ "username": "u" }},
                    "media": {{ "transcodings": [
                        {{ "url": "{base}/media/9/hls", "quality": "hq",
                           "format": {{ "protocol": "hls", "mime_type": "audio/ogg" }} }}
                    ] }}
                }}"#
            )),
        )]
    });
    let out = tempdir().unwrap();
    let recorder = Recorder::default();

    let err = downloader(&server, out.path())
        .download(&DownloadRequest::new(PAGE, false), &recorder)
        .unwrap_err();

    assert!(matches!(err, DownloadError::NoEligibleRendition { track_id: 9 }));
    assert_eq!(
        recorder.states().last(),
        Some(&DownloadState::Failed(FailureKind::NoEligibleRendition))
    );
    assert_eq!(server.hits("/media/9/hls"), 0);
}

#[test]
fn finalize_failure_is_fetch_failed() {
    let server = api_server::start(|base| {
        vec![
            ("/resolve", Route::json(progressive_track(base))),
            ("/media/123456/progressive", Route::status(401)),
        ]
    });
    let out = tempdir().unwrap();
    let recorder = Recorder::default();

    let err = downloader(&server, out.path())
        .download(&DownloadRequest::new(PAGE, false), &recorder)
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::FetchFailed);
    assert_eq!(err.status(), Some(401));
    assert_eq!(
        recorder.states(),
        vec![
            DownloadState::Resolving,
            DownloadState::SelectingRendition,
            DownloadState::Fetching,
            DownloadState::Failed(FailureKind::FetchFailed),
        ]
    );
    assert_eq!(server.hits("/cdn/departure.mp3"), 0);
}

#[test]
fn media_404_saves_nothing() {
    let server = api_server::start(|base| {
        vec![
            ("/resolve", Route::json(progressive_track(base))),
            (
                "/media/123456/progressive",
                Route::json(format!(r#"{{ "url": "{base}/cdn/gone.mp3" }}"#)),
            ),
        ]
    });
    let out = tempdir().unwrap();

    let err = downloader(&server, out.path())
        .download(&DownloadRequest::new(PAGE, false), &NoopObserver)
        .unwrap_err();

    assert!(matches!(err, DownloadError::FetchFailed { status: Some(404), .. }));
    assert_eq!(server.hits("/cdn/gone.mp3"), 1);
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

fn write_cookie_jar(dir: &std::path::Path, token: &str) -> std::path::PathBuf {
    let path = dir.join("cookies.txt");
    std::fs::write(
        &path,
        format!(
            "# Netscape HTTP Cookie File\n.soundcloud.com\tTRUE\t/\tTRUE\t0\toauth_token\t{}\n",
            token
        ),
    )
    .unwrap();
    path
}

#[test]
fn session_header_sent_only_for_high_quality() {
    let server = api_server::start(progressive_routes);
    let out = tempdir().unwrap();
    let jar_dir = tempdir().unwrap();
    let jar = write_cookie_jar(jar_dir.path(), "2-000000-secret");
    let dl = downloader(&server, out.path()).with_cookie_jar(CookieJar::new(&jar));

    dl.download(&DownloadRequest::new(PAGE, false), &NoopObserver)
        .expect("standard download");
    for req in server.requests() {
        assert!(req.header("Authorization").is_none(), "{} carried a session", req.path);
    }

    dl.download(&DownloadRequest::new(PAGE, true), &NoopObserver)
        .expect("high quality download");
    let resolves = server.requests_to("/resolve");
    assert_eq!(resolves[1].header("Authorization"), Some("OAuth 2-000000-secret"));
    let finals = server.requests_to("/media/123456/progressive");
    assert_eq!(finals[1].header("Authorization"), Some("OAuth 2-000000-secret"));
    for media in server.requests_to("/cdn/departure.mp3") {
        assert!(media.header("Authorization").is_none());
    }

    // Second save of the same name gets a numbered suffix.
    assert!(out.path().join("choicescarf - Departure Remix (1).mp3").exists());
}

#[test]
fn cookie_jar_is_reread_for_each_action() {
    let server = api_server::start(progressive_routes);
    let out = tempdir().unwrap();
    let jar_dir = tempdir().unwrap();
    let jar = write_cookie_jar(jar_dir.path(), "first");
    let dl = downloader(&server, out.path()).with_cookie_jar(CookieJar::new(&jar));

    dl.download(&DownloadRequest::new(PAGE, true), &NoopObserver).unwrap();
    write_cookie_jar(jar_dir.path(), "second");
    dl.download(&DownloadRequest::new(PAGE, true), &NoopObserver).unwrap();

    let resolves = server.requests_to("/resolve");
    assert_eq!(resolves[0].header("Authorization"), Some("OAuth first"));
    assert_eq!(resolves[1].header("Authorization"), Some("OAuth second"));
}

#[test]
fn high_quality_without_cookie_goes_anonymous() {
    let server = api_server::start(progressive_routes);
    let out = tempdir().unwrap();

    downloader(&server, out.path())
        .download(&DownloadRequest::new(PAGE, true), &NoopObserver)
        .expect("download");
    assert!(server.requests_to("/resolve")[0].header("Authorization").is_none());
}

#[test]
fn checksum_is_reported_when_requested() {
    let server = api_server::start(progressive_routes);
    let out = tempdir().unwrap();
    let mut req = DownloadRequest::new(PAGE, false);
    req.checksum = true;

    let saved = downloader(&server, out.path())
        .download(&req, &NoopObserver)
        .unwrap();
    assert_eq!(
        saved.sha256.as_deref(),
        Some(scdl_core::checksum::sha256_bytes(AUDIO).as_str())
    );
    assert_eq!(saved.bytes, AUDIO.len());
}

#[test]
fn client_id_is_scraped_from_page_scripts() {
    let server = api_server::start(|_| {
        vec![
            (
                "/choicescarf/departure-remix",
                Route::bytes(
                    "text/html",
                    br#"<html><head>
                        <script crossorigin src="/assets/0-vendor.js"></script>
                        <script crossorigin src="/assets/missing.js"></script>
                        <script crossorigin src="/assets/49-app.js"></script>
                    </head></html>"#,
                ),
            ),
            ("/assets/0-vendor.js", Route::bytes("application/javascript", b"var a=1;")),
            (
                "/assets/49-app.js",
                Route::bytes(
                    "application/javascript",
                    format!(r#"o.push({{client_id:"{}",env:"production"}})"#, CLIENT_ID).as_bytes(),
                ),
            ),
        ]
    });

    let page = WebPage::new(
        format!("{}/choicescarf/departure-remix", server.base),
        HttpOptions::default(),
    );
    let id = acquire_client_id(&page).expect("client id");
    assert_eq!(id.as_str(), CLIENT_ID);
    assert_eq!(server.hits("/assets/missing.js"), 1);
}

#[test]
fn client_id_missing_everywhere_is_credential_not_found() {
    let server = api_server::start(|_| {
        vec![
            (
                "/",
                Route::bytes("text/html", br#"<script src="/a.js"></script><script src="/b.js"></script>"#),
            ),
            ("/a.js", Route::bytes("application/javascript", b"var x;")),
            ("/b.js", Route::bytes("application/javascript", b"var y;")),
        ]
    });

    let page = WebPage::new(format!("{}/", server.base), HttpOptions::default());
    let err = acquire_client_id(&page).unwrap_err();
    assert!(matches!(err, DownloadError::CredentialNotFound { scripts_checked: 2 }));
}

#[tokio::test]
async fn concurrent_actions_are_independent() {
    let good = api_server::start(progressive_routes);
    let bad = api_server::start(|_| vec![("/resolve", Route::status(404))]);
    let out = tempdir().unwrap();
    let ok_dl = Arc::new(downloader(&good, out.path()));
    let bad_dl = Arc::new(downloader(&bad, out.path()));
    let observer: Arc<dyn DownloadObserver> = Arc::new(NoopObserver);

    let first = tokio::spawn(run_download(
        Arc::clone(&ok_dl),
        DownloadRequest::new(PAGE, false),
        Arc::clone(&observer),
    ));
    let failing = tokio::spawn(run_download(
        bad_dl,
        DownloadRequest::new(PAGE, false),
        Arc::clone(&observer),
    ));
    let second = tokio::spawn(run_download(
        ok_dl,
        DownloadRequest::new(PAGE, false),
        Arc::clone(&observer),
    ));

    let a = first.await.unwrap().expect("first");
    let b = second.await.unwrap().expect("second");
    let err = failing.await.unwrap().unwrap_err();

    assert_ne!(a.path, b.path);
    assert_eq!(good.hits("/cdn/departure.mp3"), 2);
    let err = err.downcast_ref::<DownloadError>().expect("download error");
    assert_eq!(err.kind(), FailureKind::ResolutionFailed);
}
