use artifact_dl::{DownloadError, Downloader};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn saves_body_under_content_disposition_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/original/job-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-disposition", "attachment; filename=\"sample.tif\"")
                .set_body_bytes(b"tiff-bytes".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let downloader = Downloader::new(Client::new(), dir.path());
    let url = format!("{}/api/download/original/job-1", server.uri());

    let done = downloader
        .fetch(&url, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(done.path, dir.path().join("sample.tif"));
    assert_eq!(done.bytes, 10);
    assert_eq!(std::fs::read(&done.path).unwrap(), b"tiff-bytes");
}

#[tokio::test]
async fn falls_back_to_url_segment_and_creates_directory() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/exports/x.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("a,b\n1,2\n"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("nested").join("out");
    let downloader = Downloader::new(Client::new(), &nested);

    let done = downloader
        .fetch(&format!("{}/exports/x.csv", server.uri()), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(done.path, nested.join("x.csv"));
    assert_eq!(std::fs::read_to_string(&done.path).unwrap(), "a,b\n1,2\n");
}

#[tokio::test]
async fn error_status_leaves_no_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_string("not finished"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let downloader = Downloader::new(Client::new(), dir.path());

    let err = downloader
        .fetch(&format!("{}/api/download/processed/job-2", server.uri()), &CancellationToken::new())
        .await
        .unwrap_err();

    match &err {
        DownloadError::Status { code, body } => {
            assert_eq!(*code, 400);
            assert_eq!(body, "not finished");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.status_code(), Some(400));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn cancelled_token_aborts_before_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("never"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let downloader = Downloader::new(Client::new(), dir.path());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = downloader
        .fetch(&format!("{}/a", server.uri()), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Cancelled));
}

#[tokio::test]
async fn fallback_name_applies_only_without_content_disposition() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/original/job-3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("raw"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/download/processed/job-3"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-disposition", "attachment; filename=\"ndvi.tif\"")
                .set_body_string("ndvi"),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let downloader = Downloader::new(Client::new(), dir.path());
    let cancel = CancellationToken::new();

    let raw = downloader
        .fetch_as(
            &format!("{}/api/download/original/job-3", server.uri()),
            "original_job-3",
            &cancel,
        )
        .await
        .unwrap();
    assert_eq!(raw.path, dir.path().join("original_job-3"));

    let named = downloader
        .fetch_as(
            &format!("{}/api/download/processed/job-3", server.uri()),
            "processed_job-3",
            &cancel,
        )
        .await
        .unwrap();
    assert_eq!(named.path, dir.path().join("ndvi.tif"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}
