//! End-to-end tests for the TTL sync pipeline against a mock platform API.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;
use ttl_sync::export::EXTERNAL_FILES_CONFIG_NAME;
use ttl_sync::fetch::DownloadError;
use ttl_sync::{
    ApiError, DATASET_NODE_ID_PREFIX, ExternalFilesFetcher, FetchError, HttpFilesFetcher,
    MetadataError, MetadataExporter, PipelineError, Session, TtlSyncPipeline, UrlPattern,
    read_config,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EXAMPLE_PATTERN: &str = "https://host/sparc/datasets/%s/LATEST/%s";

/// Fetcher that records the config document instead of downloading.
#[derive(Clone, Default)]
struct RecordingFetcher {
    seen: Arc<Mutex<Option<String>>>,
}

#[async_trait]
impl ExternalFilesFetcher for RecordingFetcher {
    async fn fetch(&self, config_path: &Path, _dest_dir: &Path) -> Result<Vec<PathBuf>, FetchError> {
        let raw = std::fs::read_to_string(config_path).expect("config should exist when fetching");
        *self.seen.lock().expect("lock") = Some(raw);
        Ok(Vec::new())
    }
}

struct FailingFetcher;

#[async_trait]
impl ExternalFilesFetcher for FailingFetcher {
    async fn fetch(&self, _config_path: &Path, _dest_dir: &Path) -> Result<Vec<PathBuf>, FetchError> {
        Err(FetchError::Download {
            name: "curation-export.json".to_string(),
            source: DownloadError::http_status("https://host/x", 503),
        })
    }
}

#[derive(Clone, Default)]
struct RecordingExporter {
    calls: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

#[async_trait]
impl MetadataExporter for RecordingExporter {
    async fn export(&self, dataset_id: &str) -> Result<(), MetadataError> {
        self.calls.lock().expect("lock").push(dataset_id.to_string());
        if self.fail {
            return Err(MetadataError::io(
                "/tmp/metadata",
                std::io::Error::other("metadata disk full"),
            ));
        }
        Ok(())
    }
}

async fn mount_integration(server: &MockServer, integration_id: &str, dataset_id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/integrations/{integration_id}")))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "uuid": integration_id,
            "applicationId": 0,
            "datasetNodeId": dataset_id,
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn session_for(server: &MockServer) -> Session {
    Session::new("test-token", server.uri(), server.uri()).expect("session")
}

fn pipeline(
    server: &MockServer,
    integration_id: &str,
    input_dir: &Path,
    pattern: &str,
    fetcher: Box<dyn ExternalFilesFetcher>,
) -> TtlSyncPipeline {
    TtlSyncPipeline::new(
        integration_id,
        input_dir,
        session_for(server),
        UrlPattern::new(pattern).expect("pattern"),
        fetcher,
    )
}

#[tokio::test]
async fn test_run_writes_expected_config_document() {
    let server = MockServer::start().await;
    mount_integration(&server, "abc", "N:dataset:1234").await;
    let input = TempDir::new().expect("failed to create temp dir");
    let fetcher = RecordingFetcher::default();

    let report = pipeline(&server, "abc", input.path(), EXAMPLE_PATTERN, Box::new(fetcher.clone()))
        .run()
        .await
        .expect("run should succeed");

    assert_eq!(report.dataset_id, "N:dataset:1234");
    assert_eq!(report.config_path, input.path().join(EXTERNAL_FILES_CONFIG_NAME));

    let written = std::fs::read_to_string(&report.config_path).expect("config file");
    assert_eq!(
        written.trim_end(),
        r#"[{"url":"https://host/sparc/datasets/1234/LATEST/curation-export.json","name":"curation-export.json","auth":null,"query":null}]"#
    );
    assert_eq!(
        fetcher.seen.lock().expect("lock").as_deref(),
        Some(written.as_str()),
        "fetcher must see the freshly written config"
    );
}

#[tokio::test]
async fn test_run_preserves_custom_file_name_order() {
    let server = MockServer::start().await;
    let dataset_uuid = "0f9d7c1e-2222-4b4b-9a9a-123456789abc";
    mount_integration(&server, "int-2", &format!("{DATASET_NODE_ID_PREFIX}{dataset_uuid}")).await;
    let input = TempDir::new().expect("failed to create temp dir");
    let names = ["curation-export.ttl", "curation-export.json", "manifest.json"];

    let report = pipeline(&server, "int-2", input.path(), EXAMPLE_PATTERN, Box::new(RecordingFetcher::default()))
        .with_file_names(names)
        .run()
        .await
        .expect("run should succeed");

    let files = read_config(&report.config_path).await.expect("read config");
    assert_eq!(files.len(), names.len());
    for (file, name) in files.iter().zip(names) {
        assert_eq!(file.name, name);
        assert_eq!(
            file.url,
            format!("https://host/sparc/datasets/{dataset_uuid}/LATEST/{name}")
        );
        assert!(file.auth.is_none());
        assert!(file.query.is_none());
    }
}

#[tokio::test]
async fn test_run_downloads_export_files_into_input_dir() {
    let server = MockServer::start().await;
    mount_integration(&server, "abc", "N:dataset:1234").await;
    let export_body = br#"{"id": "N:dataset:1234", "meta": {"title": "Example"}}"#;
    Mock::given(method("GET"))
        .and(path("/sparc/datasets/1234/LATEST/curation-export.json"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(export_body.to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let input = TempDir::new().expect("failed to create temp dir");
    let pattern = format!("{}/sparc/datasets/%s/LATEST/%s", server.uri());
    let fetcher = HttpFilesFetcher::new().expect("fetcher");

    let report = pipeline(&server, "abc", input.path(), &pattern, Box::new(fetcher))
        .run()
        .await
        .expect("run should succeed");

    let expected_path = input.path().join("curation-export.json");
    assert_eq!(report.downloaded, vec![expected_path.clone()]);
    assert_eq!(std::fs::read(&expected_path).expect("downloaded file"), export_body);
}

#[tokio::test]
async fn test_run_api_404_fails_without_writing_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/integrations/abc"))
        .respond_with(ResponseTemplate::new(404).set_body_string("integration not found"))
        .mount(&server)
        .await;
    let input = TempDir::new().expect("failed to create temp dir");

    let err = pipeline(&server, "abc", input.path(), EXAMPLE_PATTERN, Box::new(RecordingFetcher::default()))
        .run()
        .await
        .expect_err("run should fail");

    assert!(matches!(err, PipelineError::Api(ApiError::Status { .. })));
    let msg = err.to_string();
    assert!(msg.contains("GET"), "method missing: {msg}");
    assert!(msg.contains(&format!("{}/integrations/abc", server.uri())), "URL missing: {msg}");
    assert!(msg.contains("404"), "status missing: {msg}");
    assert!(!input.path().join(EXTERNAL_FILES_CONFIG_NAME).exists());
}

#[tokio::test]
async fn test_run_bad_dataset_id_fails_without_writing_config() {
    let server = MockServer::start().await;
    mount_integration(&server, "abc", "bad-id").await;
    let input = TempDir::new().expect("failed to create temp dir");
    let exporter = RecordingExporter::default();

    let err = pipeline(&server, "abc", input.path(), EXAMPLE_PATTERN, Box::new(RecordingFetcher::default()))
        .with_metadata_exporter(Box::new(exporter.clone()))
        .run()
        .await
        .expect_err("run should fail");

    let msg = err.to_string();
    assert!(msg.contains("bad-id"), "dataset ID missing: {msg}");
    assert!(msg.contains(DATASET_NODE_ID_PREFIX), "prefix missing: {msg}");
    assert!(exporter.calls.lock().expect("lock").is_empty());
    assert!(!input.path().join(EXTERNAL_FILES_CONFIG_NAME).exists());
}

#[tokio::test]
async fn test_run_malformed_integration_payload_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/integrations/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    let input = TempDir::new().expect("failed to create temp dir");

    let err = pipeline(&server, "abc", input.path(), EXAMPLE_PATTERN, Box::new(RecordingFetcher::default()))
        .run()
        .await
        .expect_err("run should fail");

    assert!(matches!(err, PipelineError::Api(ApiError::Decode { .. })));
    assert!(err.to_string().contains("<html>oops</html>"));
}

#[tokio::test]
async fn test_run_exports_metadata_with_full_dataset_id() {
    let server = MockServer::start().await;
    mount_integration(&server, "abc", "N:dataset:1234").await;
    let input = TempDir::new().expect("failed to create temp dir");
    let exporter = RecordingExporter::default();

    pipeline(&server, "abc", input.path(), EXAMPLE_PATTERN, Box::new(RecordingFetcher::default()))
        .with_metadata_exporter(Box::new(exporter.clone()))
        .run()
        .await
        .expect("run should succeed");

    assert_eq!(*exporter.calls.lock().expect("lock"), vec!["N:dataset:1234".to_string()]);
}

#[tokio::test]
async fn test_run_metadata_failure_propagates_verbatim() {
    let server = MockServer::start().await;
    mount_integration(&server, "abc", "N:dataset:1234").await;
    let input = TempDir::new().expect("failed to create temp dir");
    let exporter = RecordingExporter {
        fail: true,
        ..RecordingExporter::default()
    };

    let err = pipeline(&server, "abc", input.path(), EXAMPLE_PATTERN, Box::new(RecordingFetcher::default()))
        .with_metadata_exporter(Box::new(exporter))
        .run()
        .await
        .expect_err("run should fail");

    assert!(matches!(err, PipelineError::Metadata(_)));
    assert_eq!(
        err.to_string(),
        "IO error writing metadata to /tmp/metadata: metadata disk full"
    );
    assert!(!input.path().join(EXTERNAL_FILES_CONFIG_NAME).exists());
}

#[tokio::test]
async fn test_run_fetch_failure_propagates_after_config_written() {
    let server = MockServer::start().await;
    mount_integration(&server, "abc", "N:dataset:1234").await;
    let input = TempDir::new().expect("failed to create temp dir");

    let err = pipeline(&server, "abc", input.path(), EXAMPLE_PATTERN, Box::new(FailingFetcher))
        .run()
        .await
        .expect_err("run should fail");

    assert!(matches!(err, PipelineError::Fetch(_)));
    assert!(err.to_string().contains("HTTP 503"));
    assert!(input.path().join(EXTERNAL_FILES_CONFIG_NAME).exists());
}
