//! End-to-end export tests against a mock space API

use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};
use spacedump::config::{parse_config, SpacedumpConfig};
use spacedump::core::export::ExportCoordinator;
use spacedump::core::pipeline::SilentRenderer;
use spacedump::domain::{MultiError, SpacedumpError};
use std::sync::Arc;
use tempfile::TempDir;

const SNAPSHOT: &str = "snapshot.json";
const ERROR_LOG: &str = "errors.json";

fn config(server: &ServerGuard, export_dir: &TempDir, extra: &str) -> SpacedumpConfig {
    let error_log = export_dir.path().join(ERROR_LOG);
    let toml = format!(
        r#"
[space]
space_id = "space1"
management_token = "cma"
host = "{host}"
insecure = true

[export]
export_dir = "{dir}"
content_file = "{SNAPSHOT}"
error_log_file = "{error_log}"
{extra}
"#,
        host = server.host_with_port(),
        dir = export_dir.path().display(),
        error_log = error_log.display(),
    );
    let config = parse_config(&toml).unwrap();
    config.validate().unwrap();
    config
}

fn page(items: Value) -> String {
    let total = items.as_array().map_or(0, Vec::len);
    json!({ "items": items, "total": total, "skip": 0, "limit": 1000 }).to_string()
}

async fn list(server: &mut ServerGuard, path: &str, items: Value) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer cma")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(items))
        .create_async()
        .await
}

/// Mocks a small master environment with one content type, three entries
/// (published, draft, archived) and one asset served by the same server
async fn mock_space(server: &mut ServerGuard) -> Vec<Mock> {
    let file_url = format!("http://{}/files/logo.png", server.host_with_port());
    let mut mocks = Vec::new();

    mocks.push(
        server
            .mock("GET", "/spaces/space1/environments/master")
            .with_status(200)
            .with_body(r#"{"sys":{"id":"master"}}"#)
            .create_async()
            .await,
    );
    mocks.push(
        list(
            server,
            "/spaces/space1/environments/master/content_types",
            json!([{ "sys": { "id": "post" }, "name": "Post" }]),
        )
        .await,
    );
    mocks.push(list(server, "/spaces/space1/environments/master/tags", json!([])).await);
    mocks.push(
        server
            .mock(
                "GET",
                "/spaces/space1/environments/master/content_types/post/editor_interface",
            )
            .with_status(200)
            .with_body(r#"{"sys":{"id":"default"},"controls":[]}"#)
            .create_async()
            .await,
    );
    mocks.push(
        list(
            server,
            "/spaces/space1/environments/master/entries",
            json!([
                { "sys": { "id": "e1", "publishedVersion": 2 } },
                { "sys": { "id": "e2" } },
                { "sys": { "id": "e3", "publishedVersion": 2, "archivedVersion": 4 } }
            ]),
        )
        .await,
    );
    mocks.push(
        list(
            server,
            "/spaces/space1/environments/master/assets",
            json!([{
                "sys": { "id": "a1", "publishedVersion": 1 },
                "fields": { "file": { "en-US": { "url": file_url } } }
            }]),
        )
        .await,
    );
    mocks.push(
        list(
            server,
            "/spaces/space1/environments/master/locales",
            json!([{ "code": "en-US", "default": true }]),
        )
        .await,
    );
    mocks.push(
        list(
            server,
            "/spaces/space1/webhook_definitions",
            json!([{ "name": "deploy" }]),
        )
        .await,
    );
    mocks.push(list(server, "/spaces/space1/roles", json!([{ "name": "Editor" }])).await);
    mocks
}

#[tokio::test]
async fn test_full_export_writes_snapshot() {
    let mut server = mockito::Server::new_async().await;
    let export_dir = TempDir::new().unwrap();
    let _mocks = mock_space(&mut server).await;
    let file = server
        .mock("GET", "/files/logo.png")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body("PNG")
        .create_async()
        .await;

    let coordinator = ExportCoordinator::new(config(&server, &export_dir, "download_assets = true"))
        .with_renderer(Arc::new(SilentRenderer));
    let mut out = Vec::new();
    let data = coordinator.execute_export_to(&mut out).await.unwrap();

    file.assert_async().await;
    assert_eq!(data["contentTypes"].len(), 1);
    assert_eq!(data["editorInterfaces"].len(), 1);
    // Only the published, non-archived entry survives
    assert_eq!(data["entries"].len(), 1);
    assert_eq!(data["entries"][0]["sys"]["id"], "e1");
    assert_eq!(data["webhooks"].len(), 1);
    assert_eq!(data["roles"].len(), 1);

    let snapshot: Value = serde_json::from_str(
        &std::fs::read_to_string(export_dir.path().join(SNAPSHOT)).unwrap(),
    )
    .unwrap();
    assert_eq!(snapshot["locales"][0]["code"], "en-US");
    assert_eq!(snapshot["assets"][0]["sys"]["id"], "a1");

    let downloaded = export_dir
        .path()
        .join("127.0.0.1")
        .join("files")
        .join("logo.png");
    assert_eq!(std::fs::read(downloaded).unwrap(), b"PNG");

    let report = String::from_utf8(out).unwrap();
    assert!(report.contains("Exported entities"));
    assert!(report.contains("Asset file download results"));
    assert!(report.contains("Stored space data to json file at:"));
    assert!(report.contains("No errors or warnings occurred"));
    assert!(report.contains("The export was successful."));
    assert!(!export_dir.path().join(ERROR_LOG).exists());
}

#[tokio::test]
async fn test_failed_download_is_a_warning() {
    let mut server = mockito::Server::new_async().await;
    let export_dir = TempDir::new().unwrap();
    let _mocks = mock_space(&mut server).await;
    server
        .mock("GET", "/files/logo.png")
        .with_status(404)
        .create_async()
        .await;

    let coordinator = ExportCoordinator::new(config(&server, &export_dir, "download_assets = true"))
        .with_renderer(Arc::new(SilentRenderer));
    let mut out = Vec::new();
    let result = coordinator.execute_export_to(&mut out).await;

    // Tallied as a download error, logged as a warning
    assert!(result.is_ok());
    assert!(export_dir.path().join(SNAPSHOT).exists());
    assert!(!export_dir.path().join(ERROR_LOG).exists());

    let report = String::from_utf8(out).unwrap();
    assert!(report.contains("Asset file download results"));
    assert!(report.contains("The following 0 errors and 1 warnings occurred:"));
    assert!(report.contains("Error downloading asset a1"));
    assert!(report.contains("The export was successful."));
}

#[tokio::test]
async fn test_aborted_export_writes_error_log() {
    let mut server = mockito::Server::new_async().await;
    let export_dir = TempDir::new().unwrap();
    server
        .mock("GET", "/spaces/space1/environments/master")
        .with_status(200)
        .with_body(r#"{"sys":{"id":"master"}}"#)
        .create_async()
        .await;
    list(
        &mut server,
        "/spaces/space1/environments/master/content_types",
        json!([]),
    )
    .await;
    list(&mut server, "/spaces/space1/environments/master/tags", json!([])).await;
    server
        .mock("GET", "/spaces/space1/environments/master/entries")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let coordinator = ExportCoordinator::new(config(&server, &export_dir, ""))
        .with_renderer(Arc::new(SilentRenderer));
    let mut out = Vec::new();
    let err = coordinator.execute_export_to(&mut out).await.unwrap_err();

    let SpacedumpError::Aggregate(MultiError { errors }) = err else {
        panic!("expected aggregate failure");
    };
    assert_eq!(errors.len(), 1);

    assert!(!export_dir.path().join(SNAPSHOT).exists());
    let error_log: Value = serde_json::from_str(
        &std::fs::read_to_string(export_dir.path().join(ERROR_LOG)).unwrap(),
    )
    .unwrap();
    assert_eq!(error_log.as_array().unwrap().len(), 1);
    assert_eq!(error_log[0]["level"], "error");

    let report = String::from_utf8(out).unwrap();
    // Collections fetched before the failure are still tabulated
    assert!(report.contains("Exported entities"));
    assert!(!report.contains("Stored space data to json file at:"));
    assert!(report.contains("The following 1 errors and 0 warnings occurred:"));
    assert!(report.contains("Stored the detailed error log file at:"));
}

#[tokio::test]
async fn test_access_denied_aborts_before_fetching() {
    let mut server = mockito::Server::new_async().await;
    let export_dir = TempDir::new().unwrap();
    server
        .mock("GET", "/spaces/space1/environments/master")
        .with_status(401)
        .create_async()
        .await;
    let never = server
        .mock("GET", Matcher::Regex("/content_types".to_string()))
        .expect(0)
        .create_async()
        .await;

    let coordinator = ExportCoordinator::new(config(&server, &export_dir, ""))
        .with_renderer(Arc::new(SilentRenderer));
    let mut out = Vec::new();
    let err = coordinator.execute_export_to(&mut out).await.unwrap_err();

    never.assert_async().await;
    assert!(matches!(err, SpacedumpError::Aggregate(_)));
    let report = String::from_utf8(out).unwrap();
    assert!(report.contains("No data was exported"));
}
