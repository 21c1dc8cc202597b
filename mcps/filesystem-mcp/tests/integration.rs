//! Integration tests for filesystem-mcp
//!
//! These drive the full server through the line-delimited transport with
//! in-memory buffers standing in for stdin/stdout.
//!
//! # Running tests
//!
//! ```bash
//! cargo test -p filesystem-mcp --test integration
//! ```

use filesystem_mcp::FilesystemServer;
use gateway_common::error::codes;
use gateway_common::transport::serve;
use gateway_common::{PermissionStore, ToolServer};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Feed request lines through a fresh server and collect the response lines
async fn session(store: PermissionStore, requests: &[Value]) -> Vec<Value> {
    let registry = FilesystemServer::with_store(store).into_registry();
    let input: String = requests.iter().map(|r| format!("{}\n", r)).collect();
    let mut output = Vec::new();

    serve(&registry, input.as_bytes(), &mut output).await.unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn call(id: u64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments },
    })
}

fn project_store(tmp: &TempDir) -> PermissionStore {
    std::fs::create_dir(tmp.path().join("project")).unwrap();
    let store = PermissionStore::new(tmp.path().join("allowed_dirs.json"), Vec::new());
    store.replace([tmp.path().join("project")]).unwrap();
    store
}

#[tokio::test]
async fn initialize_returns_catalog() {
    let tmp = TempDir::new().unwrap();
    let responses = session(
        project_store(&tmp),
        &[json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}})],
    )
    .await;

    assert_eq!(responses.len(), 1);
    let result = &responses[0]["result"];
    assert_eq!(result["serverInfo"]["name"], "filesystem");
    let tools = result["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 10);
    assert!(tools.iter().any(|t| t["name"] == "search_files"));
}

#[tokio::test]
async fn write_read_and_deny_over_the_wire() {
    let tmp = TempDir::new().unwrap();
    let inside = tmp.path().join("project/a.txt").display().to_string();
    let outside = tmp.path().join("b.txt").display().to_string();

    let responses = session(
        project_store(&tmp),
        &[
            call(1, "write_file", json!({"path": inside, "content": "hello"})),
            call(2, "read_file", json!({"path": inside})),
            call(3, "read_file", json!({"path": outside})),
        ],
    )
    .await;

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["success"], true);
    assert_eq!(responses[1]["result"]["content"], "hello");
    assert_eq!(responses[2]["result"]["error"]["code"], "AccessDenied");
}

#[tokio::test]
async fn malformed_line_does_not_stop_the_loop() {
    let tmp = TempDir::new().unwrap();
    let registry = FilesystemServer::with_store(project_store(&tmp)).into_registry();
    let input = "{not json\n\n{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"ping\"}\n";
    let mut output = Vec::new();

    serve(&registry, input.as_bytes(), &mut output).await.unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["id"], Value::Null);
    assert_eq!(responses[0]["error"]["code"], codes::PARSE_ERROR);
    assert_eq!(responses[1]["id"], 7);
    assert!(responses[1]["result"].is_object());
}

#[tokio::test]
async fn protocol_errors_carry_request_id() {
    let tmp = TempDir::new().unwrap();
    let responses = session(
        project_store(&tmp),
        &[
            json!({"jsonrpc": "2.0", "id": "a", "method": "no_such_tool"}),
            call(2, "read_file", json!({})),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 3, "method": "list_allowed_directories"}),
        ],
    )
    .await;

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["id"], "a");
    assert_eq!(responses[0]["error"]["code"], codes::METHOD_NOT_FOUND);
    assert_eq!(responses[1]["error"]["code"], codes::INVALID_PARAMS);
    assert_eq!(
        responses[2]["result"]["allowed_dirs"].as_array().unwrap().len(),
        1
    );
}

#[tokio::test]
async fn allow_list_edits_apply_to_a_running_server() {
    let tmp = TempDir::new().unwrap();
    let store = project_store(&tmp);
    std::fs::create_dir(tmp.path().join("later")).unwrap();
    std::fs::write(tmp.path().join("later/x.txt"), "x").unwrap();

    let registry = FilesystemServer::with_store(store.clone()).into_registry();
    let target = tmp.path().join("later/x.txt").display().to_string();

    let denied = registry
        .call("read_file", Some(json!({"path": target})))
        .await
        .unwrap();
    assert_eq!(denied["error"]["code"], "AccessDenied");

    store
        .add(&tmp.path().join("later").display().to_string())
        .unwrap();

    let allowed = registry
        .call("read_file", Some(json!({"path": target})))
        .await
        .unwrap();
    assert_eq!(allowed["content"], "x");
}
