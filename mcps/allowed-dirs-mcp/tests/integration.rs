//! Integration tests for allowed-dirs-mcp
//!
//! The manager and a filesystem server share one permission store file, the
//! way they do when deployed as separate processes.
//!
//! # Running tests
//!
//! ```bash
//! cargo test -p allowed-dirs-mcp --test integration
//! ```

use allowed_dirs_mcp::AllowedDirsServer;
use filesystem_mcp::FilesystemServer;
use gateway_common::transport::serve;
use gateway_common::{PermissionStore, ToolRegistry, ToolServer};
use serde_json::{json, Value};
use tempfile::TempDir;

struct Deployment {
    tmp: TempDir,
    manager: ToolRegistry,
    filesystem: ToolRegistry,
}

impl Deployment {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("host")).unwrap();
        std::fs::create_dir(tmp.path().join("data")).unwrap();
        std::fs::write(tmp.path().join("data/report.txt"), "quarterly").unwrap();

        let store_path = tmp.path().join("scripts").join("allowed_dirs.json");
        let protected = vec![tmp.path().join("host")];

        // Two independent store handles on the same file
        let manager =
            AllowedDirsServer::with_store(PermissionStore::new(&store_path, protected.clone()))
                .into_registry();
        let filesystem =
            FilesystemServer::with_store(PermissionStore::new(&store_path, protected))
                .into_registry();

        Self {
            tmp,
            manager,
            filesystem,
        }
    }

    fn dir(&self, rel: &str) -> String {
        self.tmp.path().join(rel).display().to_string()
    }
}

#[tokio::test]
async fn added_directory_is_readable_without_restart() {
    let d = Deployment::new();
    let report = d.dir("data/report.txt");

    let before = d
        .filesystem
        .call("read_file", Some(json!({"path": report})))
        .await
        .unwrap();
    assert_eq!(before["error"]["code"], "AccessDenied");

    let added = d
        .manager
        .call("add_allowed_directory", Some(json!({"directory": d.dir("data")})))
        .await
        .unwrap();
    assert_eq!(added["success"], true);

    let after = d
        .filesystem
        .call("read_file", Some(json!({"path": report})))
        .await
        .unwrap();
    assert_eq!(after["content"], "quarterly");

    d.manager
        .call("remove_allowed_directory", Some(json!({"directory": d.dir("data")})))
        .await
        .unwrap();
    let revoked = d
        .filesystem
        .call("read_file", Some(json!({"path": report})))
        .await
        .unwrap();
    assert_eq!(revoked["error"]["code"], "AccessDenied");
}

#[tokio::test]
async fn replace_with_empty_list_keeps_protected() {
    let d = Deployment::new();
    let result = d
        .manager
        .call("update_allowed_directories", Some(json!({"directories": []})))
        .await
        .unwrap();
    assert_eq!(result["allowed_dirs"], json!([d.dir("host")]));

    let err = d
        .manager
        .call("remove_allowed_directory", Some(json!({"directory": d.dir("host")})))
        .await
        .unwrap();
    assert_eq!(err["error"]["code"], "ProtectedEntry");
}

#[tokio::test]
async fn manager_speaks_the_line_protocol() {
    let d = Deployment::new();
    let input = [
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/call",
            "params": {"name": "add_allowed_directory", "arguments": {"directory": d.dir("data")}},
        }),
        json!({"jsonrpc": "2.0", "id": 3, "method": "get_allowed_directories"}),
    ]
    .iter()
    .map(|r| format!("{}\n", r))
    .collect::<String>();

    let mut output = Vec::new();
    serve(&d.manager, input.as_bytes(), &mut output).await.unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["result"]["tools"].as_array().unwrap().len(), 6);
    assert_eq!(responses[1]["result"]["success"], true);
    assert_eq!(responses[2]["id"], 3);
    assert_eq!(responses[2]["result"]["allowed_dirs"], json!([d.dir("data")]));
}
