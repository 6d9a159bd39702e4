//! MCP protocol integration tests.
//!
//! These tests spawn the actual `devplan mcp` process and communicate via
//! JSON-RPC over stdio, testing the complete MCP protocol flow.
//!
//! The rmcp library uses line-delimited JSON (each message is one line):
//! ```text
//! {"jsonrpc":"2.0","id":1,"method":"initialize",...}\n
//! {"jsonrpc":"2.0","id":1,"result":{...}}\n
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};
use tempfile::TempDir;

/// JSON-RPC 2.0 request
#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: &'static str,
    id: u64,
    method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: Option<u64>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct JsonRpcError {
    code: i64,
    message: String,
    data: Option<Value>,
}

/// MCP test client that spawns and communicates with the server
struct McpTestClient {
    child: Child,
    request_id: u64,
    reader: BufReader<std::process::ChildStdout>,
    root: TempDir,
}

impl McpTestClient {
    /// Spawn a new MCP server process over an isolated project root
    fn spawn() -> Self {
        let root = tempfile::tempdir().expect("Failed to create temp dir");

        let mut child = Command::new(env!("CARGO_BIN_EXE_devplan"))
            .arg("--root")
            .arg(root.path())
            .arg("mcp")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to spawn devplan mcp");

        let stdout = child.stdout.take().expect("Failed to get stdout");
        let reader = BufReader::new(stdout);

        Self {
            child,
            request_id: 0,
            reader,
            root,
        }
    }

    /// Send a message as line-delimited JSON
    fn send_message(&mut self, content: &str) {
        let stdin = self.child.stdin.as_mut().expect("Failed to get stdin");
        writeln!(stdin, "{}", content).expect("Failed to write message");
        stdin.flush().expect("Failed to flush stdin");
    }

    /// Read a message as line-delimited JSON
    fn read_message(&mut self) -> String {
        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .expect("Failed to read line");
        line.trim().to_string()
    }

    /// Send a JSON-RPC request and get the response
    fn request(&mut self, method: &str, params: Option<Value>) -> JsonRpcResponse {
        self.request_id += 1;
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.request_id,
            method: method.to_string(),
            params,
        };

        let request_json = serde_json::to_string(&request).expect("Failed to serialize request");
        self.send_message(&request_json);

        let response_json = self.read_message();
        serde_json::from_str(&response_json).expect("Failed to parse response")
    }

    /// Send initialize request and initialized notification (required first messages)
    fn initialize(&mut self) -> JsonRpcResponse {
        let response = self.request(
            "initialize",
            Some(json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {
                    "name": "test-client",
                    "version": "1.0.0"
                }
            })),
        );

        let notification = json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        });
        self.send_message(&notification.to_string());

        response
    }

    fn list_tools(&mut self) -> JsonRpcResponse {
        self.request("tools/list", None)
    }

    fn call_tool(&mut self, name: &str, arguments: Value) -> JsonRpcResponse {
        self.request(
            "tools/call",
            Some(json!({
                "name": name,
                "arguments": arguments
            })),
        )
    }
}

impl Drop for McpTestClient {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Extract the first text content block from a tool result
fn extract_text_content(response: &JsonRpcResponse) -> String {
    response
        .result
        .as_ref()
        .and_then(|r| r.get("content"))
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|c| c.get("text"))
        .and_then(|t| t.as_str())
        .expect("Expected text content")
        .to_string()
}

// ============================================================
// Protocol Tests
// ============================================================

mod protocol {
    use super::*;

    #[test]
    fn initialize_returns_server_info() {
        let mut client = McpTestClient::spawn();
        let response = client.initialize();

        assert!(response.error.is_none(), "Expected success, got error");
        let result = response.result.expect("Expected result");
        assert_eq!(result["serverInfo"]["name"].as_str(), Some("devplan"));
        assert!(result.get("capabilities").is_some());
    }

    #[test]
    fn tools_list_returns_all_tools() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.list_tools();
        assert!(response.error.is_none(), "Expected success, got error");

        let result = response.result.expect("Expected result");
        let tools = result["tools"].as_array().expect("Tools should be array");
        assert_eq!(tools.len(), 11, "Expected 11 tools, got {}", tools.len());

        let tool_names: Vec<&str> = tools
            .iter()
            .filter_map(|t| t.get("name").and_then(|n| n.as_str()))
            .collect();

        for name in [
            "get_project_context",
            "get_guidance",
            "start_new_iteration",
            "list_iterations",
            "complete_iteration",
            "decompose_goal_into_requirements",
            "generate_tasks_for_requirement",
            "update_task_status",
            "update_development_report",
            "view_current_iteration_plan",
            "view_development_report",
        ] {
            assert!(tool_names.contains(&name), "Missing tool {}", name);
        }

        for tool in tools {
            assert!(tool.get("description").is_some());
            assert!(tool.get("inputSchema").is_some());
        }
    }
}

// ============================================================
// Tool Call Tests
// ============================================================

mod tool_calls {
    use super::*;

    #[test]
    fn start_iteration_writes_to_project_root() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.call_tool(
            "start_new_iteration",
            json!({ "version": "1.0.0", "prd": "Build login" }),
        );
        assert!(response.error.is_none(), "Expected success, got error");
        assert!(extract_text_content(&response).contains("v1.0.0"));

        let document = client
            .root
            .path()
            .join(".cursor/devplan/v1.0.0/iteration.json");
        assert!(document.is_file());
    }

    #[test]
    fn invalid_version_is_an_error() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.call_tool(
            "start_new_iteration",
            json!({ "version": "1.0", "prd": "Build login" }),
        );
        assert!(response.error.is_some());
    }

    #[test]
    fn planning_workflow() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        client.call_tool(
            "start_new_iteration",
            json!({ "version": "1.0.0", "prd": "Build login" }),
        );

        let decompose = client.call_tool(
            "decompose_goal_into_requirements",
            json!({
                "goal_id": "auth",
                "requirements": [{ "title": "Login form", "description": "Email and password" }]
            }),
        );
        let decompose: Value = serde_json::from_str(&extract_text_content(&decompose)).unwrap();
        assert_eq!(decompose["requirements_added"].as_u64(), Some(1));

        let list = client.call_tool("list_iterations", json!({}));
        let list: Value = serde_json::from_str(&extract_text_content(&list)).unwrap();
        assert_eq!(list["iterations"][0]["version"].as_str(), Some("1.0.0"));
        assert_eq!(list["iterations"][0]["requirements_count"].as_u64(), Some(1));

        let document: Value = serde_json::from_str(
            &std::fs::read_to_string(
                client
                    .root
                    .path()
                    .join(".cursor/devplan/v1.0.0/iteration.json"),
            )
            .unwrap(),
        )
        .unwrap();
        let requirement_id = document["goals"][0]["requirements"][0]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let generate = client.call_tool(
            "generate_tasks_for_requirement",
            json!({
                "requirement_id": requirement_id,
                "tasks": [
                    { "title": "Form", "description": "Render fields", "complexity": "low" },
                    { "title": "API", "description": "Call backend", "complexity": "high" }
                ]
            }),
        );
        assert!(generate.error.is_none());

        let report = client.call_tool(
            "update_development_report",
            json!({ "content": "Started on the form" }),
        );
        assert!(extract_text_content(&report).contains("append"));

        let plan = extract_text_content(&client.call_tool("view_current_iteration_plan", json!({})));
        assert!(plan.contains("**Status**: in_progress"));
        assert!(plan.contains("- **Tasks**: 2"));
    }
}
