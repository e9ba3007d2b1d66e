//! JSON-RPC handling of the stdio server over in-memory streams.

mod common;

use std::sync::Arc;

use serde_json::{Value, json};

use summaraize::config::Config;
use summaraize::server::McpServer;
use summaraize::server::stdio::serve;
use summaraize::store::ProjectStore;
use summaraize::tools::ToolContext;

use common::{FakeExtractor, FakeModel, FakeSource, VocabEmbedder, paper};

fn setup_server(dir: &tempfile::TempDir) -> McpServer {
    let config = Config::for_testing("http://127.0.0.1:1", dir.path());
    let store = ProjectStore::open(dir.path()).unwrap();
    let source = FakeSource { papers: vec![paper("2301.07041")], ..Default::default() };

    McpServer::with_context(ToolContext::new(
        config,
        store,
        Arc::new(source),
        Arc::new(FakeModel::constant("ok")),
        Arc::new(VocabEmbedder::new(&["ok"])),
        Arc::new(FakeExtractor::default()),
    ))
}

/// Feed newline-delimited requests through the server and collect the responses.
async fn exchange(server: &McpServer, requests: &[Value]) -> Vec<Value> {
    let input: String = requests.iter().map(|r| format!("{r}\n")).collect();
    let mut output = Vec::new();

    serve(input.as_bytes(), &mut output, server.tools(), server.context()).await.unwrap();

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
        "params": { "name": name, "arguments": arguments }
    })
}

#[tokio::test]
async fn test_initialize_and_list_tools() {
    let dir = tempfile::tempdir().unwrap();
    let server = setup_server(&dir);

    let responses = exchange(
        &server,
        &[
            json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": { "protocolVersion": "2024-11-05" } }),
            json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
            json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" }),
        ],
    )
    .await;

    // The notification gets no response
    assert_eq!(responses.len(), 2);

    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "summaraize");
    assert_eq!(responses[0]["result"]["protocolVersion"], "2024-11-05");

    let tools = responses[1]["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 16);
    assert!(tools.iter().any(|t| t["name"] == "set_citation_id"));
    assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));
}

#[tokio::test]
async fn test_protocol_errors() {
    let dir = tempfile::tempdir().unwrap();
    let server = setup_server(&dir);

    let input = "{not json\n\n{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"resources/list\"}\n";
    let mut output = Vec::new();
    serve(input.as_bytes(), &mut output, server.tools(), server.context()).await.unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    // Blank lines are skipped
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert!(responses[0]["id"].is_null());
    assert_eq!(responses[1]["error"]["code"], -32601);
    assert_eq!(responses[1]["id"], 7);

    let responses = exchange(
        &server,
        &[
            call(1, "no_such_tool", json!({})),
            json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/call", "params": {} }),
        ],
    )
    .await;
    assert_eq!(responses[0]["error"]["code"], -32602);
    assert_eq!(responses[1]["error"]["code"], -32602);
}

#[tokio::test]
async fn test_tool_calls_over_the_wire() {
    let dir = tempfile::tempdir().unwrap();
    let server = setup_server(&dir);

    let responses = exchange(
        &server,
        &[
            call(1, "add_paper", json!({ "url": "https://arxiv.org/abs/2301.07041" })),
            call(2, "create_project", json!({ "title": "Quantum" })),
            call(3, "add_paper", json!({ "url": "https://arxiv.org/abs/2301.07041" })),
            json!({ "jsonrpc": "2.0", "id": 4, "method": "ping" }),
        ],
    )
    .await;

    // Tool faults are results flagged isError, not JSON-RPC errors
    assert!(responses[0]["error"].is_null());
    assert_eq!(responses[0]["result"]["isError"], true);
    let text = responses[0]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("No project is open"));

    assert!(responses[1]["result"]["isError"].is_null());
    let text = responses[2]["result"]["content"][0]["text"].as_str().unwrap();
    assert_eq!(text, "Added [1] Paper 2301.07041 (`2301.07041`).");

    assert_eq!(responses[3]["result"], json!({}));
}
