//! Tool Registry Integration Tests
//!
//! Dispatch by name through `ToolRegistry` against a real directory, the way
//! the step executor calls it.

use serde_json::{json, Value};
use tempfile::TempDir;

use docsmith_core::{KnowledgeStore, ToolContext};
use docsmith_tools::{ToolRegistry, ToolResult};

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("src/net")).unwrap();
    std::fs::create_dir_all(root.join("target/debug")).unwrap();
    std::fs::write(root.join("Cargo.toml"), "[package]\nname = \"demo\"\n").unwrap();
    std::fs::write(
        root.join("src/main.rs"),
        "mod net;\n\nfn main() {\n    net::serve(8080);\n}\n",
    )
    .unwrap();
    std::fs::write(
        root.join("src/net/mod.rs"),
        "pub fn serve(port: u16) {\n    println!(\"listening on {}\", port);\n}\n",
    )
    .unwrap();
    std::fs::write(root.join("target/debug/demo"), [0u8, 1, 2, 3]).unwrap();
    dir
}

async fn call(dir: &TempDir, memory: &mut KnowledgeStore, name: &str, args: Value) -> ToolResult {
    let registry = ToolRegistry::new();
    let mut ctx = ToolContext::new(dir.path(), memory);
    registry.execute(name, &mut ctx, args).await
}

#[test]
fn test_catalog_has_six_tools_with_object_schemas() {
    let registry = ToolRegistry::new();
    let definitions = registry.definitions();
    let names: Vec<&str> = definitions.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "list_files",
            "read_file",
            "search_code",
            "record_insight",
            "mark_file_analyzed",
            "write_documentation"
        ]
    );
    for definition in &definitions {
        assert_eq!(definition.input_schema.schema_type, "object");
        assert!(!definition.description.is_empty());
    }
}

#[tokio::test]
async fn test_list_files_skips_build_output() {
    let dir = project();
    let mut memory = KnowledgeStore::new();
    let output = call(&dir, &mut memory, "list_files", json!({}))
        .await
        .to_content();
    assert!(output.contains("src/main.rs"));
    assert!(output.contains("src/net/mod.rs"));
    assert!(!output.contains("target/debug"));

    let filtered = call(&dir, &mut memory, "list_files", json!({"pattern": "*.toml"}))
        .await
        .to_content();
    assert!(filtered.contains("Cargo.toml"));
    assert!(!filtered.contains("main.rs"));
}

#[tokio::test]
async fn test_read_file_line_range() {
    let dir = project();
    let mut memory = KnowledgeStore::new();
    let result = call(
        &dir,
        &mut memory,
        "read_file",
        json!({"path": "src/main.rs", "start_line": 3, "end_line": 4}),
    )
    .await;
    assert!(result.success);
    let output = result.to_content();
    assert!(output.contains("fn main() {"));
    assert!(output.contains("net::serve(8080);"));
    assert!(!output.contains("mod net;"));

    let reversed = call(
        &dir,
        &mut memory,
        "read_file",
        json!({"path": "src/main.rs", "start_line": 4, "end_line": 2}),
    )
    .await;
    assert!(!reversed.success);
}

#[tokio::test]
async fn test_search_code_reports_locations() {
    let dir = project();
    let mut memory = KnowledgeStore::new();
    let output = call(&dir, &mut memory, "search_code", json!({"pattern": "serve\\("}))
        .await
        .to_content();
    assert!(output.contains("src/main.rs:4:"));
    assert!(output.contains("src/net/mod.rs:1:"));
}

#[tokio::test]
async fn test_knowledge_tools_mutate_store() {
    let dir = project();
    let mut memory = KnowledgeStore::new();

    call(
        &dir,
        &mut memory,
        "mark_file_analyzed",
        json!({"path": "./src/main.rs", "summary": "Binary entry point"}),
    )
    .await;
    call(
        &dir,
        &mut memory,
        "record_insight",
        json!({"insight": "Single HTTP listener"}),
    )
    .await;
    call(
        &dir,
        &mut memory,
        "record_insight",
        json!({"insight": "Single HTTP listener"}),
    )
    .await;
    for title in ["Networking", "Ports"] {
        call(
            &dir,
            &mut memory,
            "write_documentation",
            json!({"title": title, "content": "...", "category": "modules"}),
        )
        .await;
    }

    assert!(memory.is_file_analyzed("src/main.rs"));
    assert_eq!(memory.insights().len(), 1);
    let orders: Vec<usize> = memory.sections().iter().map(|s| s.order).collect();
    assert_eq!(orders, vec![0, 1]);
}

#[tokio::test]
async fn test_invalid_invocations_become_error_results() {
    let dir = project();
    let mut memory = KnowledgeStore::new();

    let cases = [
        ("run_shell", json!({"command": "ls"})),
        ("read_file", json!({})),
        ("read_file", json!({"path": "src/main.rs", "encoding": "utf-16"})),
        ("list_files", json!("src")),
        ("read_file", json!({"path": "../../etc/passwd"})),
        ("read_file", json!({"path": "target/debug/demo"})),
    ];
    for (name, args) in cases {
        let result = call(&dir, &mut memory, name, args.clone()).await;
        assert!(!result.success, "{} {} should fail", name, args);
        assert!(result.to_content().starts_with("Error: "));
    }
    assert_eq!(memory.analyzed_file_count(), 0);
}
