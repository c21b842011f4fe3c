//! Integration tests for Engram.

#![allow(clippy::expect_used, clippy::panic)]

use engram_rs::alert::AlertChannel;
use engram_rs::cli::serve;
use engram_rs::core::{Block, BlockKind, ContentKind, MemoryMetadata};
use engram_rs::error::{CommandError, Error, RemoteError, Result};
use engram_rs::notion::{CreatedPage, PageEntry, SearchHit, SearchRequest, WorkspaceApi};
use engram_rs::storage::{MemoryCache, MemoryStore, SqliteMemoryStore};
use engram_rs::tools::{ALERT_NOT_CONFIGURED, Engram, ToolCall, dispatch};
use engram_rs::{FixedChunker, aggregate_text};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// One recorded workspace call.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Recorded {
    CreatePage {
        parent_id: String,
        title: String,
        children: Vec<Block>,
    },
    Append {
        block_id: String,
        children: Vec<Block>,
    },
    List(String),
    Delete(String),
    Search(SearchRequest),
    Query(String),
}

/// A workspace that records calls and answers from canned data.
#[derive(Default)]
struct FakeWorkspace {
    calls: Arc<Mutex<Vec<Recorded>>>,
    children: Vec<Block>,
    hits: Vec<SearchHit>,
    entries: Vec<PageEntry>,
    failure: Option<u16>,
}

impl FakeWorkspace {
    fn record(&self, call: Recorded) -> Result<()> {
        self.calls.lock().expect("lock poisoned").push(call);
        match self.failure {
            Some(status) => Err(RemoteError::Api {
                status,
                code: "object_not_found".to_string(),
                message: "Could not find block".to_string(),
            }
            .into()),
            None => Ok(()),
        }
    }
}

impl WorkspaceApi for FakeWorkspace {
    fn create_page(&self, parent_id: &str, title: &str, children: &[Block]) -> Result<CreatedPage> {
        self.record(Recorded::CreatePage {
            parent_id: parent_id.to_string(),
            title: title.to_string(),
            children: children.to_vec(),
        })?;
        Ok(CreatedPage {
            id: "new-page-id".to_string(),
            url: Some("https://notion.so/test-page".to_string()),
        })
    }

    fn append_children(&self, block_id: &str, children: &[Block]) -> Result<()> {
        self.record(Recorded::Append {
            block_id: block_id.to_string(),
            children: children.to_vec(),
        })
    }

    fn list_children(&self, block_id: &str) -> Result<Vec<Block>> {
        self.record(Recorded::List(block_id.to_string()))?;
        Ok(self.children.clone())
    }

    fn delete_block(&self, block_id: &str) -> Result<()> {
        self.record(Recorded::Delete(block_id.to_string()))
    }

    fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        self.record(Recorded::Search(request.clone()))?;
        Ok(self.hits.clone())
    }

    fn query_database(&self, database_id: &str) -> Result<Vec<PageEntry>> {
        self.record(Recorded::Query(database_id.to_string()))?;
        Ok(self.entries.clone())
    }
}

/// An alert channel that records messages, optionally failing.
struct FakeAlerts {
    sent: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl AlertChannel for FakeAlerts {
    fn send(&self, message: &str) -> Result<()> {
        if self.fail {
            return Err(RemoteError::Http("connection refused".to_string()).into());
        }
        self.sent.lock().expect("lock poisoned").push(message.to_string());
        Ok(())
    }
}

/// Helper to build a tool set over a fake workspace and a temp cache.
fn create_test_engram(fake: FakeWorkspace) -> (Engram, Arc<Mutex<Vec<Recorded>>>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let calls = Arc::clone(&fake.calls);
    let engram = Engram::new(
        Box::new(fake),
        MemoryCache::new(temp_dir.path().join("memory.db")),
    )
    .with_default_page("test-page-id");
    (engram, calls, temp_dir)
}

fn recorded(calls: &Arc<Mutex<Vec<Recorded>>>) -> Vec<Recorded> {
    calls.lock().expect("lock poisoned").clone()
}

fn block_texts(children: &[Block]) -> Vec<String> {
    children
        .iter()
        .map(|b| b.plain_text().expect("text block"))
        .collect()
}

#[test]
fn test_create_page_chunks_long_content() {
    let (engram, calls, _temp) = create_test_engram(FakeWorkspace::default());
    let content = "a".repeat(3000);

    let result = engram
        .create_page("Large Page", &content, Some("parent-id"))
        .expect("create_page failed");
    assert_eq!(
        result,
        "Successfully created page 'Large Page': https://notion.so/test-page"
    );

    let calls = recorded(&calls);
    assert_eq!(calls.len(), 1);
    let Recorded::CreatePage {
        parent_id,
        title,
        children,
    } = &calls[0]
    else {
        panic!("expected create_page, got {:?}", calls[0]);
    };
    assert_eq!(parent_id, "parent-id");
    assert_eq!(title, "Large Page");
    assert!(children.len() > 1);
    assert!(children.iter().all(|b| b.type_name() == "paragraph"));

    let texts = block_texts(children);
    assert!(texts.iter().all(|t| t.chars().count() <= 2000));
    assert_eq!(texts.concat(), content);
}

#[test]
fn test_create_page_uses_default_parent() {
    let (engram, calls, _temp) = create_test_engram(FakeWorkspace::default());

    engram
        .create_page("Test Page", "Test content", None)
        .expect("create_page failed");

    assert!(matches!(
        &recorded(&calls)[0],
        Recorded::CreatePage { parent_id, .. } if parent_id == "test-page-id"
    ));
}

#[test]
fn test_create_page_without_any_parent() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let engram = Engram::new(
        Box::new(FakeWorkspace::default()),
        MemoryCache::new(temp_dir.path().join("memory.db")),
    );

    let err = engram
        .create_page("Orphan", "content", None)
        .expect_err("should require a parent");
    assert!(matches!(
        err,
        Error::Command(CommandError::MissingArgument(ref arg)) if arg == "parent_id"
    ));
}

#[test]
fn test_create_page_normalizes_url_parent() {
    let (engram, calls, _temp) = create_test_engram(FakeWorkspace::default());

    engram
        .create_page(
            "Test",
            "body",
            Some("https://www.notion.so/My-Page-1234567890ABCDEF1234567890abcdef"),
        )
        .expect("create_page failed");

    assert!(matches!(
        &recorded(&calls)[0],
        Recorded::CreatePage { parent_id, .. }
            if parent_id == "12345678-90ab-cdef-1234-567890abcdef"
    ));
}

#[test]
fn test_update_page_chunks_long_content() {
    let (engram, calls, _temp) = create_test_engram(FakeWorkspace::default());
    let content = "b".repeat(3000);

    let result = engram
        .update_page("test-page-id", Some("Large Update"), &content, ContentKind::Paragraph)
        .expect("update_page failed");
    assert_eq!(result, "Successfully updated page test-page-id");

    let calls = recorded(&calls);
    let Recorded::Append { block_id, children } = &calls[0] else {
        panic!("expected append, got {:?}", calls[0]);
    };
    assert_eq!(block_id, "test-page-id");
    assert_eq!(children[0].type_name(), "heading_2");
    assert_eq!(children[0].plain_text().as_deref(), Some("Large Update"));

    let body = &children[1..];
    assert!(body.len() > 1);
    assert!(body.iter().all(|b| matches!(b.kind, BlockKind::Paragraph { .. })));
    assert_eq!(block_texts(body).concat(), content);
}

#[test]
fn test_update_page_with_type() {
    let (engram, calls, _temp) = create_test_engram(FakeWorkspace::default());

    engram
        .update_page("p", Some("List"), "item", ContentKind::BulletedListItem)
        .expect("update_page failed");

    let calls = recorded(&calls);
    let Recorded::Append { children, .. } = &calls[0] else {
        panic!("expected append");
    };
    assert_eq!(children.len(), 2);
    assert_eq!(children[1].type_name(), "bulleted_list_item");
}

#[test]
fn test_log_to_notion_appends_to_default_page() {
    let (engram, calls, _temp) = create_test_engram(FakeWorkspace::default());

    let result = engram
        .log_to_notion("Daily log", "Shipped the fix", None)
        .expect("log_to_notion failed");
    assert_eq!(result, "Successfully updated page test-page-id");

    assert!(matches!(
        &recorded(&calls)[0],
        Recorded::Append { block_id, children } if block_id == "test-page-id" && children.len() == 2
    ));
}

#[test]
fn test_read_page_content_aggregates_blocks() {
    let children: Vec<Block> = serde_json::from_value(json!([
        {"id": "b1", "type": "heading_1", "heading_1": {"rich_text": [{"plain_text": "Title"}]}},
        {"id": "b2", "type": "paragraph", "paragraph": {"rich_text": [{"plain_text": "Hello world"}]}},
        {"id": "b3", "type": "image", "image": {"type": "external"}}
    ]))
    .expect("valid blocks");
    let (engram, calls, _temp) = create_test_engram(FakeWorkspace {
        children,
        ..FakeWorkspace::default()
    });

    let result = engram
        .read_page_content("test-page-id")
        .expect("read_page_content failed");
    assert_eq!(result, "[HEADING_1] Title\nHello world");
    assert_eq!(recorded(&calls), vec![Recorded::List("test-page-id".to_string())]);
}

#[test]
fn test_read_page_content_empty_page() {
    let (engram, _calls, _temp) = create_test_engram(FakeWorkspace::default());
    let result = engram.read_page_content("p").expect("read failed");
    assert_eq!(result, "Page is empty.");
}

#[test]
fn test_list_sub_pages() {
    let children: Vec<Block> = serde_json::from_value(json!([
        {"id": "sub-id", "type": "child_page", "child_page": {"title": "Sub Page"}},
        {"id": "p1", "type": "paragraph", "paragraph": {"rich_text": []}},
        {"id": "untitled-id", "type": "child_page", "child_page": {"title": ""}}
    ]))
    .expect("valid blocks");
    let (engram, _calls, _temp) = create_test_engram(FakeWorkspace {
        children,
        ..FakeWorkspace::default()
    });

    let result = engram.list_sub_pages(None).expect("list_sub_pages failed");
    assert_eq!(
        result,
        "- Sub Page (ID: sub-id)\n- Untitled (ID: untitled-id)"
    );
}

#[test]
fn test_list_sub_pages_none() {
    let (engram, _calls, _temp) = create_test_engram(FakeWorkspace::default());
    assert_eq!(
        engram.list_sub_pages(Some("p")).expect("list failed"),
        "No sub-pages found."
    );
}

#[test]
fn test_list_databases() {
    let hits: Vec<SearchHit> = serde_json::from_value(json!([
        {"object": "database", "id": "db-123", "title": [{"plain_text": "Python DB"}]},
        {"object": "database", "id": "db-id-1", "title": [{"plain_text": "My Database"}]}
    ]))
    .expect("valid hits");
    let (engram, calls, _temp) = create_test_engram(FakeWorkspace {
        hits,
        ..FakeWorkspace::default()
    });

    let result = engram.list_databases().expect("list_databases failed");
    assert_eq!(
        result,
        "- Python DB (ID: db-123)\n- My Database (ID: db-id-1)"
    );
    assert_eq!(
        recorded(&calls),
        vec![Recorded::Search(SearchRequest::databases())]
    );
}

#[test]
fn test_list_databases_none() {
    let (engram, _calls, _temp) = create_test_engram(FakeWorkspace::default());
    assert_eq!(engram.list_databases().expect("list failed"), "No databases found.");
}

#[test]
fn test_query_database() {
    let entries: Vec<PageEntry> = serde_json::from_value(json!([
        {"id": "page-123", "properties": {"Name": {"type": "title", "title": [{"plain_text": "Test Page"}]}}},
        {"id": "page-456", "properties": {}}
    ]))
    .expect("valid entries");
    let (engram, calls, _temp) = create_test_engram(FakeWorkspace {
        entries,
        ..FakeWorkspace::default()
    });

    let result = engram.query_database("db-123").expect("query failed");
    assert_eq!(
        result,
        "- Test Page (ID: page-123)\n- Untitled (ID: page-456)"
    );
    assert_eq!(recorded(&calls), vec![Recorded::Query("db-123".to_string())]);
}

#[test]
fn test_query_database_empty() {
    let (engram, _calls, _temp) = create_test_engram(FakeWorkspace::default());
    assert_eq!(
        engram.query_database("db").expect("query failed"),
        "No entries found in database."
    );
}

#[test]
fn test_delete_block_calls_once() {
    let (engram, calls, _temp) = create_test_engram(FakeWorkspace::default());

    let result = engram.delete_block("block-123").expect("delete failed");
    assert_eq!(result, "Successfully deleted block block-123");
    assert_eq!(recorded(&calls), vec![Recorded::Delete("block-123".to_string())]);
}

#[test]
fn test_remote_failure_propagates() {
    let (engram, calls, _temp) = create_test_engram(FakeWorkspace {
        failure: Some(404),
        ..FakeWorkspace::default()
    });

    let err = engram.delete_block("missing").expect_err("should fail");
    assert!(matches!(
        err,
        Error::Remote(RemoteError::Api { status: 404, .. })
    ));
    // No retry.
    assert_eq!(recorded(&calls).len(), 1);
}

#[test]
fn test_remember_and_recent() {
    let (engram, _calls, _temp) = create_test_engram(FakeWorkspace::default());

    let result = engram
        .remember_fact("The sky is blue", None)
        .expect("remember failed");
    assert_eq!(result, "Remembered: The sky is blue");

    engram
        .remember_fact("Recent fact", Some("notes"))
        .expect("remember failed");

    let recent = engram.get_recent_memories(5).expect("recent failed");
    assert_eq!(
        recent,
        "- [MANUAL_FACT] Recent fact\n- [MANUAL_FACT] The sky is blue"
    );

    let limited = engram.get_recent_memories(1).expect("recent failed");
    assert_eq!(limited, "- [MANUAL_FACT] Recent fact");
}

#[test]
fn test_search_memory_uses_metadata_timestamp() {
    let (engram, _calls, _temp) = create_test_engram(FakeWorkspace::default());

    let mut store = SqliteMemoryStore::open(engram.cache().path()).expect("open failed");
    store.init().expect("init failed");
    let metadata = MemoryMetadata {
        timestamp: Some("2025-12-30".to_string()),
        ..MemoryMetadata::default()
    };
    store
        .remember("Ashwatthama story", &metadata)
        .expect("remember failed");
    store
        .remember("Unrelated note", &metadata)
        .expect("remember failed");
    drop(store);

    let result = engram.search_memory("ashwatthama", 10).expect("search failed");
    assert_eq!(result, "- [2025-12-30] Ashwatthama story");

    let recent = engram.get_recent_memories(5).expect("recent failed");
    assert!(recent.contains("- [MEMORY] Unrelated note"));
}

#[test]
fn test_search_memory_no_hits() {
    let (engram, _calls, _temp) = create_test_engram(FakeWorkspace::default());
    let result = engram.search_memory("nothing", 10).expect("search failed");
    assert!(result.starts_with("No memories found"));
    assert_eq!(
        engram.get_recent_memories(5).expect("recent failed"),
        "No memories found."
    );
}

#[test]
fn test_send_alert() {
    let sent = Arc::new(Mutex::new(Vec::new()));
    let (engram, _calls, _temp) = create_test_engram(FakeWorkspace::default());
    let engram = engram.with_alerts(Box::new(FakeAlerts {
        sent: Arc::clone(&sent),
        fail: false,
    }));

    assert_eq!(engram.send_alert("Build finished"), "Alert sent successfully.");
    assert_eq!(*sent.lock().expect("lock poisoned"), vec!["Build finished"]);
}

#[test]
fn test_send_alert_failure_is_reported() {
    let (engram, _calls, _temp) = create_test_engram(FakeWorkspace::default());
    let engram = engram.with_alerts(Box::new(FakeAlerts {
        sent: Arc::default(),
        fail: true,
    }));

    let result = engram.send_alert("hi");
    assert!(result.starts_with("Failed to send alert: "));
    assert!(result.contains("connection refused"));
}

#[test]
fn test_send_alert_unconfigured() {
    let (engram, _calls, _temp) = create_test_engram(FakeWorkspace::default());
    assert_eq!(engram.send_alert("hi"), ALERT_NOT_CONFIGURED);
}

#[test]
fn test_small_bound_chunker() {
    let (engram, calls, _temp) = create_test_engram(FakeWorkspace::default());
    let engram = engram.with_chunker(FixedChunker::with_bound(10).line_aware(false));

    engram
        .create_page("T", &"x".repeat(25), Some("p"))
        .expect("create failed");

    let calls = recorded(&calls);
    let Recorded::CreatePage { children, .. } = &calls[0] else {
        panic!("expected create_page");
    };
    assert_eq!(
        block_texts(children)
            .iter()
            .map(|t| t.chars().count())
            .collect::<Vec<_>>(),
        vec![10, 10, 5]
    );
    assert_eq!(aggregate_text(children), "xxxxxxxxxx\nxxxxxxxxxx\nxxxxx");
}

#[test]
fn test_dispatch_json_call() {
    let (engram, calls, _temp) = create_test_engram(FakeWorkspace::default());

    let call = ToolCall::parse("delete_block", json!({"block_id": "block-to-delete"}))
        .expect("parse failed");
    let result = dispatch(&engram, &call).expect("dispatch failed");
    assert!(result.contains("Successfully deleted block"));
    assert!(result.contains("block-to-delete"));
    assert_eq!(recorded(&calls).len(), 1);
}

#[test]
fn test_serve_answers_each_line() {
    let (engram, _calls, _temp) = create_test_engram(FakeWorkspace::default());

    let input = concat!(
        r#"{"tool": "remember_fact", "arguments": {"fact": "Python is cool"}}"#,
        "\n\n",
        r#"{"tool": "frobnicate"}"#,
        "\n",
        "not json\n",
        r#"{"tool": "get_recent_memories"}"#,
        "\n",
    );
    let mut output = Vec::new();
    serve(&engram, input.as_bytes(), &mut output).expect("serve failed");

    let responses: Vec<Value> = String::from_utf8(output)
        .expect("utf8 output")
        .lines()
        .map(|l| serde_json::from_str(l).expect("json response"))
        .collect();
    assert_eq!(responses.len(), 4);

    assert_eq!(responses[0]["tool"], "remember_fact");
    assert_eq!(responses[0]["result"], "Remembered: Python is cool");

    assert_eq!(responses[1]["tool"], "frobnicate");
    assert!(responses[1]["error"].as_str().expect("error text").contains("unknown tool"));

    assert!(responses[2]["error"].as_str().expect("error text").contains("invalid request"));

    assert_eq!(responses[3]["result"], "- [MANUAL_FACT] Python is cool");
}

mod property_tests {
    use engram_rs::FixedChunker;
    use engram_rs::core::reassemble;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn segments_reassemble_exactly(content in "\\PC{0,600}", bound in 1usize..200) {
            let segments = FixedChunker::with_bound(bound).segment(&content).expect("valid bound");
            prop_assert_eq!(reassemble(&segments), content);
        }

        #[test]
        fn segments_respect_bound(content in "(\\PC|\n){0,600}", bound in 1usize..200, line_aware: bool) {
            let chunker = FixedChunker::with_bound(bound).line_aware(line_aware);
            let segments = chunker.segment(&content).expect("valid bound");
            let len = content.chars().count();

            prop_assert!(segments.iter().all(|s| s.char_len() <= bound));
            prop_assert!(segments.len() >= len.div_ceil(bound).max(1));
            let joined: String = segments.iter().map(|s| s.content.as_str()).collect();
            prop_assert_eq!(joined, content);
        }

        #[test]
        fn short_content_is_one_segment(content in "[a-zé ]{0,50}") {
            let segments = FixedChunker::with_bound(50).segment(&content).expect("valid bound");
            prop_assert_eq!(segments.len(), 1);
            prop_assert_eq!(&segments[0].content, &content);
        }
    }
}

/// CLI command integration tests.
mod cli_tests {
    use super::{FakeWorkspace, create_test_engram, recorded};
    use engram_rs::cli::commands::{execute, execute_with, load_config_from};
    use engram_rs::cli::parser::{Cli, Commands};
    use engram_rs::error::{CommandError, Error};
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Helper to create a CLI struct with custom `db_path`.
    fn make_cli(db_path: PathBuf, command: Commands) -> Cli {
        Cli {
            db_path: Some(db_path),
            segment_limit: None,
            verbose: false,
            format: "text".to_string(),
            command,
        }
    }

    /// Helper to create a CLI struct with JSON format.
    fn make_cli_json(db_path: PathBuf, command: Commands) -> Cli {
        Cli {
            format: "json".to_string(),
            ..make_cli(db_path, command)
        }
    }

    #[test]
    fn test_cmd_tools() {
        let cli = make_cli(PathBuf::from("unused.db"), Commands::Tools);
        let output = execute(&cli).expect("tools output");
        assert!(output.contains("create_page"));
        assert!(output.contains("send_alert"));
    }

    #[test]
    fn test_cmd_status_json() {
        let temp_dir = TempDir::new().expect("temp dir");
        let cli = make_cli_json(temp_dir.path().join("memory.db"), Commands::Status);

        let output = execute(&cli).expect("status output");
        let value: serde_json::Value = serde_json::from_str(&output).expect("json status");
        assert_eq!(value["memory_count"], 0);
        assert_eq!(value["schema_version"], 1);
    }

    #[test]
    fn test_cmd_remember_then_status() {
        let (engram, _calls, _temp) = create_test_engram(FakeWorkspace::default());
        let db_path = engram.cache().path().to_path_buf();

        let cli = make_cli(
            db_path.clone(),
            Commands::RememberFact {
                fact: "The sky is blue".to_string(),
                category: None,
            },
        );
        let output = execute_with(&cli, &engram).expect("remember output");
        assert_eq!(output, "Remembered: The sky is blue\n");

        let output = execute(&make_cli(db_path, Commands::Status)).expect("status output");
        assert!(output.contains("Memories:      1"));
    }

    #[test]
    fn test_cmd_status_through_tools() {
        let (engram, _calls, _temp) = create_test_engram(FakeWorkspace::default());
        engram.remember_fact("one", None).expect("remember");
        engram.remember_fact("two", Some("notes")).expect("remember");

        let cli = make_cli_json(engram.cache().path().to_path_buf(), Commands::Status);
        let output = execute_with(&cli, &engram).expect("status output");
        let value: serde_json::Value = serde_json::from_str(&output).expect("json status");
        assert_eq!(value["memory_count"], 2);
    }

    fn env(pairs: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let pairs = pairs.to_vec();
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn test_flag_overrides_invalid_env_limit() {
        let mut cli = make_cli(PathBuf::from("flag.db"), Commands::ListDatabases);
        cli.segment_limit = Some(100);
        let lookup = env(&[
            ("NOTION_API_KEY", "secret_test"),
            ("ENGRAM_SEGMENT_LIMIT", "5000"),
            ("ENGRAM_DB_PATH", "env.db"),
        ]);

        let config = load_config_from(&cli, lookup).expect("flag value is valid");
        assert_eq!(config.segment_limit, 100);
        assert_eq!(config.db_path, PathBuf::from("flag.db"));
    }

    #[test]
    fn test_invalid_env_limit_without_flag() {
        let mut cli = make_cli(PathBuf::from("flag.db"), Commands::ListDatabases);
        cli.db_path = None;
        let lookup = env(&[
            ("NOTION_API_KEY", "secret_test"),
            ("ENGRAM_SEGMENT_LIMIT", "5000"),
        ]);

        let err = load_config_from(&cli, lookup).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("segment limit"));
    }

    #[test]
    fn test_cmd_delete_block_json() {
        let (engram, calls, _temp) = create_test_engram(FakeWorkspace::default());
        let cli = make_cli_json(
            PathBuf::from("unused.db"),
            Commands::DeleteBlock {
                block_id: "block-123".to_string(),
            },
        );

        let output = execute_with(&cli, &engram).expect("delete output");
        let value: serde_json::Value = serde_json::from_str(&output).expect("json output");
        assert_eq!(value["tool"], "delete_block");
        assert_eq!(value["result"], "Successfully deleted block block-123");
        assert_eq!(recorded(&calls).len(), 1);
    }

    #[test]
    fn test_cmd_call() {
        let (engram, _calls, _temp) = create_test_engram(FakeWorkspace::default());
        let cli = make_cli(
            PathBuf::from("unused.db"),
            Commands::Call {
                tool: "update_page".to_string(),
                arguments: r#"{"page_id": "p", "title": "T", "content": "c", "type": "quote"}"#
                    .to_string(),
            },
        );

        let output = execute_with(&cli, &engram).expect("call output");
        assert_eq!(output, "Successfully updated page p\n");
    }

    #[test]
    fn test_cmd_call_bad_json() {
        let (engram, _calls, _temp) = create_test_engram(FakeWorkspace::default());
        let cli = make_cli(
            PathBuf::from("unused.db"),
            Commands::Call {
                tool: "delete_block".to_string(),
                arguments: "{not json".to_string(),
            },
        );

        let err = execute_with(&cli, &engram).expect_err("should reject");
        assert!(matches!(err, Error::Command(CommandError::InvalidArgument(_))));
    }
}

/// Binary tests.
mod binary_tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use tempfile::TempDir;

    fn engram(dir: &TempDir) -> Command {
        let mut cmd = Command::cargo_bin("engram").expect("binary built");
        cmd.env_clear().current_dir(dir.path());
        cmd
    }

    #[test]
    fn test_tools_lists_every_tool() {
        let dir = TempDir::new().expect("temp dir");
        engram(&dir)
            .arg("tools")
            .assert()
            .success()
            .stdout(predicate::str::contains("read_page_content"))
            .stdout(predicate::str::contains("get_recent_memories"));
    }

    #[test]
    fn test_missing_api_key_fails_fast() {
        let dir = TempDir::new().expect("temp dir");
        engram(&dir)
            .args(["delete-block", "block-123"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("NOTION_API_KEY"));
    }

    #[test]
    fn test_json_error_on_stdout() {
        let dir = TempDir::new().expect("temp dir");
        engram(&dir)
            .args(["--format", "json", "list-databases"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("\"kind\": \"config\""));
    }

    #[test]
    fn test_invalid_segment_limit() {
        let dir = TempDir::new().expect("temp dir");
        engram(&dir)
            .env("NOTION_API_KEY", "secret_test")
            .args(["--segment-limit", "5000", "read", "abc"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("segment limit"));
    }

    #[test]
    fn test_segment_limit_flag_beats_environment() {
        let dir = TempDir::new().expect("temp dir");
        engram(&dir)
            .env("NOTION_API_KEY", "secret_test")
            .env("ENGRAM_SEGMENT_LIMIT", "5000")
            .args(["--segment-limit", "100", "--db-path", "memory.db"])
            .args(["remember", "flags win"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Remembered: flags win"));
    }

    #[test]
    fn test_status_creates_database() {
        let dir = TempDir::new().expect("temp dir");
        engram(&dir)
            .args(["--db-path", "cache/memory.db", "status"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Memories:      0"));
        assert!(dir.path().join("cache/memory.db").exists());
    }
}
