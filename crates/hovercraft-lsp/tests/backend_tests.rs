// Dweve Hovercraft - Table-driven hover documentation
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! End-to-end tests for the language server backend.
//!
//! The server is driven through `LspService::inner()` against table files in
//! a temporary workspace. Client notifications are suppressed because the
//! service never sees an `initialize` request, so these tests cover the
//! server's own state: index contents, hover results and queue ordering.

use hovercraft_lsp::{HovercraftLanguageServer, LogHandle};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tower_lsp::lsp_types::*;
use tower_lsp::{LanguageServer, LspService};

const PY_TABLE: &str = "keyword,description,category,url\n\
                        print,Prints values to stdout,function,https://docs.python.org/3/library/functions.html#print\n\
                        len,Returns the length,function,\n";

fn write_table(root: &Path, dir: &str, name: &str, content: &str) -> PathBuf {
    let dir = root.join(dir);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_table(dir.path(), ".vscode", "hovercraft.py.csv", PY_TABLE);
    dir
}

fn init_params(root: &Path, options: Option<serde_json::Value>) -> InitializeParams {
    #[allow(deprecated)]
    InitializeParams {
        root_uri: Some(Url::from_directory_path(root).unwrap()),
        initialization_options: options,
        ..Default::default()
    }
}

async fn start(root: &Path) -> (LspService<HovercraftLanguageServer>, tower_lsp::ClientSocket) {
    let (service, socket) = LspService::new(HovercraftLanguageServer::new);
    service
        .inner()
        .initialize(init_params(root, None))
        .await
        .unwrap();
    (service, socket)
}

fn doc_uri(root: &Path, name: &str) -> Url {
    Url::from_file_path(root.join(name)).unwrap()
}

async fn open(server: &HovercraftLanguageServer, uri: &Url, text: &str) {
    server
        .did_open(DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: uri.clone(),
                language_id: "python".to_string(),
                version: 1,
                text: text.to_string(),
            },
        })
        .await;
}

async fn hover_at(
    server: &HovercraftLanguageServer,
    uri: &Url,
    line: u32,
    character: u32,
) -> Option<Hover> {
    server
        .hover(HoverParams {
            text_document_position_params: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier { uri: uri.clone() },
                position: Position::new(line, character),
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
        })
        .await
        .unwrap()
}

fn markdown(hover: &Hover) -> &str {
    match &hover.contents {
        HoverContents::Markup(markup) => {
            assert_eq!(markup.kind, MarkupKind::Markdown);
            &markup.value
        }
        other => panic!("expected markup content, got {:?}", other),
    }
}

async fn notify_files(server: &HovercraftLanguageServer, changes: Vec<(PathBuf, FileChangeType)>) {
    let changes = changes
        .into_iter()
        .map(|(path, typ)| FileEvent {
            uri: Url::from_file_path(path).unwrap(),
            typ,
        })
        .collect();
    server
        .did_change_watched_files(DidChangeWatchedFilesParams { changes })
        .await;
    server.flush().await;
}

// ============================================================================
// INITIALIZATION
// ============================================================================

#[tokio::test]
async fn test_initialize_scans_workspace_and_advertises_hover() {
    let dir = workspace();
    let (service, _socket) = LspService::new(HovercraftLanguageServer::new);
    let server = service.inner();

    let result = server.initialize(init_params(dir.path(), None)).await.unwrap();

    assert_eq!(
        result.capabilities.hover_provider,
        Some(HoverProviderCapability::Simple(true))
    );
    assert_eq!(
        result.capabilities.text_document_sync,
        Some(TextDocumentSyncCapability::Options(TextDocumentSyncOptions {
            open_close: Some(true),
            change: Some(TextDocumentSyncKind::FULL),
            ..Default::default()
        }))
    );
    let info = result.server_info.unwrap();
    assert_eq!(info.name, "hovercraft-lsp");
    assert_eq!(info.version.as_deref(), Some(hovercraft_lsp::VERSION));

    let stats = server.index_statistics();
    assert_eq!(stats.file_types, 1);
    assert_eq!(stats.records, 2);
    assert_eq!(server.roots(), vec![dir.path().to_path_buf()]);
}

#[tokio::test]
async fn test_initialize_prefers_workspace_folders() {
    let first = workspace();
    let second = tempfile::tempdir().unwrap();
    write_table(
        second.path(),
        ".data",
        "hovercraft.js.json",
        r#"[{"keyword": "console", "description": "Console"}]"#,
    );

    let (service, _socket) = LspService::new(HovercraftLanguageServer::new);
    let server = service.inner();
    let folders = [first.path(), second.path()]
        .iter()
        .map(|path| WorkspaceFolder {
            uri: Url::from_directory_path(path).unwrap(),
            name: "ws".to_string(),
        })
        .collect();
    let params = InitializeParams {
        workspace_folders: Some(folders),
        ..Default::default()
    };
    server.initialize(params).await.unwrap();

    assert_eq!(server.roots().len(), 2);
    assert_eq!(server.index_statistics().file_types, 2);
}

#[tokio::test]
async fn test_invalid_initialization_options_fall_back_to_defaults() {
    let dir = workspace();
    let (service, _socket) = LspService::new(HovercraftLanguageServer::new);
    let server = service.inner();

    let options = json!({ "caseSensitive": "sometimes" });
    server
        .initialize(init_params(dir.path(), Some(options)))
        .await
        .unwrap();

    assert!(server.engine().config().case_sensitive);
    assert_eq!(server.index_statistics().records, 2);
}

#[tokio::test]
async fn test_initialization_options_apply() {
    let dir = tempfile::tempdir().unwrap();
    write_table(dir.path(), "docs", "hovercraft.py.csv", PY_TABLE);

    let (service, _socket) = LspService::new(HovercraftLanguageServer::new);
    let server = service.inner();
    let options = json!({ "hovercraft": { "tableDirectories": ["docs"], "caseSensitive": false } });
    server
        .initialize(init_params(dir.path(), Some(options)))
        .await
        .unwrap();

    let uri = doc_uri(dir.path(), "main.py");
    open(server, &uri, "PRINT(1)").await;
    let hover = hover_at(server, &uri, 0, 2).await.unwrap();
    assert!(markdown(&hover).contains("**print**"));
}

#[tokio::test]
async fn test_shutdown() {
    let dir = workspace();
    let (service, _socket) = start(dir.path()).await;
    assert!(service.inner().shutdown().await.is_ok());
}

// ============================================================================
// HOVER
// ============================================================================

#[tokio::test]
async fn test_hover_returns_markdown_and_range() {
    let dir = workspace();
    let (service, _socket) = start(dir.path()).await;
    let server = service.inner();
    let uri = doc_uri(dir.path(), "main.py");
    open(server, &uri, "import os\nx = print(len(y))\n").await;

    let hover = hover_at(server, &uri, 1, 6).await.unwrap();
    let text = markdown(&hover);
    assert!(text.starts_with("**print**"));
    assert!(text.contains("Prints values to stdout"));
    assert!(text.contains("*Category:* function"));
    assert!(text.contains("(<https://docs.python.org/3/library/functions.html#print>)"));
    assert_eq!(
        hover.range,
        Some(Range::new(Position::new(1, 4), Position::new(1, 9)))
    );

    let hover = hover_at(server, &uri, 1, 10).await.unwrap();
    assert!(markdown(&hover).starts_with("**len**"));
}

#[tokio::test]
async fn test_hover_counts_utf16_code_units() {
    let dir = workspace();
    let (service, _socket) = start(dir.path()).await;
    let server = service.inner();
    let uri = doc_uri(dir.path(), "emoji.py");
    open(server, &uri, "😀 print(x)").await;

    // The emoji occupies UTF-16 units 0..2, the space unit 2.
    assert!(hover_at(server, &uri, 0, 2).await.is_none());
    let hover = hover_at(server, &uri, 0, 3).await.unwrap();
    assert!(markdown(&hover).starts_with("**print**"));
    assert_eq!(
        hover.range,
        Some(Range::new(Position::new(0, 3), Position::new(0, 8)))
    );
}

#[tokio::test]
async fn test_hover_misses() {
    let dir = workspace();
    let (service, _socket) = start(dir.path()).await;
    let server = service.inner();

    let py = doc_uri(dir.path(), "main.py");
    open(server, &py, "print(unknown)\n").await;
    assert!(hover_at(server, &py, 0, 8).await.is_none(), "unknown word");
    assert!(hover_at(server, &py, 0, 5).await.is_none(), "punctuation");
    assert!(hover_at(server, &py, 0, 40).await.is_none(), "past line end");
    assert!(hover_at(server, &py, 7, 0).await.is_none(), "past last line");

    let js = doc_uri(dir.path(), "main.js");
    open(server, &js, "print(1)").await;
    assert!(hover_at(server, &js, 0, 1).await.is_none(), "no js table");

    let bare = doc_uri(dir.path(), "Makefile");
    open(server, &bare, "print").await;
    assert!(hover_at(server, &bare, 0, 1).await.is_none(), "no extension");

    let never_opened = doc_uri(dir.path(), "closed.py");
    assert!(hover_at(server, &never_opened, 0, 0).await.is_none());
}

#[tokio::test]
async fn test_hover_follows_document_changes() {
    let dir = workspace();
    let (service, _socket) = start(dir.path()).await;
    let server = service.inner();
    let uri = doc_uri(dir.path(), "main.py");
    open(server, &uri, "value = 1").await;
    assert!(hover_at(server, &uri, 0, 1).await.is_none());

    server
        .did_change(DidChangeTextDocumentParams {
            text_document: VersionedTextDocumentIdentifier {
                uri: uri.clone(),
                version: 2,
            },
            content_changes: vec![TextDocumentContentChangeEvent {
                range: None,
                range_length: None,
                text: "len(value)".to_string(),
            }],
        })
        .await;
    assert!(markdown(&hover_at(server, &uri, 0, 1).await.unwrap()).contains("**len**"));

    server
        .did_close(DidCloseTextDocumentParams {
            text_document: TextDocumentIdentifier { uri: uri.clone() },
        })
        .await;
    assert!(hover_at(server, &uri, 0, 1).await.is_none());
    assert_eq!(server.cache_statistics().current_size, 0);
}

#[tokio::test]
async fn test_oversized_document_is_not_served() {
    let dir = workspace();
    let (service, _) = LspService::new(|client| {
        HovercraftLanguageServer::with_config(client, LogHandle::disabled(), 10, 16)
    });
    let server = service.inner();
    server.initialize(init_params(dir.path(), None)).await.unwrap();

    let uri = doc_uri(dir.path(), "big.py");
    open(server, &uri, "print('this line is longer than sixteen bytes')").await;
    assert!(hover_at(server, &uri, 0, 1).await.is_none());

    let small = doc_uri(dir.path(), "small.py");
    open(server, &small, "print").await;
    assert!(hover_at(server, &small, 0, 1).await.is_some());
}

// ============================================================================
// WATCHED FILES
// ============================================================================

#[tokio::test]
async fn test_changed_table_is_reloaded() {
    let dir = workspace();
    let (service, _socket) = start(dir.path()).await;
    let server = service.inner();
    let uri = doc_uri(dir.path(), "main.py");
    open(server, &uri, "print").await;

    let table = write_table(
        dir.path(),
        ".vscode",
        "hovercraft.py.csv",
        "keyword,description\nprint,Updated description\n",
    );
    notify_files(server, vec![(table, FileChangeType::CHANGED)]).await;

    let hover = hover_at(server, &uri, 0, 0).await.unwrap();
    assert!(markdown(&hover).contains("Updated description"));
    assert!(!markdown(&hover).contains("stdout"));
    assert_eq!(server.index_statistics().records, 1);
}

#[tokio::test]
async fn test_created_and_deleted_tables() {
    let dir = workspace();
    let (service, _socket) = start(dir.path()).await;
    let server = service.inner();
    let uri = doc_uri(dir.path(), "app.js");
    open(server, &uri, "console.log(1)").await;
    assert!(hover_at(server, &uri, 0, 0).await.is_none());

    let table = write_table(
        dir.path(),
        ".data",
        "hovercraft.js.json",
        r#"[{"keyword": "console", "description": "JavaScript console object"}]"#,
    );
    notify_files(server, vec![(table.clone(), FileChangeType::CREATED)]).await;
    let hover = hover_at(server, &uri, 0, 0).await.unwrap();
    assert!(markdown(&hover).contains("JavaScript console object"));

    fs::remove_file(&table).unwrap();
    notify_files(server, vec![(table, FileChangeType::DELETED)]).await;
    assert!(hover_at(server, &uri, 0, 0).await.is_none());
}

#[tokio::test]
async fn test_deleted_table_directory_drops_its_tables() {
    let dir = workspace();
    let (service, _socket) = start(dir.path()).await;
    let server = service.inner();
    let uri = doc_uri(dir.path(), "main.py");
    open(server, &uri, "print").await;

    let table_dir = dir.path().join(".vscode");
    fs::remove_dir_all(&table_dir).unwrap();
    notify_files(server, vec![(table_dir, FileChangeType::DELETED)]).await;

    assert!(hover_at(server, &uri, 0, 0).await.is_none());
    assert_eq!(server.index_statistics().records, 0);
}

#[tokio::test]
async fn test_events_apply_in_order() {
    let dir = workspace();
    let (service, _socket) = start(dir.path()).await;
    let server = service.inner();
    let uri = doc_uri(dir.path(), "main.py");
    open(server, &uri, "print").await;

    let table = dir.path().join(".vscode").join("hovercraft.py.csv");
    for version in 0..5 {
        fs::write(&table, format!("keyword,description\nprint,version {}\n", version)).unwrap();
        server
            .did_change_watched_files(DidChangeWatchedFilesParams {
                changes: vec![FileEvent {
                    uri: Url::from_file_path(&table).unwrap(),
                    typ: FileChangeType::CHANGED,
                }],
            })
            .await;
    }
    server.flush().await;

    let hover = hover_at(server, &uri, 0, 0).await.unwrap();
    assert!(markdown(&hover).contains("version 4"));
    assert_eq!(server.index_statistics().records, 1);
}

#[tokio::test]
async fn test_unrelated_files_are_ignored() {
    let dir = workspace();
    let (service, _socket) = start(dir.path()).await;
    let server = service.inner();

    let readme = write_table(dir.path(), ".vscode", "settings.json", "{}");
    let outside = write_table(
        dir.path(),
        "src",
        "hovercraft.py.csv",
        "keyword,description\nzip,Zips\n",
    );
    notify_files(
        server,
        vec![
            (readme, FileChangeType::CHANGED),
            (outside, FileChangeType::CREATED),
        ],
    )
    .await;

    assert_eq!(server.index_statistics().records, 2);
}

// ============================================================================
// CONFIGURATION AND WORKSPACE FOLDERS
// ============================================================================

#[tokio::test]
async fn test_case_sensitivity_setting() {
    let dir = workspace();
    let (service, _socket) = start(dir.path()).await;
    let server = service.inner();
    let uri = doc_uri(dir.path(), "main.py");
    open(server, &uri, "PRINT").await;
    assert!(hover_at(server, &uri, 0, 0).await.is_none());

    server
        .did_change_configuration(DidChangeConfigurationParams {
            settings: json!({ "hovercraft": { "caseSensitive": false } }),
        })
        .await;
    server.flush().await;
    assert!(hover_at(server, &uri, 0, 0).await.is_some());

    server
        .did_change_configuration(DidChangeConfigurationParams {
            settings: json!({ "hovercraft": { "caseSensitive": true } }),
        })
        .await;
    server.flush().await;
    assert!(hover_at(server, &uri, 0, 0).await.is_none());
}

#[tokio::test]
async fn test_show_source_setting() {
    let dir = workspace();
    let (service, _socket) = start(dir.path()).await;
    let server = service.inner();
    let uri = doc_uri(dir.path(), "main.py");
    open(server, &uri, "print").await;

    server
        .did_change_configuration(DidChangeConfigurationParams {
            settings: json!({ "showSource": true }),
        })
        .await;

    let hover = hover_at(server, &uri, 0, 0).await.unwrap();
    assert!(markdown(&hover).contains("*Source:* hovercraft\\.py\\.csv"));
}

#[tokio::test]
async fn test_table_directory_setting_rescans() {
    let dir = workspace();
    write_table(
        dir.path(),
        "hover-docs",
        "hovercraft.py.json",
        r#"[{"keyword": "zip", "description": "Aggregates iterables"}]"#,
    );
    let (service, _socket) = start(dir.path()).await;
    let server = service.inner();
    let uri = doc_uri(dir.path(), "main.py");
    open(server, &uri, "zip print").await;
    assert!(hover_at(server, &uri, 0, 0).await.is_none());

    server
        .did_change_configuration(DidChangeConfigurationParams {
            settings: json!({ "hovercraft": { "tableDirectories": ["hover-docs"] } }),
        })
        .await;
    server.flush().await;

    assert!(markdown(&hover_at(server, &uri, 0, 0).await.unwrap()).contains("Aggregates"));
    assert!(hover_at(server, &uri, 0, 4).await.is_none());
}

#[tokio::test]
async fn test_dropped_table_directory_clears_its_diagnostics() {
    let dir = workspace();
    let bad = write_table(dir.path(), ".data", "hovercraft.js.csv", "keyword,description\nlog,\n");
    let (service, _) = start(dir.path()).await;
    let server = service.inner();
    server.initialized(InitializedParams {}).await;

    let bad_uri = Url::from_file_path(&bad).unwrap();
    assert_eq!(server.diagnostic_uris(), vec![bad_uri]);

    server
        .did_change_configuration(DidChangeConfigurationParams {
            settings: json!({ "hovercraft": { "tableDirectories": [".vscode"] } }),
        })
        .await;
    server.flush().await;

    assert!(server.diagnostic_uris().is_empty());
    assert_eq!(server.index_statistics().records, 2);
}

#[tokio::test]
async fn test_deleted_directory_clears_its_diagnostics() {
    let dir = workspace();
    let (service, _) = start(dir.path()).await;
    let server = service.inner();

    let bad = write_table(dir.path(), ".data", "hovercraft.js.json", r#"{"keyword": "x"}"#);
    notify_files(server, vec![(bad.clone(), FileChangeType::CREATED)]).await;
    assert_eq!(server.diagnostic_uris(), vec![Url::from_file_path(&bad).unwrap()]);

    let table_dir = dir.path().join(".data");
    fs::remove_dir_all(&table_dir).unwrap();
    notify_files(server, vec![(table_dir, FileChangeType::DELETED)]).await;
    assert!(server.diagnostic_uris().is_empty());
}

#[tokio::test]
async fn test_invalid_configuration_keeps_current_settings() {
    let dir = workspace();
    let (service, _) = start(dir.path()).await;
    let server = service.inner();

    server
        .did_change_configuration(DidChangeConfigurationParams {
            settings: json!({ "hovercraft": { "tableDirectories": "not-a-list" } }),
        })
        .await;
    server.flush().await;

    assert_eq!(
        server.engine().config().table_directories,
        vec![".vscode".to_string(), ".data".to_string()]
    );
    assert_eq!(server.index_statistics().records, 2);
}

#[tokio::test]
async fn test_workspace_folder_changes_rescan() {
    let first = workspace();
    let second = tempfile::tempdir().unwrap();
    write_table(
        second.path(),
        ".vscode",
        "hovercraft.rs.csv",
        "keyword,description\nVec,A growable array\n",
    );

    let (service, _socket) = start(first.path()).await;
    let server = service.inner();
    let uri = doc_uri(second.path(), "lib.rs");
    open(server, &uri, "Vec::new()").await;
    assert!(hover_at(server, &uri, 0, 0).await.is_none());

    let folder = |path: &Path| WorkspaceFolder {
        uri: Url::from_directory_path(path).unwrap(),
        name: "ws".to_string(),
    };
    server
        .did_change_workspace_folders(DidChangeWorkspaceFoldersParams {
            event: WorkspaceFoldersChangeEvent {
                added: vec![folder(second.path())],
                removed: vec![],
            },
        })
        .await;
    server.flush().await;
    assert!(hover_at(server, &uri, 0, 0).await.is_some());
    assert_eq!(server.index_statistics().file_types, 2);

    server
        .did_change_workspace_folders(DidChangeWorkspaceFoldersParams {
            event: WorkspaceFoldersChangeEvent {
                added: vec![],
                removed: vec![folder(first.path())],
            },
        })
        .await;
    server.flush().await;
    assert_eq!(server.roots(), vec![second.path().to_path_buf()]);
    assert_eq!(server.index_statistics().file_types, 1);
}
