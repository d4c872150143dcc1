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

//! LSP backend implementation.
//!
//! # Request Flow
//!
//! ```text
//! hover ──> DocumentManager (rope) ──> line + char offset ──> HoverEngine
//!
//! didChangeWatchedFiles ─┐
//! didChangeConfiguration ├─> mpsc ──> bridge consumer ──> HoverEngine (index)
//! didChangeWorkspaceFolders ┘                        └──> publishDiagnostics
//! ```
//!
//! Index mutations all go through one consumer task, so events for a path
//! are applied in the order the client sent them. Table I/O runs on
//! `spawn_blocking`; hover requests never touch the file system.

use crate::config::ServerConfig;
use crate::constants::{
    BYTES_PER_MEGABYTE, CONFIG_SECTION, DEFAULT_MAX_CACHE_SIZE, DEFAULT_MAX_DOCUMENT_SIZE,
    SERVER_NAME, WATCHER_REGISTRATION_ID,
};
use crate::diagnostics::{to_lsp_diagnostics, PublishedDiagnostics};
use crate::document_manager::{CacheStatistics, DocumentManager};
use crate::logging::LogHandle;
use crate::utils::{file_type_candidates, line_and_offset, position_in_line, uri_to_path};
use hovercraft_core::{
    FileEvent, FileEventKind, HoverEngine, IndexStatistics, LoadReport, ScanReport,
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{debug, error, info, warn};

/// Work for the bridge consumer.
#[derive(Debug)]
enum BridgeMessage {
    /// File events from the client's watcher.
    Events(Vec<FileEvent>),
    /// Rebuild the index from these roots.
    Rescan(Vec<PathBuf>),
    /// Reply once everything queued before this message is applied.
    Flush(oneshot::Sender<()>),
}

/// Hovercraft Language Server backend.
pub struct HovercraftLanguageServer {
    /// LSP client connection.
    client: Client,
    /// Shared hover engine.
    engine: Arc<HoverEngine>,
    /// Open documents.
    document_manager: Arc<DocumentManager>,
    /// Workspace roots whose table directories are indexed.
    roots: RwLock<Vec<PathBuf>>,
    /// Queue feeding the bridge consumer.
    bridge_tx: mpsc::UnboundedSender<BridgeMessage>,
    /// Runtime log filter.
    log_handle: LogHandle,
    /// Whether the client accepts dynamic watcher registration.
    dynamic_watchers: AtomicBool,
    /// Scan results from `initialize`, published once the client is ready.
    initial_scan: Mutex<Option<ScanReport>>,
    /// Table files currently showing diagnostics in the client.
    published: Arc<PublishedDiagnostics>,
}

impl HovercraftLanguageServer {
    /// Create a server with default limits and no runtime log control.
    pub fn new(client: Client) -> Self {
        Self::with_config(
            client,
            LogHandle::disabled(),
            DEFAULT_MAX_CACHE_SIZE,
            DEFAULT_MAX_DOCUMENT_SIZE,
        )
    }

    /// Create a server with explicit limits.
    ///
    /// Must be called inside a Tokio runtime: the bridge consumer task is
    /// spawned here.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hovercraft_lsp::{HovercraftLanguageServer, LogHandle};
    /// use tower_lsp::{LspService, Server};
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let (service, socket) = LspService::new(|client| {
    ///         HovercraftLanguageServer::with_config(client, LogHandle::disabled(), 200, 8 * 1024 * 1024)
    ///     });
    ///     Server::new(tokio::io::stdin(), tokio::io::stdout(), socket)
    ///         .serve(service)
    ///         .await;
    /// }
    /// ```
    pub fn with_config(
        client: Client,
        log_handle: LogHandle,
        max_cache_size: usize,
        max_document_size: usize,
    ) -> Self {
        let engine = Arc::new(HoverEngine::default());
        let published = Arc::new(PublishedDiagnostics::default());
        let (bridge_tx, bridge_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_bridge(
            client.clone(),
            Arc::clone(&engine),
            Arc::clone(&published),
            bridge_rx,
        ));

        Self {
            client,
            engine,
            document_manager: Arc::new(DocumentManager::new(max_cache_size, max_document_size)),
            roots: RwLock::new(Vec::new()),
            bridge_tx,
            log_handle,
            dynamic_watchers: AtomicBool::new(false),
            initial_scan: Mutex::new(None),
            published,
        }
    }

    /// The hover engine.
    pub fn engine(&self) -> &Arc<HoverEngine> {
        &self.engine
    }

    /// Open-document store statistics.
    pub fn cache_statistics(&self) -> CacheStatistics {
        self.document_manager.statistics()
    }

    /// What the keyword index holds.
    pub fn index_statistics(&self) -> IndexStatistics {
        self.engine.statistics()
    }

    /// Table files the client currently shows diagnostics for.
    pub fn diagnostic_uris(&self) -> Vec<Url> {
        self.published.uris()
    }

    /// Workspace roots currently indexed.
    pub fn roots(&self) -> Vec<PathBuf> {
        self.roots.read().clone()
    }

    /// Wait until every queued file event and rescan has been applied.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.bridge_tx.send(BridgeMessage::Flush(tx)).is_ok() {
            let _ = rx.await;
        }
    }

    fn enqueue(&self, message: BridgeMessage) {
        if self.bridge_tx.send(message).is_err() {
            error!("Bridge consumer is gone; table change dropped");
        }
    }

    fn apply_settings(&self, config: ServerConfig) {
        if let Some(level) = &config.log_level {
            if let Err(err) = self.log_handle.set_filter(level) {
                warn!("Ignoring logLevel setting: {}", err);
            }
        }

        let change = self.engine.apply_config(config.engine);
        if change.rescan_needed {
            self.enqueue(BridgeMessage::Rescan(self.roots()));
            if self.dynamic_watchers.load(Ordering::Relaxed) {
                let client = self.client.clone();
                let directories = self.engine.config().normalized_table_directories();
                tokio::spawn(async move {
                    unregister_watchers(&client).await;
                    register_watchers(&client, &directories).await;
                });
            }
        }
    }

    async fn fetch_settings(&self) -> Option<serde_json::Value> {
        let items = vec![ConfigurationItem {
            scope_uri: None,
            section: Some(CONFIG_SECTION.to_string()),
        }];
        match self.client.configuration(items).await {
            Ok(mut values) if !values.is_empty() => Some(values.swap_remove(0)),
            Ok(_) => None,
            Err(err) => {
                debug!("workspace/configuration unavailable: {}", err);
                None
            }
        }
    }
}

/// Roots announced in `initialize`: workspace folders, else the root URI.
fn workspace_roots(params: &InitializeParams) -> Vec<PathBuf> {
    if let Some(folders) = &params.workspace_folders {
        let roots: Vec<PathBuf> = folders.iter().filter_map(|f| uri_to_path(&f.uri)).collect();
        if !roots.is_empty() {
            return roots;
        }
    }
    #[allow(deprecated)]
    let root_uri = params.root_uri.as_ref();
    root_uri.and_then(uri_to_path).into_iter().collect()
}

fn watcher_registration(directories: &[String]) -> Option<Registration> {
    let mut watchers = Vec::new();
    for dir in directories {
        watchers.push(FileSystemWatcher {
            glob_pattern: GlobPattern::String(format!("**/{}/hovercraft.*.{{csv,json}}", dir)),
            kind: None,
        });
        watchers.push(FileSystemWatcher {
            glob_pattern: GlobPattern::String(format!("**/{}", dir)),
            kind: Some(WatchKind::Delete),
        });
    }
    let options = DidChangeWatchedFilesRegistrationOptions { watchers };
    match serde_json::to_value(options) {
        Ok(register_options) => Some(Registration {
            id: WATCHER_REGISTRATION_ID.to_string(),
            method: "workspace/didChangeWatchedFiles".to_string(),
            register_options: Some(register_options),
        }),
        Err(err) => {
            error!("Cannot encode watcher registration: {}", err);
            None
        }
    }
}

async fn register_watchers(client: &Client, directories: &[String]) {
    let Some(registration) = watcher_registration(directories) else {
        return;
    };
    match client.register_capability(vec![registration]).await {
        Ok(()) => info!("Watching table directories: {}", directories.join(", ")),
        Err(err) => warn!("File watcher registration failed: {}", err),
    }
}

async fn unregister_watchers(client: &Client) {
    let unregistration = Unregistration {
        id: WATCHER_REGISTRATION_ID.to_string(),
        method: "workspace/didChangeWatchedFiles".to_string(),
    };
    if let Err(err) = client.unregister_capability(vec![unregistration]).await {
        debug!("File watcher unregistration failed: {}", err);
    }
}

fn event_kind(change: FileChangeType) -> Option<FileEventKind> {
    match change {
        FileChangeType::CREATED => Some(FileEventKind::Created),
        FileChangeType::CHANGED => Some(FileEventKind::Changed),
        FileChangeType::DELETED => Some(FileEventKind::Deleted),
        _ => None,
    }
}

async fn publish_report(client: &Client, published: &PublishedDiagnostics, report: &LoadReport) {
    let Ok(uri) = Url::from_file_path(&report.path) else {
        return;
    };
    let diagnostics = to_lsp_diagnostics(&report.diagnostics);
    debug!("Publishing {} diagnostics for {}", diagnostics.len(), uri);
    published.record(&uri, diagnostics.len());
    client.publish_diagnostics(uri, diagnostics, None).await;
}

async fn clear_diagnostics(client: &Client, stale: Vec<Url>) {
    for uri in stale {
        debug!("Clearing diagnostics for {}", uri);
        client.publish_diagnostics(uri, Vec::new(), None).await;
    }
}

/// Publish a full scan, clearing files that are no longer part of it.
async fn publish_scan(client: &Client, published: &PublishedDiagnostics, report: &ScanReport) {
    let current: HashSet<Url> = report
        .files
        .iter()
        .filter_map(|file| Url::from_file_path(&file.path).ok())
        .collect();
    clear_diagnostics(client, published.take_missing(&current)).await;
    for file in &report.files {
        publish_report(client, published, file).await;
    }
}

/// Single consumer applying table changes in arrival order.
async fn run_bridge(
    client: Client,
    engine: Arc<HoverEngine>,
    published: Arc<PublishedDiagnostics>,
    mut rx: mpsc::UnboundedReceiver<BridgeMessage>,
) {
    while let Some(message) = rx.recv().await {
        match message {
            BridgeMessage::Events(events) => {
                let worker = Arc::clone(&engine);
                let outcomes = tokio::task::spawn_blocking(move || {
                    events
                        .into_iter()
                        .map(|event| {
                            let report = worker.handle_event(&event);
                            (event, report)
                        })
                        .collect::<Vec<_>>()
                })
                .await;
                match outcomes {
                    Ok(outcomes) => {
                        for (event, report) in &outcomes {
                            match report {
                                Some(report) => publish_report(&client, &published, report).await,
                                None if event.kind == FileEventKind::Deleted => {
                                    clear_diagnostics(&client, published.take_under(&event.path))
                                        .await
                                }
                                None => {}
                            }
                        }
                    }
                    Err(err) => error!("Table update task failed: {}", err),
                }
            }
            BridgeMessage::Rescan(roots) => {
                let worker = Arc::clone(&engine);
                match tokio::task::spawn_blocking(move || worker.rescan(&roots)).await {
                    Ok(report) => publish_scan(&client, &published, &report).await,
                    Err(err) => error!("Rescan task failed: {}", err),
                }
            }
            BridgeMessage::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("Bridge consumer stopped");
}

#[tower_lsp::async_trait]
impl LanguageServer for HovercraftLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("Hovercraft Language Server initializing");

        let config = match ServerConfig::from_value(params.initialization_options.as_ref()) {
            Ok(config) => config,
            Err(err) => {
                warn!("{}; using defaults", err);
                ServerConfig::default()
            }
        };
        if let Some(level) = &config.log_level {
            if let Err(err) = self.log_handle.set_filter(level) {
                warn!("Ignoring logLevel setting: {}", err);
            }
        }
        self.engine.apply_config(config.engine);

        let dynamic = params
            .capabilities
            .workspace
            .as_ref()
            .and_then(|w| w.did_change_watched_files.as_ref())
            .and_then(|w| w.dynamic_registration)
            .unwrap_or(false);
        self.dynamic_watchers.store(dynamic, Ordering::Relaxed);

        let roots = workspace_roots(&params);
        *self.roots.write() = roots.clone();

        let engine = Arc::clone(&self.engine);
        match tokio::task::spawn_blocking(move || engine.rescan(&roots)).await {
            Ok(report) => {
                let stats = self.engine.statistics();
                info!(
                    "Initialized with {} roots: {} records for {} file types",
                    self.roots.read().len(),
                    stats.records,
                    stats.file_types
                );
                *self.initial_scan.lock() = Some(report);
            }
            Err(err) => error!("Initial scan failed: {}", err),
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        ..Default::default()
                    },
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                workspace: Some(WorkspaceServerCapabilities {
                    workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                        supported: Some(true),
                        change_notifications: Some(OneOf::Left(true)),
                    }),
                    file_operations: None,
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: SERVER_NAME.to_string(),
                version: Some(crate::VERSION.to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        info!("Hovercraft Language Server initialized");

        let initial = self.initial_scan.lock().take();
        if let Some(report) = initial {
            publish_scan(&self.client, &self.published, &report).await;
        }

        if self.dynamic_watchers.load(Ordering::Relaxed) {
            let client = self.client.clone();
            let directories = self.engine.config().normalized_table_directories();
            tokio::spawn(async move {
                register_watchers(&client, &directories).await;
            });
        } else {
            warn!("Client does not support dynamic file watching; table edits need a restart");
        }
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Hovercraft Language Server shutting down");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        debug!("Document opened: {} ({} bytes)", doc.uri, doc.text.len());

        if !self.document_manager.insert_or_update(&doc.uri, doc.version, &doc.text) {
            let max_size = self.document_manager.max_document_size();
            self.client
                .show_message(
                    MessageType::WARNING,
                    format!(
                        "Hovercraft: {} is larger than {} MB; hovers are disabled for it",
                        doc.uri,
                        max_size / BYTES_PER_MEGABYTE
                    ),
                )
                .await;
        }
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        match params.content_changes.into_iter().last() {
            Some(change) => {
                if !self.document_manager.insert_or_update(&uri, version, &change.text) {
                    warn!("Document {} exceeds the size limit after change", uri);
                }
            }
            None => debug!("Change event for {} had no content changes", uri),
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        debug!("Document closed: {}", params.text_document.uri);
        self.document_manager.remove(&params.text_document.uri);
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let candidates = file_type_candidates(uri);
        if candidates.is_empty() {
            debug!("No file type for {}", uri);
            return Ok(None);
        }

        let engine = &self.engine;
        let hover = self.document_manager.with_rope(uri, |rope| {
            let (line, offset) = line_and_offset(rope, position)?;
            let result = engine.hover(&line, offset, &candidates)?;
            let range = Range::new(
                position_in_line(rope, position.line, result.start),
                position_in_line(rope, position.line, result.end),
            );
            Some(Hover {
                contents: HoverContents::Markup(MarkupContent {
                    kind: MarkupKind::Markdown,
                    value: result.content.markup_text,
                }),
                range: Some(range),
            })
        });

        match hover {
            Some(hover) => Ok(hover),
            None => {
                debug!("Hover for unknown document {}", uri);
                Ok(None)
            }
        }
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        let events: Vec<FileEvent> = params
            .changes
            .into_iter()
            .filter_map(|change| {
                let path = uri_to_path(&change.uri)?;
                let kind = event_kind(change.typ)?;
                Some(FileEvent::new(path, kind))
            })
            .collect();
        debug!("Queueing {} file events", events.len());
        if !events.is_empty() {
            self.enqueue(BridgeMessage::Events(events));
        }
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        let settings = if params.settings.is_null() {
            self.fetch_settings().await
        } else {
            Some(params.settings)
        };

        match ServerConfig::from_value(settings.as_ref()) {
            Ok(config) => self.apply_settings(config),
            Err(err) => {
                warn!("{}", err);
                self.client
                    .show_message(MessageType::WARNING, format!("Hovercraft: {}", err))
                    .await;
            }
        }
    }

    async fn did_change_workspace_folders(&self, params: DidChangeWorkspaceFoldersParams) {
        let roots = {
            let mut roots = self.roots.write();
            for removed in &params.event.removed {
                if let Some(path) = uri_to_path(&removed.uri) {
                    roots.retain(|root| root != &path);
                }
            }
            for added in &params.event.added {
                if let Some(path) = uri_to_path(&added.uri) {
                    if !roots.contains(&path) {
                        roots.push(path);
                    }
                }
            }
            roots.clone()
        };
        info!("Workspace folders changed; {} roots", roots.len());
        self.enqueue(BridgeMessage::Rescan(roots));
    }
}
