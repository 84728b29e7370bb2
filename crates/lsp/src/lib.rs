pub mod capabilities;

use std::sync::Arc;
use terrascope_core::ast::position::to_external_range;
use terrascope_core::syntax::ParseDiagnostic;
use terrascope_core::workspace::Workspace;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

pub struct TerrascopeServer {
    client: Client,
    workspace: Arc<Workspace>,
}

impl TerrascopeServer {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            workspace: Arc::new(Workspace::new()),
        }
    }

    /// Documents are keyed by filesystem path; non-file URIs keep their
    /// textual form so they still round-trip through the maps.
    fn document_key(uri: &Url) -> String {
        uri.to_file_path()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|_| uri.to_string())
    }

    async fn publish(&self, uri: Url, diagnostics: Vec<ParseDiagnostic>, version: Option<i32>) {
        let diagnostics = diagnostics
            .into_iter()
            .map(|d| Diagnostic {
                range: to_external_range(d.range),
                severity: Some(DiagnosticSeverity::ERROR),
                source: Some("terrascope".to_string()),
                message: d.message,
                ..Default::default()
            })
            .collect();
        self.client.publish_diagnostics(uri, diagnostics, version).await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for TerrascopeServer {
    async fn initialize(&self, _params: InitializeParams) -> Result<InitializeResult> {
        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: "Terrascope".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            capabilities: capabilities::server_capabilities(),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        self.client
            .log_message(MessageType::LOG, "LSP Event: initialized")
            .await;
        tracing::info!("server initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let key = Self::document_key(&uri);
        self.client
            .log_message(MessageType::LOG, format!("LSP Event: did_open uri={uri}"))
            .await;

        let diagnostics = self
            .workspace
            .open_document(&key, &params.text_document.text);
        self.publish(uri, diagnostics, Some(params.text_document.version))
            .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let key = Self::document_key(&uri);

        // Full sync: the last change carries the whole document.
        if let Some(change) = params.content_changes.into_iter().last() {
            let diagnostics = self.workspace.update_document(&key, &change.text);
            self.publish(uri, diagnostics, Some(params.text_document.version))
                .await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.client
            .log_message(MessageType::LOG, format!("LSP Event: did_close uri={uri}"))
            .await;
        self.workspace.close_document(&Self::document_key(&uri));
        self.publish(uri, Vec::new(), None).await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let pos = params.text_document_position_params.position;
        self.client
            .log_message(
                MessageType::LOG,
                format!(
                    "LSP Request: textDocument/hover uri={} pos={}:{}",
                    uri, pos.line, pos.character
                ),
            )
            .await;

        let content = self.workspace.hover(&Self::document_key(uri), pos);
        match &content {
            Some(_) => {
                self.client
                    .log_message(MessageType::LOG, "LSP Response: found hover content")
                    .await
            }
            None => {
                self.client
                    .log_message(MessageType::LOG, "LSP Response: no hover content")
                    .await
            }
        }

        Ok(content.map(|value| Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value,
            }),
            range: None,
        }))
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let pos = params.text_document_position_params.position;
        self.client
            .log_message(
                MessageType::LOG,
                format!(
                    "LSP Request: textDocument/definition uri={} pos={}:{}",
                    uri, pos.line, pos.character
                ),
            )
            .await;

        let target = self.workspace.definition(&Self::document_key(uri), pos);
        let Some(target) = target else {
            self.client
                .log_message(MessageType::LOG, "LSP Response: no definition found")
                .await;
            return Ok(None);
        };

        let Ok(target_uri) = Url::from_file_path(&target) else {
            tracing::warn!(target = %target.display(), "definition target is not a valid file path");
            return Ok(None);
        };
        self.client
            .log_message(
                MessageType::LOG,
                format!("LSP Response: definition at {target_uri}"),
            )
            .await;

        Ok(Some(GotoDefinitionResponse::Scalar(Location {
            uri: target_uri,
            range: Range::default(),
        })))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let pos = params.text_document_position.position;
        self.client
            .log_message(
                MessageType::LOG,
                format!(
                    "LSP Request: textDocument/completion uri={} pos={}:{}",
                    uri, pos.line, pos.character
                ),
            )
            .await;

        let items = self.workspace.completions(&Self::document_key(uri), pos);
        self.client
            .log_message(
                MessageType::LOG,
                format!("LSP Response: {} completion items", items.len()),
            )
            .await;

        Ok(Some(CompletionResponse::Array(items)))
    }
}

pub async fn run_server() {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = tower_lsp::LspService::new(TerrascopeServer::new);
    tower_lsp::Server::new(stdin, stdout, socket)
        .serve(service)
        .await;
}
