//! Per-document state and the queries the server answers from it.
//!
//! Documents are classified by file name and parsed into immutable store
//! snapshots. Every open/change rebuilds the affected snapshot wholesale;
//! there is no incremental re-indexing.

mod completion;
mod definition;
mod hover;

use crate::ast::config::ConfigAst;
use crate::ast::stack::StackAst;
use crate::ast::IndexedAst;
use crate::syntax::{self, ParseDiagnostic};
use dashmap::DashMap;
use lsp_types::{CompletionItem, Position};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Dialect of a document, decided by its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Config,
    Stack,
    Values,
    Unknown,
}

/// Classifies a path. Lock files are not configuration.
pub fn file_kind(path: &str) -> FileKind {
    let base = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path);

    if base.ends_with(".stack.hcl") {
        FileKind::Stack
    } else if base.ends_with(".values.hcl") {
        FileKind::Values
    } else if base != ".terraform.lock.hcl" && base.ends_with(".hcl") {
        FileKind::Config
    } else {
        FileKind::Unknown
    }
}

/// Snapshot of a config document: the semantic view plus the raw text it
/// was built from.
#[derive(Debug)]
pub struct ConfigStore {
    pub ast: ConfigAst,
    pub document: String,
}

#[derive(Debug)]
pub struct StackStore {
    pub ast: StackAst,
    pub document: String,
}

#[derive(Debug)]
pub struct ValuesStore {
    pub ast: IndexedAst,
    pub document: String,
}

/// All open documents, keyed by filesystem path.
#[derive(Debug, Default)]
pub struct Workspace {
    configs: DashMap<String, Arc<ConfigStore>>,
    stacks: DashMap<String, Arc<StackStore>>,
    values: DashMap<String, Arc<ValuesStore>>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and indexes a newly opened document. Returns the syntax
    /// diagnostics found while parsing; a damaged document still produces
    /// a usable snapshot.
    pub fn open_document(&self, path: &str, text: &str) -> Vec<ParseDiagnostic> {
        self.rebuild(path, text)
    }

    /// Same as [`open_document`](Self::open_document): changes replace the
    /// snapshot wholesale.
    pub fn update_document(&self, path: &str, text: &str) -> Vec<ParseDiagnostic> {
        self.rebuild(path, text)
    }

    pub fn close_document(&self, path: &str) {
        self.configs.remove(path);
        self.stacks.remove(path);
        self.values.remove(path);
    }

    fn rebuild(&self, path: &str, text: &str) -> Vec<ParseDiagnostic> {
        let outcome = match syntax::parse(text) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(path, error = %err, "failed to parse document");
                return Vec::new();
            }
        };
        let index = IndexedAst::build(outcome.root);

        match file_kind(path) {
            FileKind::Config => {
                self.configs.insert(
                    path.to_string(),
                    Arc::new(ConfigStore {
                        ast: ConfigAst::new(index),
                        document: text.to_string(),
                    }),
                );
            }
            FileKind::Stack => {
                self.stacks.insert(
                    path.to_string(),
                    Arc::new(StackStore {
                        ast: StackAst::new(index),
                        document: text.to_string(),
                    }),
                );
            }
            FileKind::Values => {
                self.values.insert(
                    path.to_string(),
                    Arc::new(ValuesStore {
                        ast: index,
                        document: text.to_string(),
                    }),
                );
            }
            FileKind::Unknown => {
                tracing::debug!(path, "ignoring document of unknown kind");
            }
        }

        outcome.diagnostics
    }

    pub fn config(&self, path: &str) -> Option<Arc<ConfigStore>> {
        self.configs.get(path).map(|entry| entry.value().clone())
    }

    pub fn stack(&self, path: &str) -> Option<Arc<StackStore>> {
        self.stacks.get(path).map(|entry| entry.value().clone())
    }

    pub fn values(&self, path: &str) -> Option<Arc<ValuesStore>> {
        self.values.get(path).map(|entry| entry.value().clone())
    }

    /// Markdown hover content for the given position, if any.
    pub fn hover(&self, path: &str, position: Position) -> Option<String> {
        match file_kind(path) {
            FileKind::Config => {
                let store = self.config(path)?;
                hover::config_hover(&store, position)
            }
            FileKind::Stack => {
                let store = self.stack(path)?;
                hover::stack_hover(&store, position)
            }
            FileKind::Values => {
                let store = self.values(path)?;
                hover::values_hover(&store, position)
            }
            FileKind::Unknown => None,
        }
    }

    /// Filesystem path of the definition target for the given position.
    pub fn definition(&self, path: &str, position: Position) -> Option<PathBuf> {
        match file_kind(path) {
            FileKind::Config => {
                let store = self.config(path)?;
                definition::config_definition(&store, path, position)
            }
            FileKind::Stack => {
                let store = self.stack(path)?;
                definition::stack_definition(&store, path, position)
            }
            FileKind::Values => {
                let store = self.values(path)?;
                definition::values_definition(&store, path, position)
            }
            FileKind::Unknown => None,
        }
    }

    /// Snippet completions for the document's dialect.
    pub fn completions(&self, path: &str, position: Position) -> Vec<CompletionItem> {
        match file_kind(path) {
            FileKind::Config => self
                .config(path)
                .map(|store| completion::config_completions(&store.document, position))
                .unwrap_or_default(),
            FileKind::Stack => self
                .stack(path)
                .map(|_| completion::stack_completions(position))
                .unwrap_or_default(),
            FileKind::Values => self
                .values(path)
                .map(|_| completion::values_completions(position))
                .unwrap_or_default(),
            FileKind::Unknown => Vec::new(),
        }
    }
}
