//! Definition targets per dialect. Queries extract a label and a declared
//! path from the snapshot; the filesystem probing that turns them into
//! concrete files is kept in small helpers at the bottom.

use super::{ConfigStore, StackStore, ValuesStore};
use crate::ast::position::to_internal;
use crate::text::cursor_word;
use lsp_types::Position;
use std::path::{Path, PathBuf};

pub(crate) fn config_definition(
    store: &ConfigStore,
    doc_path: &str,
    position: Position,
) -> Option<PathBuf> {
    let node = store.ast.find_node_at(to_internal(position))?;
    let dir = document_dir(doc_path);

    if let Some(label) = store.ast.include_label(node) {
        let target = store.ast.include_path(&label)?;
        let target = Path::new(&target);
        // Includes jump to the configured path whether or not it exists yet.
        return Some(if target.is_absolute() {
            target.to_path_buf()
        } else {
            dir.join(target)
        });
    }

    if let Some(label) = store.ast.dependency_label(node) {
        let config_path = store.ast.dependency_config_path(&label)?;
        let target = Path::new(&config_path);
        let resolved = if target.is_absolute() {
            target.to_path_buf()
        } else {
            dir.join(target).join("terragrunt.hcl")
        };
        if resolved.exists() {
            return Some(resolved);
        }
        tracing::debug!(%label, %config_path, "dependency target does not exist");
        return None;
    }

    None
}

pub(crate) fn stack_definition(
    store: &StackStore,
    doc_path: &str,
    position: Position,
) -> Option<PathBuf> {
    let pos = to_internal(position);
    let ast = &store.ast;
    let node = ast.find_node_at(pos)?;
    let dir = document_dir(doc_path);

    if ast.find_unit_at(pos).is_some() {
        if let Some(source) = ast.unit_source(node) {
            return resolve_source(&dir, &source, "terragrunt.hcl");
        }
        if ast.enclosing_attribute(node).is_some() {
            if let Some(label) = ast.unit_label(node) {
                if let Some(path) = ast.unit_declared_path(&label) {
                    return resolve_declared_path(&dir, &path, ast.unit_no_stack(&label));
                }
            }
        }
    }

    if ast.find_stack_at(pos).is_some() {
        if let Some(source) = ast.stack_source(node) {
            return resolve_source(&dir, &source, "terragrunt.stack.hcl");
        }
        if ast.enclosing_attribute(node).is_some() {
            if let Some(label) = ast.stack_label(node) {
                if let Some(path) = ast.stack_declared_path(&label) {
                    return resolve_declared_path(&dir, &path, ast.stack_no_stack(&label));
                }
            }
        }
    }

    None
}

/// Values files reference units by `dependency.<name>.<output>`; the unit's
/// configuration is searched in conventional locations around the values
/// file.
pub(crate) fn values_definition(
    store: &ValuesStore,
    doc_path: &str,
    position: Position,
) -> Option<PathBuf> {
    let word = cursor_word(
        &store.document,
        position.line as usize,
        position.character as usize,
    )?;

    let mut parts = word.split('.');
    if parts.next() != Some("dependency") {
        return None;
    }
    let name = parts.next().filter(|n| !n.is_empty())?;

    let dir = document_dir(doc_path);
    let candidates = [
        dir.join("..").join(name).join("terragrunt.hcl"),
        dir.join(name).join("terragrunt.hcl"),
        dir.parent().unwrap_or(&dir).join(name).join("terragrunt.hcl"),
    ];
    candidates.into_iter().find(|candidate| candidate.exists())
}

fn document_dir(doc_path: &str) -> PathBuf {
    Path::new(doc_path)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// A `source` points at a directory holding the named configuration file.
fn resolve_source(dir: &Path, source: &str, file_name: &str) -> Option<PathBuf> {
    let source = Path::new(source);
    let base = if source.is_absolute() {
        source.to_path_buf()
    } else {
        dir.join(source)
    };
    let candidate = base.join(file_name);
    if candidate.exists() {
        Some(candidate)
    } else {
        tracing::debug!(candidate = %candidate.display(), "source target does not exist");
        None
    }
}

/// Declared unit/stack paths are deployed under `.terragrunt-stack` unless
/// the block opts out.
fn resolve_declared_path(dir: &Path, declared: &str, no_stack: bool) -> Option<PathBuf> {
    let resolved = if no_stack {
        dir.join(declared).join("terragrunt.hcl")
    } else {
        dir.join(".terragrunt-stack").join(declared).join("terragrunt.hcl")
    };
    resolved.exists().then_some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::config::ConfigAst;
    use crate::ast::stack::StackAst;
    use crate::ast::IndexedAst;
    use crate::syntax::parse;
    use std::fs;
    use tempfile::tempdir;

    fn config_store(source: &str) -> ConfigStore {
        ConfigStore {
            ast: ConfigAst::new(IndexedAst::build(parse(source).expect("parse").root)),
            document: source.to_string(),
        }
    }

    fn stack_store(source: &str) -> StackStore {
        StackStore {
            ast: StackAst::new(IndexedAst::build(parse(source).expect("parse").root)),
            document: source.to_string(),
        }
    }

    fn values_store(source: &str) -> ValuesStore {
        ValuesStore {
            ast: IndexedAst::build(parse(source).expect("parse").root),
            document: source.to_string(),
        }
    }

    #[test]
    fn include_definition_resolves_relative_to_the_document() {
        let store = config_store("include \"root\" {\n\tpath = \"../root.hcl\"\n}\n");
        let target = config_definition(
            &store,
            "/work/app/terragrunt.hcl",
            Position { line: 1, character: 10 },
        )
        .expect("target");
        assert_eq!(target, PathBuf::from("/work/app/../root.hcl"));
    }

    #[test]
    fn dependency_definition_requires_an_existing_target() {
        let dir = tempdir().unwrap();
        let vpc = dir.path().join("vpc");
        fs::create_dir_all(&vpc).unwrap();
        fs::write(vpc.join("terragrunt.hcl"), "locals {\n}\n").unwrap();

        let app = dir.path().join("app");
        fs::create_dir_all(&app).unwrap();
        let doc_path = app.join("terragrunt.hcl");

        let store = config_store("dependency \"vpc\" {\n\tconfig_path = \"../vpc\"\n}\n");
        let position = Position { line: 1, character: 18 };

        let target =
            config_definition(&store, doc_path.to_str().unwrap(), position).expect("target");
        assert_eq!(target, app.join("../vpc").join("terragrunt.hcl"));

        let missing = config_store("dependency \"db\" {\n\tconfig_path = \"../db\"\n}\n");
        assert_eq!(
            config_definition(&missing, doc_path.to_str().unwrap(), position),
            None
        );
    }

    #[test]
    fn dependency_definition_ignores_other_attributes() {
        let store = config_store("dependency \"vpc\" {\n\tother_field = \"../vpc\"\n}\n");
        assert_eq!(
            config_definition(
                &store,
                "/work/app/terragrunt.hcl",
                Position { line: 1, character: 18 },
            ),
            None
        );
    }

    #[test]
    fn unit_source_definition_probes_the_source_directory() {
        let dir = tempdir().unwrap();
        let module = dir.path().join("units").join("app");
        fs::create_dir_all(&module).unwrap();
        fs::write(module.join("terragrunt.hcl"), "locals {\n}\n").unwrap();

        let doc_path = dir.path().join("terragrunt.stack.hcl");
        let store = stack_store("unit \"app\" {\n\tsource = \"units/app\"\n}\n");

        let target = stack_definition(
            &store,
            doc_path.to_str().unwrap(),
            Position { line: 1, character: 12 },
        )
        .expect("target");
        assert_eq!(target, module.join("terragrunt.hcl"));
    }

    #[test]
    fn unit_path_definition_uses_the_terragrunt_stack_directory() {
        let dir = tempdir().unwrap();
        let deployed = dir.path().join(".terragrunt-stack").join("app");
        fs::create_dir_all(&deployed).unwrap();
        fs::write(deployed.join("terragrunt.hcl"), "locals {\n}\n").unwrap();

        let doc_path = dir.path().join("terragrunt.stack.hcl");
        let store = stack_store("unit \"app\" {\n\tsource = \"units/app\"\n\tpath = \"app\"\n}\n");

        let target = stack_definition(
            &store,
            doc_path.to_str().unwrap(),
            Position { line: 2, character: 10 },
        )
        .expect("target");
        assert_eq!(target, deployed.join("terragrunt.hcl"));
    }

    #[test]
    fn no_stack_units_skip_the_terragrunt_stack_directory() {
        let dir = tempdir().unwrap();
        let deployed = dir.path().join("app");
        fs::create_dir_all(&deployed).unwrap();
        fs::write(deployed.join("terragrunt.hcl"), "locals {\n}\n").unwrap();

        let doc_path = dir.path().join("terragrunt.stack.hcl");
        let store = stack_store(
            "unit \"app\" {\n\tpath = \"app\"\n\tno_dot_terragrunt_stack = true\n}\n",
        );

        let target = stack_definition(
            &store,
            doc_path.to_str().unwrap(),
            Position { line: 1, character: 10 },
        )
        .expect("target");
        assert_eq!(target, deployed.join("terragrunt.hcl"));
    }

    #[test]
    fn values_definition_probes_sibling_directories() {
        let dir = tempdir().unwrap();
        let vpc = dir.path().join("vpc");
        fs::create_dir_all(&vpc).unwrap();
        fs::write(vpc.join("terragrunt.hcl"), "locals {\n}\n").unwrap();

        let app = dir.path().join("app");
        fs::create_dir_all(&app).unwrap();
        let doc_path = app.join("app.values.hcl");

        let store = values_store("name = dependency.vpc.outputs.id\n");
        let target = values_definition(
            &store,
            doc_path.to_str().unwrap(),
            Position { line: 0, character: 10 },
        )
        .expect("target");
        assert_eq!(target, app.join("..").join("vpc").join("terragrunt.hcl"));
    }

    #[test]
    fn values_definition_misses_plain_words() {
        let store = values_store("name = \"orders\"\n");
        assert_eq!(
            values_definition(&store, "/w/app.values.hcl", Position { line: 0, character: 1 }),
            None
        );
    }
}
