//! Hover content per dialect. Config hovers render the defining local
//! attribute as source text; stack and values hovers are explanatory
//! markdown cards.

use super::{ConfigStore, StackStore, ValuesStore};
use crate::ast::position::to_internal;
use crate::text::cursor_word;
use lsp_types::Position;

pub(crate) fn config_hover(store: &ConfigStore, position: Position) -> Option<String> {
    let name = local_target(store, position)?;
    let id = *store.ast.locals().get(&name)?;
    let range = store.ast.index().node(id).range;
    let snippet = store.document.get(range.start_byte..range.end_byte)?.trim();
    Some(format!("```hcl\n{snippet}\n```"))
}

/// Name of the hovered local. The indexed reference is authoritative; the
/// cursor word covers positions the grammar could not parse into a
/// reference.
fn local_target(store: &ConfigStore, position: Position) -> Option<String> {
    if let Some(node) = store.ast.find_node_at(to_internal(position)) {
        if let Some(name) = store.ast.local_reference(node) {
            return Some(name);
        }
    }

    let word = cursor_word(
        &store.document,
        position.line as usize,
        position.character as usize,
    )?;
    match word.split('.').collect::<Vec<_>>().as_slice() {
        ["local", name] if !name.is_empty() => Some((*name).to_string()),
        _ => None,
    }
}

pub(crate) fn stack_hover(store: &StackStore, position: Position) -> Option<String> {
    let pos = to_internal(position);
    let ast = &store.ast;
    let node = ast.find_node_at(pos)?;

    if ast.find_unit_at(pos).is_some() {
        if let Some(source) = ast.unit_source(node) {
            return Some(source_card(&source));
        }
        if ast.enclosing_attribute(node).is_some() {
            if let Some(label) = ast.unit_label(node) {
                if let Some(path) = ast.unit_declared_path(&label) {
                    return Some(path_card(&path));
                }
            }
        }
        if let Some(label) = ast.unit_label(node) {
            return Some(unit_card(&label));
        }
    }

    if ast.find_stack_at(pos).is_some() {
        if let Some(source) = ast.stack_source(node) {
            return Some(source_card(&source));
        }
        if ast.enclosing_attribute(node).is_some() {
            if let Some(label) = ast.stack_label(node) {
                if let Some(path) = ast.stack_declared_path(&label) {
                    return Some(path_card(&path));
                }
            }
        }
        if let Some(label) = ast.stack_label(node) {
            return Some(stack_card(&label));
        }
    }

    None
}

pub(crate) fn values_hover(store: &ValuesStore, position: Position) -> Option<String> {
    let word = cursor_word(
        &store.document,
        position.line as usize,
        position.character as usize,
    )?;

    let mut parts = word.split('.');
    if parts.next() == Some("dependency") {
        if let Some(name) = parts.next().filter(|n| !n.is_empty()) {
            return Some(dependency_card(name));
        }
    }

    Some(variable_card(&word))
}

fn unit_card(name: &str) -> String {
    format!(
        "**Unit: `{name}`**\n\n\
         A unit block defines a single infrastructure component in a Terragrunt stack.\n\n\
         Each unit has a source (where the Terraform code lives) and a path (where it will be deployed)."
    )
}

fn stack_card(name: &str) -> String {
    format!(
        "**Stack: `{name}`**\n\n\
         A stack block defines a nested stack within the current stack.\n\n\
         Nested stacks allow you to organize and compose multiple related infrastructure units together."
    )
}

fn source_card(source: &str) -> String {
    format!(
        "**Source: `{source}`**\n\n\
         The source attribute specifies where the Terraform module or configuration is located.\n\n\
         This can be a local path, Git repository, or other supported Terraform module sources."
    )
}

fn path_card(path: &str) -> String {
    format!(
        "**Path: `{path}`**\n\n\
         The path attribute specifies the relative directory where this unit will be deployed.\n\n\
         This path is relative to the stack directory and determines where Terragrunt will run commands for this unit."
    )
}

fn variable_card(variable: &str) -> String {
    format!(
        "**Variable: `{variable}`**\n\n\
         This appears to be a variable defined in the values block.\n\n\
         Values files are used to define dynamic input values for units in Terragrunt stacks."
    )
}

fn dependency_card(dependency: &str) -> String {
    format!(
        "**Dependency: `{dependency}`**\n\n\
         A dependency reference allows you to use outputs from other units in your stack.\n\n\
         The dependency block defines where to find the output values and provides mock values for testing."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::config::ConfigAst;
    use crate::ast::stack::StackAst;
    use crate::ast::IndexedAst;
    use crate::syntax::parse;

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
    fn config_hover_renders_the_defining_local() {
        let store = config_store(
            "locals {\n\tapp_name = \"orders\"\n}\n\ninputs = {\n\tname = local.app_name\n}\n",
        );
        // Line 5 (0-based), inside `app_name` of the reference.
        let text = config_hover(&store, Position { line: 5, character: 17 }).expect("hover");
        assert!(text.starts_with("```hcl\n"));
        assert!(text.contains("app_name = \"orders\""));
        assert!(text.ends_with("\n```"));
    }

    #[test]
    fn config_hover_misses_for_undefined_locals() {
        let store = config_store("inputs = {\n\tname = local.missing\n}\n");
        assert_eq!(config_hover(&store, Position { line: 1, character: 16 }), None);
    }

    #[test]
    fn config_hover_misses_off_references() {
        let store = config_store("locals {\n\tapp_name = \"orders\"\n}\n");
        assert_eq!(config_hover(&store, Position { line: 0, character: 2 }), None);
    }

    const STACK_DOC: &str = concat!(
        "unit \"app\" {\n",
        "\tsource = \"units/app\"\n",
        "\tpath = \"app\"\n",
        "}\n",
    );

    #[test]
    fn stack_hover_shows_the_source_card_on_source() {
        let store = stack_store(STACK_DOC);
        let text = stack_hover(&store, Position { line: 1, character: 12 }).expect("hover");
        assert!(text.contains("Source: `units/app`"));
    }

    #[test]
    fn stack_hover_shows_the_path_card_on_path() {
        let store = stack_store(STACK_DOC);
        let text = stack_hover(&store, Position { line: 2, character: 10 }).expect("hover");
        assert!(text.contains("Path: `app`"));
    }

    #[test]
    fn stack_hover_falls_back_to_the_unit_card() {
        let store = stack_store(STACK_DOC);
        // On the unit label line, outside any attribute.
        let text = stack_hover(&store, Position { line: 0, character: 7 }).expect("hover");
        assert!(text.contains("Unit: `app`"));
    }

    #[test]
    fn values_hover_distinguishes_dependencies_from_variables() {
        let store = values_store("name = dependency.vpc.outputs.id\n");
        let text = values_hover(&store, Position { line: 0, character: 10 }).expect("hover");
        assert!(text.contains("Dependency: `vpc`"));

        let text = values_hover(&store, Position { line: 0, character: 1 }).expect("hover");
        assert!(text.contains("Variable: `name`"));
    }
}
