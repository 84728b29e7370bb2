//! Static snippet catalogs per dialect, emitted as snippet-format
//! completion items that replace the text typed so far on the line.

use crate::text::cursor_word;
use lsp_types::{
    CompletionItem, CompletionItemKind, CompletionTextEdit, Documentation, InsertTextFormat,
    MarkupContent, MarkupKind, Position, Range, TextEdit,
};

struct Snippet {
    label: &'static str,
    kind: CompletionItemKind,
    doc: &'static str,
    body: &'static str,
}

// TODO: consult the indexed tree to only offer block snippets at the top
// level and attribute snippets inside the right blocks.
const CONFIG_SNIPPETS: &[Snippet] = &[
    Snippet {
        label: "dependency",
        kind: CompletionItemKind::CLASS,
        doc: "# dependency\nThe dependency block is used to configure unit dependencies.\nEach dependency block exposes outputs of the dependency unit as variables you can reference in dependent unit configuration.",
        body: "dependency \"${1}\" {\n\tconfig_path = \"${2}\"\n}",
    },
    Snippet {
        label: "inputs",
        kind: CompletionItemKind::FIELD,
        doc: "# inputs\nThe inputs attribute is a map that is used to specify the input variables and their values to pass in to OpenTofu/Terraform.",
        body: "inputs = {\n\t${1} = ${2}\n}",
    },
    Snippet {
        label: "locals",
        kind: CompletionItemKind::CLASS,
        doc: "# locals\nThe locals block is used to define aliases for Terragrunt expressions that can be referenced elsewhere in configuration.",
        body: "locals {\n\t${1} = ${2}\n}",
    },
    Snippet {
        label: "feature",
        kind: CompletionItemKind::CLASS,
        doc: "# feature\nThe feature block is used to configure feature flags in HCL for a specific Terragrunt unit.",
        body: "feature \"${1}\" {\n\tdefault = ${2}\n}",
    },
    Snippet {
        label: "terraform",
        kind: CompletionItemKind::CLASS,
        doc: "# terraform\nThe terraform block is used to configure how Terragrunt will interact with OpenTofu/Terraform.",
        body: "terraform {\n\tsource = \"${1}\"\n}",
    },
    Snippet {
        label: "remote_state",
        kind: CompletionItemKind::CLASS,
        doc: "# remote_state\nThe remote_state block is used to configure how Terragrunt will set up remote state configuration.",
        body: "remote_state {\n\tbackend = \"${1:s3}\"\n\tconfig = {\n\t\tbucket = \"${2}\"\n\t\tkey = \"${3}\"\n\t\tregion = \"${4}\"\n\t}\n}",
    },
    Snippet {
        label: "include",
        kind: CompletionItemKind::CLASS,
        doc: "# include\nThe include block is used to specify the inclusion of partial Terragrunt configuration.",
        body: "include \"${1:root}\" {\n\tpath = ${2:find_in_parent_folders(\"root.hcl\")}\n}",
    },
    Snippet {
        label: "dependencies",
        kind: CompletionItemKind::CLASS,
        doc: "# dependencies\nThe dependencies block is used to enumerate all the Terragrunt units that need to be applied before this unit.",
        body: "dependencies {\n\tpaths = [\"${1}\"]\n}",
    },
    Snippet {
        label: "generate",
        kind: CompletionItemKind::CLASS,
        doc: "# generate\nThe generate block can be used to arbitrarily generate a file in the terragrunt working directory.",
        body: "generate \"provider\" {\n\tpath      = \"${1:provider.tf}\"\n\tif_exists = \"${2:overwrite}\"\n\tcontents = <<EOF\nprovider \"${3:aws}\" {\n\tregion = \"${4:us-east-1}\"\n}\nEOF\n}",
    },
    Snippet {
        label: "engine",
        kind: CompletionItemKind::CLASS,
        doc: "# engine\nThe engine block is used to configure Terragrunt engine configuration.",
        body: "engine {\n\tsource  = \"${1:github.com/gruntwork-io/terragrunt-engine-opentofu}\"\n\tversion = \"${2:v0.0.16}\"\n}",
    },
    Snippet {
        label: "exclude",
        kind: CompletionItemKind::CLASS,
        doc: "# exclude\nThe exclude block provides configuration options to dynamically determine when and how a unit is excluded from the run queue.",
        body: "exclude {\n\tif      = ${1:true}\n\tactions = [\"${2:all}\"]\n}",
    },
    Snippet {
        label: "download_dir",
        kind: CompletionItemKind::FIELD,
        doc: "# download_dir\nThe download_dir string option can be used to override the default download directory (which is .terragrunt-cache by default).",
        body: "download_dir = \"${1:.terragrunt-cache}\"",
    },
    Snippet {
        label: "prevent_destroy",
        kind: CompletionItemKind::FIELD,
        doc: "# prevent_destroy\nThe prevent_destroy boolean flag protects this unit from being destroyed.",
        body: "prevent_destroy = ${1:true}",
    },
    Snippet {
        label: "iam_role",
        kind: CompletionItemKind::FIELD,
        doc: "# iam_role\nThe iam_role attribute specifies an IAM role to assume before running OpenTofu/Terraform.",
        body: "iam_role = \"${1}\"",
    },
    Snippet {
        label: "terraform_binary",
        kind: CompletionItemKind::FIELD,
        doc: "# terraform_binary\nThe terraform_binary attribute overrides the default binary Terragrunt invokes.",
        body: "terraform_binary = \"${1:tofu}\"",
    },
    Snippet {
        label: "terraform_version_constraint",
        kind: CompletionItemKind::FIELD,
        doc: "# terraform_version_constraint\nThe terraform_version_constraint attribute overrides the default minimum supported version of OpenTofu/Terraform.",
        body: "terraform_version_constraint = \">= ${1:1.0}\"",
    },
    Snippet {
        label: "terragrunt_version_constraint",
        kind: CompletionItemKind::FIELD,
        doc: "# terragrunt_version_constraint\nThe terragrunt_version_constraint attribute specifies which versions of the Terragrunt CLI can be used with the configuration.",
        body: "terragrunt_version_constraint = \">= ${1:0.23}\"",
    },
];

const STACK_SNIPPETS: &[Snippet] = &[
    Snippet {
        label: "unit",
        kind: CompletionItemKind::CLASS,
        doc: "# unit\nThe unit block is used to define a single infrastructure unit in a Terragrunt stack.",
        body: "unit \"${1:name}\" {\n\tsource = \"${2}\"\n\tpath   = \"${3}\"\n}",
    },
    Snippet {
        label: "stack",
        kind: CompletionItemKind::CLASS,
        doc: "# stack\nThe stack block is used to define a nested stack within a Terragrunt stack.",
        body: "stack \"${1:name}\" {\n\tsource = \"${2}\"\n\tpath   = \"${3}\"\n}",
    },
];

const VALUES_SNIPPETS: &[Snippet] = &[
    Snippet {
        label: "values",
        kind: CompletionItemKind::CLASS,
        doc: "# values\nThe values block is used to define dynamic values for units in Terragrunt stacks.",
        body: "values {\n\t${1:key} = \"${2:value}\"\n}",
    },
    Snippet {
        label: "dependency",
        kind: CompletionItemKind::CLASS,
        doc: "# dependency\nThe dependency block is used to reference outputs from other units in values files.",
        body: "dependency \"${1:name}\" {\n\tconfig_path = \"${2}\"\n\n\tmock_outputs = {\n\t\t${3:output_name} = \"${4:mock_value}\"\n\t}\n}",
    },
];

/// Config completions are filtered by the word typed so far; an empty word
/// offers the whole catalog.
pub(crate) fn config_completions(document: &str, position: Position) -> Vec<CompletionItem> {
    let word = cursor_word(document, position.line as usize, position.character as usize)
        .unwrap_or_default();
    CONFIG_SNIPPETS
        .iter()
        .filter(|snippet| snippet.label.starts_with(&word))
        .map(|snippet| to_item(snippet, position))
        .collect()
}

pub(crate) fn stack_completions(position: Position) -> Vec<CompletionItem> {
    STACK_SNIPPETS
        .iter()
        .map(|snippet| to_item(snippet, position))
        .collect()
}

pub(crate) fn values_completions(position: Position) -> Vec<CompletionItem> {
    VALUES_SNIPPETS
        .iter()
        .map(|snippet| to_item(snippet, position))
        .collect()
}

fn to_item(snippet: &Snippet, position: Position) -> CompletionItem {
    CompletionItem {
        label: snippet.label.to_string(),
        kind: Some(snippet.kind),
        documentation: Some(Documentation::MarkupContent(MarkupContent {
            kind: MarkupKind::Markdown,
            value: snippet.doc.to_string(),
        })),
        insert_text_format: Some(InsertTextFormat::SNIPPET),
        text_edit: Some(CompletionTextEdit::Edit(TextEdit {
            range: Range {
                start: Position {
                    line: position.line,
                    character: 0,
                },
                end: position,
            },
            new_text: snippet.body.to_string(),
        })),
        ..CompletionItem::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_completions_filter_by_prefix() {
        let items = config_completions("dep", Position { line: 0, character: 3 });
        let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, ["dependency", "dependencies"]);
    }

    #[test]
    fn empty_prefix_offers_the_whole_catalog() {
        let items = config_completions("", Position { line: 0, character: 0 });
        assert_eq!(items.len(), CONFIG_SNIPPETS.len());
    }

    #[test]
    fn snippets_replace_the_typed_range() {
        let items = config_completions("locals {\n}\ninc", Position { line: 2, character: 3 });
        assert_eq!(items.len(), 1);
        let Some(CompletionTextEdit::Edit(edit)) = &items[0].text_edit else {
            panic!("expected a text edit");
        };
        assert_eq!(edit.range.start, Position { line: 2, character: 0 });
        assert_eq!(edit.range.end, Position { line: 2, character: 3 });
        assert!(edit.new_text.starts_with("include"));
        assert_eq!(items[0].insert_text_format, Some(InsertTextFormat::SNIPPET));
    }

    #[test]
    fn stack_and_values_catalogs_are_static() {
        let position = Position { line: 0, character: 0 };
        let labels: Vec<String> = stack_completions(position)
            .into_iter()
            .map(|i| i.label)
            .collect();
        assert_eq!(labels, ["unit", "stack"]);

        let labels: Vec<String> = values_completions(position)
            .into_iter()
            .map(|i| i.label)
            .collect();
        assert_eq!(labels, ["values", "dependency"]);
    }
}
