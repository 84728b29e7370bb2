use lsp_types::Position;
use std::fs;
use terrascope_core::workspace::Workspace;
use tempfile::tempdir;

const CONFIG: &str = concat!(
    "include \"root\" {\n",
    "\tpath = \"root.hcl\"\n",
    "}\n",
    "\n",
    "locals {\n",
    "\tapp_name = \"orders\"\n",
    "}\n",
    "\n",
    "dependency \"vpc\" {\n",
    "\tconfig_path = \"../vpc\"\n",
    "\tother_field = \"../vpc\"\n",
    "}\n",
    "\n",
    "inputs = {\n",
    "\tname = local.app_name\n",
    "}\n",
);

#[test]
fn hover_renders_locals_through_the_workspace() {
    let workspace = Workspace::new();
    workspace.open_document("/w/app/terragrunt.hcl", CONFIG);

    // Inside `app_name` of the reference on line 14 (0-based).
    let hover = workspace
        .hover("/w/app/terragrunt.hcl", Position { line: 14, character: 17 })
        .expect("hover content");
    assert!(hover.contains("app_name = \"orders\""));

    // Hovering the locals block itself is not a reference.
    assert_eq!(
        workspace.hover("/w/app/terragrunt.hcl", Position { line: 4, character: 2 }),
        None
    );
}

#[test]
fn definition_walks_includes_and_dependencies() {
    let dir = tempdir().unwrap();
    let vpc = dir.path().join("vpc");
    fs::create_dir_all(&vpc).unwrap();
    fs::write(vpc.join("terragrunt.hcl"), "locals {\n}\n").unwrap();
    let app = dir.path().join("app");
    fs::create_dir_all(&app).unwrap();

    let doc = app.join("terragrunt.hcl");
    let doc_path = doc.to_str().unwrap();

    let workspace = Workspace::new();
    workspace.open_document(doc_path, CONFIG);

    // Include label line: jumps to the configured path without probing.
    let target = workspace
        .definition(doc_path, Position { line: 0, character: 10 })
        .expect("include target");
    assert_eq!(target, app.join("root.hcl"));

    // Dependency config_path: probes for the referenced terragrunt.hcl.
    let target = workspace
        .definition(doc_path, Position { line: 9, character: 18 })
        .expect("dependency target");
    assert_eq!(target, app.join("../vpc").join("terragrunt.hcl"));

    // Same block, different attribute: no target.
    assert_eq!(
        workspace.definition(doc_path, Position { line: 10, character: 18 }),
        None
    );
}

#[test]
fn stack_documents_answer_stack_queries() {
    let dir = tempdir().unwrap();
    let module = dir.path().join("units").join("app");
    fs::create_dir_all(&module).unwrap();
    fs::write(module.join("terragrunt.hcl"), "locals {\n}\n").unwrap();

    let doc = dir.path().join("terragrunt.stack.hcl");
    let doc_path = doc.to_str().unwrap();

    let workspace = Workspace::new();
    workspace.open_document(
        doc_path,
        "unit \"app\" {\n\tsource = \"units/app\"\n\tpath = \"app\"\n}\n",
    );

    let hover = workspace
        .hover(doc_path, Position { line: 1, character: 12 })
        .expect("hover content");
    assert!(hover.contains("Source: `units/app`"));

    let target = workspace
        .definition(doc_path, Position { line: 1, character: 12 })
        .expect("source target");
    assert_eq!(target, module.join("terragrunt.hcl"));
}

#[test]
fn completions_depend_on_the_dialect() {
    let workspace = Workspace::new();
    workspace.open_document("/w/terragrunt.hcl", "dep");
    workspace.open_document("/w/terragrunt.stack.hcl", "");

    let labels: Vec<String> = workspace
        .completions("/w/terragrunt.hcl", Position { line: 0, character: 3 })
        .into_iter()
        .map(|item| item.label)
        .collect();
    assert_eq!(labels, ["dependency", "dependencies"]);

    let labels: Vec<String> = workspace
        .completions("/w/terragrunt.stack.hcl", Position { line: 0, character: 0 })
        .into_iter()
        .map(|item| item.label)
        .collect();
    assert_eq!(labels, ["unit", "stack"]);

    // Documents that were never opened have no completions.
    assert!(workspace
        .completions("/w/other.hcl", Position { line: 0, character: 0 })
        .is_empty());
}

#[test]
fn lock_files_are_ignored() {
    let workspace = Workspace::new();
    let diagnostics = workspace.open_document("/w/.terraform.lock.hcl", "provider \"x\" {\n}\n");
    assert!(diagnostics.is_empty());
    assert!(workspace
        .hover("/w/.terraform.lock.hcl", Position { line: 0, character: 1 })
        .is_none());
}
