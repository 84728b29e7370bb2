use super::{SrcPos, SrcRange, SyntaxKind, SyntaxNode};
use crate::error::{Result, TerrascopeError};
use tree_sitter::{Node as TsNode, Parser};

/// A syntax problem found while parsing. The tree is still produced;
/// diagnostics only describe the damaged regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    pub range: SrcRange,
    pub message: String,
}

/// Result of lowering a document: the root node plus any syntax errors.
#[derive(Debug)]
pub struct ParseOutcome {
    pub root: SyntaxNode,
    pub diagnostics: Vec<ParseDiagnostic>,
}

/// Parses HCL source into the crate's syntax model.
///
/// Malformed input still yields a tree covering whatever the grammar could
/// recover; the damaged regions are reported as diagnostics.
pub fn parse(source: &str) -> Result<ParseOutcome> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_hcl::LANGUAGE.into())
        .map_err(|e| TerrascopeError::Parse(e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| TerrascopeError::Parse("parser produced no tree".to_string()))?;

    let ts_root = tree.root_node();
    let mut diagnostics = Vec::new();
    collect_diagnostics(ts_root, &mut diagnostics);

    // The grammar root holds a single `body`; its items are spliced so the
    // document is one body, not a body wrapping a body.
    let mut children = Vec::new();
    let mut cursor = ts_root.walk();
    for child in ts_root.named_children(&mut cursor) {
        if child.kind() == "body" {
            children.extend(lower_named_children(child, source));
        } else {
            children.extend(lower_node(child, source));
        }
    }

    let root = SyntaxNode {
        kind: SyntaxKind::Body,
        range: range_of(ts_root),
        children,
    };

    Ok(ParseOutcome { root, diagnostics })
}

fn range_of(node: TsNode) -> SrcRange {
    let start = node.start_position();
    let end = node.end_position();
    SrcRange {
        start: SrcPos::new(start.row + 1, start.column + 1),
        end: SrcPos::new(end.row + 1, end.column + 1),
        start_byte: node.start_byte(),
        end_byte: node.end_byte(),
    }
}

fn text<'a>(node: TsNode, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Strips the surrounding quotes from a `string_lit` token.
fn string_contents(node: TsNode, source: &str) -> String {
    let raw = text(node, source);
    raw.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw)
        .to_string()
}

fn lower_named_children(node: TsNode, source: &str) -> Vec<SyntaxNode> {
    let mut cursor = node.walk();
    let mut out = Vec::new();
    for child in node.named_children(&mut cursor) {
        out.extend(lower_node(child, source));
    }
    out
}

/// Lowers one grammar node into zero or more syntax nodes. Wrapper rules
/// without structure of their own are transparent: their children are
/// spliced into the parent.
fn lower_node(node: TsNode, source: &str) -> Vec<SyntaxNode> {
    match node.kind() {
        "comment" => Vec::new(),
        "body" => vec![SyntaxNode {
            kind: SyntaxKind::Body,
            range: range_of(node),
            children: lower_named_children(node, source),
        }],
        "block" => lower_block(node, source),
        "attribute" => lower_attribute(node, source),
        "expression" => lower_expression(node, source),
        "variable_expr" => vec![SyntaxNode {
            kind: SyntaxKind::Variable {
                name: text(node, source).to_string(),
            },
            range: range_of(node),
            children: Vec::new(),
        }],
        "get_attr" => vec![SyntaxNode {
            kind: SyntaxKind::GetAttr {
                name: get_attr_name(node, source),
            },
            range: range_of(node),
            children: Vec::new(),
        }],
        "string_lit" => vec![SyntaxNode {
            kind: SyntaxKind::StringLit {
                value: string_contents(node, source),
            },
            range: range_of(node),
            children: Vec::new(),
        }],
        "numeric_lit" => vec![SyntaxNode {
            kind: SyntaxKind::Number,
            range: range_of(node),
            children: Vec::new(),
        }],
        "bool_lit" => vec![SyntaxNode {
            kind: SyntaxKind::Bool {
                value: text(node, source) == "true",
            },
            range: range_of(node),
            children: Vec::new(),
        }],
        "null_lit" => vec![SyntaxNode {
            kind: SyntaxKind::Null,
            range: range_of(node),
            children: Vec::new(),
        }],
        "tuple" => vec![SyntaxNode {
            kind: SyntaxKind::Tuple,
            range: range_of(node),
            children: lower_named_children(node, source),
        }],
        "object" => vec![SyntaxNode {
            kind: SyntaxKind::Object,
            range: range_of(node),
            children: lower_named_children(node, source),
        }],
        "object_elem" => vec![SyntaxNode {
            kind: SyntaxKind::ObjectElem,
            range: range_of(node),
            children: lower_named_children(node, source),
        }],
        "quoted_template" | "heredoc_template" => vec![SyntaxNode {
            kind: SyntaxKind::Template,
            range: range_of(node),
            children: lower_named_children(node, source),
        }],
        "function_call" => lower_function_call(node, source),
        // Everything else (conditionals, operations, for expressions,
        // interpolations, ERROR nodes) is transparent.
        _ => lower_named_children(node, source),
    }
}

fn lower_block(node: TsNode, source: &str) -> Vec<SyntaxNode> {
    let mut block_type = String::new();
    let mut labels = Vec::new();
    let mut children = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "identifier" if block_type.is_empty() => {
                block_type = text(child, source).to_string();
            }
            "identifier" => labels.push(text(child, source).to_string()),
            "string_lit" => labels.push(string_contents(child, source)),
            "body" => children.extend(lower_node(child, source)),
            _ => {}
        }
    }
    vec![SyntaxNode {
        kind: SyntaxKind::Block { block_type, labels },
        range: range_of(node),
        children,
    }]
}

fn lower_attribute(node: TsNode, source: &str) -> Vec<SyntaxNode> {
    let mut name = String::new();
    let mut children = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "identifier" if name.is_empty() => name = text(child, source).to_string(),
            _ => children.extend(lower_node(child, source)),
        }
    }
    vec![SyntaxNode {
        kind: SyntaxKind::Attribute { name },
        range: range_of(node),
        children,
    }]
}

/// An `expression` node whose children are a `variable_expr` followed only
/// by `get_attr` steps is a dotted reference; anything else is either
/// transparent (single child) or a generic postfix expression.
fn lower_expression(node: TsNode, source: &str) -> Vec<SyntaxNode> {
    let mut cursor = node.walk();
    let named: Vec<TsNode> = node.named_children(&mut cursor).collect();

    let is_reference = named.len() >= 2
        && named[0].kind() == "variable_expr"
        && named[1..].iter().all(|c| c.kind() == "get_attr");

    if is_reference {
        let mut parts = vec![text(named[0], source).to_string()];
        parts.extend(named[1..].iter().map(|c| get_attr_name(*c, source)));
        let mut children = Vec::new();
        for child in &named {
            children.extend(lower_node(*child, source));
        }
        return vec![SyntaxNode {
            kind: SyntaxKind::Reference { parts },
            range: range_of(node),
            children,
        }];
    }

    if named.len() == 1 {
        return lower_node(named[0], source);
    }

    let mut children = Vec::new();
    for child in &named {
        children.extend(lower_node(*child, source));
    }
    vec![SyntaxNode {
        kind: SyntaxKind::Expr,
        range: range_of(node),
        children,
    }]
}

fn lower_function_call(node: TsNode, source: &str) -> Vec<SyntaxNode> {
    let mut name = String::new();
    let mut children = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "identifier" if name.is_empty() => name = text(child, source).to_string(),
            _ => children.extend(lower_node(child, source)),
        }
    }
    vec![SyntaxNode {
        kind: SyntaxKind::FuncCall { name },
        range: range_of(node),
        children,
    }]
}

fn get_attr_name(node: TsNode, source: &str) -> String {
    node.named_child(0)
        .map(|c| text(c, source).to_string())
        .unwrap_or_default()
}

fn collect_diagnostics(node: TsNode, out: &mut Vec<ParseDiagnostic>) {
    if !node.has_error() {
        return;
    }
    if node.is_error() {
        out.push(ParseDiagnostic {
            range: range_of(node),
            message: "invalid syntax".to_string(),
        });
        return;
    }
    if node.is_missing() {
        out.push(ParseDiagnostic {
            range: range_of(node),
            message: format!("missing `{}`", node.kind()),
        });
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_diagnostics(child, out);
    }
}
