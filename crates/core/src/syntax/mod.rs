//! Syntax tree model for HCL documents.
//!
//! The parser adapter in [`parse`] lowers the grammar's concrete tree into
//! this crate-owned model: a closed set of node kinds with 1-based
//! line/column ranges and byte offsets into the source text.

mod parse;

pub use parse::{parse, ParseDiagnostic, ParseOutcome};

/// 1-based line/column position in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SrcPos {
    pub line: usize,
    pub column: usize,
}

impl SrcPos {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Half-open source span. Byte offsets index into the raw document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SrcRange {
    pub start: SrcPos,
    pub end: SrcPos,
    pub start_byte: usize,
    pub end_byte: usize,
}

impl SrcRange {
    /// True when the end of this range is strictly after `pos`.
    pub fn ends_after(&self, pos: SrcPos) -> bool {
        self.end.line > pos.line || (self.end.line == pos.line && self.end.column > pos.column)
    }
}

/// Structural kind of a syntax node.
///
/// Expression wrappers that carry no structure of their own (parentheses,
/// conditionals, operations) are spliced away during lowering; their
/// operands appear directly under the enclosing node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxKind {
    /// A sequence of attributes and blocks. The document root is a body.
    Body,
    /// `type "label" ... { body }`
    Block { block_type: String, labels: Vec<String> },
    /// `name = <value>`
    Attribute { name: String },
    /// A dotted chain rooted at an identifier, e.g. `local.foo`.
    Reference { parts: Vec<String> },
    /// The identifier at the root of a reference.
    Variable { name: String },
    /// One `.name` step of a reference.
    GetAttr { name: String },
    /// Quoted string literal; `value` has the surrounding quotes removed.
    StringLit { value: String },
    Number,
    Bool { value: bool },
    Null,
    Tuple,
    Object,
    ObjectElem,
    /// Quoted or heredoc template with interpolations.
    Template,
    FuncCall { name: String },
    /// Postfix expression with no more specific kind (index, splat).
    Expr,
}

/// A node of the lowered syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    pub range: SrcRange,
    pub children: Vec<SyntaxNode>,
}
