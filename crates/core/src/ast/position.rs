//! Conversion between protocol positions and internal source positions.
//!
//! The protocol counts from zero; the parser counts from one. The mapping
//! is a plain offset in both directions, saturating at the origin so that
//! malformed inputs clamp instead of wrapping.

use crate::syntax::{SrcPos, SrcRange};
use lsp_types::{Position, Range};

/// Protocol position → 1-based source position.
pub fn to_internal(position: Position) -> SrcPos {
    SrcPos {
        line: position.line as usize + 1,
        column: position.character as usize + 1,
    }
}

/// 1-based source position → protocol position.
pub fn to_external(position: SrcPos) -> Position {
    Position {
        line: position.line.saturating_sub(1) as u32,
        character: position.column.saturating_sub(1) as u32,
    }
}

/// Source range → protocol range.
pub fn to_external_range(range: SrcRange) -> Range {
    Range {
        start: to_external(range.start),
        end: to_external(range.end),
    }
}
