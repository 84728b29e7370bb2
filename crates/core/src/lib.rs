pub mod ast;
pub mod error;
pub mod logging;
pub mod syntax;
pub mod text;
pub mod workspace;
