mod ast_snippet;

pub use crate::ast_snippet::AstSnippet;
