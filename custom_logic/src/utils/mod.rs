//! Shared primitive types used by the lexer, validator and substitution engine

pub mod span;

pub use span::Span;
