//! Token system for custom logic expressions
//!
//! An expression such as `(1 AND 2) OR 3` becomes a flat stream of
//! [`Token`]s, each carrying its [`Span`] in the normalized text and the
//! lexeme as the user typed it. Whitespace only separates tokens.

pub mod token;
pub mod token_stream;

pub use token::{classify_symbol, classify_word, parse_index, Token, TokenClass};
pub use token_stream::{SpannedToken, TokenStream};

pub use crate::utils::Span;
