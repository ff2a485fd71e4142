//! Expression substitution
//!
//! Replaces each index token of a custom logic expression with its condition
//! fragment, in one pass over the token stream. Fragment text is never
//! re-scanned, so digits inside a fragment (`Floor = 2`) are left alone.

pub mod predicate;

pub use predicate::{ComposedPredicate, FragmentMap, SubstitutionOptions, MATCH_ALL};

use crate::lexical::{self, LexerError};
use crate::logging::codes;
use crate::tokens::token_stream::render_tokens;
use crate::tokens::{Token, TokenStream};
use crate::validation::ValidatedExpression;
use crate::{log_debug, log_warning};

/// Substitution errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubstitutionError {
    #[error("Cannot substitute into expression: {0}")]
    Lexical(#[from] LexerError),
}

impl SubstitutionError {
    pub fn error_code(&self) -> crate::logging::Code {
        codes::composition::SUBSTITUTION_FAILED
    }
}

/// Substitute fragments into a raw expression.
///
/// The expression is tokenized but not validated; callers that need the
/// reference rules should validate first and use [`substitute_validated`].
/// A blank expression means "AND all fragments".
pub fn substitute(
    expression: &str,
    fragments: &FragmentMap,
    options: &SubstitutionOptions,
) -> Result<ComposedPredicate, SubstitutionError> {
    let (_, tokens) = lexical::tokenize(expression)?;
    Ok(substitute_tokens(&tokens, fragments, options))
}

/// Substitute fragments into an expression that already passed validation
pub fn substitute_validated(
    validated: &ValidatedExpression,
    fragments: &FragmentMap,
    options: &SubstitutionOptions,
) -> ComposedPredicate {
    substitute_tokens(&validated.tokens, fragments, options)
}

fn substitute_tokens(
    tokens: &TokenStream,
    fragments: &FragmentMap,
    options: &SubstitutionOptions,
) -> ComposedPredicate {
    if tokens.is_empty() {
        return compose_default(fragments, options);
    }

    let mut placeholders = 0usize;
    let texts: Vec<String> = tokens
        .iter()
        .map(|token| match token.value {
            Token::Index(index) => match fragment_for(fragments, index) {
                Some(fragment) => format!("({})", fragment),
                None => {
                    placeholders += 1;
                    placeholder_text(&options.inactive_placeholder)
                }
            },
            other => other.as_expression_string(),
        })
        .collect();

    let expression = render_tokens(texts, |i| tokens.get(i).map(|t| t.value));

    log_debug!("Fragments substituted",
        "tokens" => tokens.len(),
        "placeholders" => placeholders
    );
    if placeholders > 0 {
        log_warning!("Indices without a fragment were replaced by the placeholder",
            "placeholders" => placeholders
        );
    }

    finish(
        ComposedPredicate::new(expression, has_top_level_operator(tokens)),
        options,
    )
}

/// `TRUE` stays bare; any other placeholder is grouped like a fragment
fn placeholder_text(placeholder: &str) -> String {
    let placeholder = placeholder.trim();
    if placeholder.is_empty() || placeholder.eq_ignore_ascii_case(MATCH_ALL) {
        MATCH_ALL.to_string()
    } else {
        format!("({})", placeholder)
    }
}

fn fragment_for(fragments: &FragmentMap, index: u32) -> Option<&str> {
    fragments
        .get(&index)
        .map(|fragment| fragment.trim())
        .filter(|fragment| !fragment.is_empty())
}

fn finish(predicate: ComposedPredicate, options: &SubstitutionOptions) -> ComposedPredicate {
    if options.wrap_top_level {
        predicate.wrapped()
    } else {
        predicate
    }
}

/// True when an AND/OR appears at parenthesis depth zero
pub fn has_top_level_operator(tokens: &TokenStream) -> bool {
    let mut depth = 0usize;
    for token in tokens.iter() {
        match token.value {
            Token::LeftParen => depth += 1,
            Token::RightParen => depth = depth.saturating_sub(1),
            Token::And | Token::Or if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

/// Default combination: every fragment parenthesized, joined with AND in index order
pub fn join_with_and(fragments: &FragmentMap) -> ComposedPredicate {
    let parts: Vec<String> = fragments
        .keys()
        .filter_map(|index| fragment_for(fragments, *index))
        .map(|fragment| format!("({})", fragment))
        .collect();

    match parts.len() {
        0 => ComposedPredicate::match_all(),
        1 => ComposedPredicate::new(parts.concat(), false),
        _ => ComposedPredicate::new(parts.join(" AND "), true),
    }
}

/// The predicate used without custom logic: the AND-join, wrapped per options
pub fn compose_default(fragments: &FragmentMap, options: &SubstitutionOptions) -> ComposedPredicate {
    finish(join_with_and(fragments), options)
}

/// Compose the final predicate: custom logic when present and at least one
/// fragment exists, otherwise the AND-join. Never returns an empty predicate.
pub fn compose(
    logic: Option<&str>,
    fragments: &FragmentMap,
    options: &SubstitutionOptions,
) -> Result<ComposedPredicate, SubstitutionError> {
    let has_fragments = fragments.values().any(|f| !f.trim().is_empty());

    match logic.filter(|l| !l.trim().is_empty()) {
        Some(logic) if has_fragments => substitute(logic, fragments, options),
        _ => Ok(compose_default(fragments, options)),
    }
}
