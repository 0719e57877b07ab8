//! Error types for grammar construction and sentence parsing.
//!
//! [`GrammarError`] aborts building a grammar (reading the description,
//! registering symbols, building the table). [`ParseError`] aborts a single
//! sentence; the grammar stays usable for the next one.

use std::fmt;

use thiserror::Error;

/// The character found where a delimiter was expected, or the end of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Found(pub Option<char>);

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(c) => write!(f, "{}", c),
            None => write!(f, "end"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("Expected {expected} at {position} instead of {found}")]
    MissingDelimiter {
        position: usize,
        expected: String,
        found: Found,
    },

    #[error("{found} is an illegal symbol at {position}")]
    IllegalSymbol { position: usize, found: char },

    #[error("Expected starting non-terminal at {position} instead of {found}")]
    MissingStartSymbol { position: usize, found: Found },

    #[error("Attempted redefinition of symbol {name}")]
    Redeclaration { name: String },

    #[error("Symbol {name} undeclared")]
    UndeclaredSymbol { name: String },

    /// A start symbol or left-hand side that was never declared.
    #[error("{name} is an unknown non-terminal")]
    UnknownNonTerminal { name: String },

    #[error("{name} is not a non-terminal")]
    NotANonTerminal { name: String },

    /// Two productions predict the same terminal for one nonterminal.
    #[error("Ambiguous action on {left}/{terminal}: both productions \"{existing}\" and \"{conflicting}\" apply.")]
    Ambiguous {
        left: String,
        terminal: String,
        existing: String,
        conflicting: String,
    },
}

impl GrammarError {
    /// True for malformed description text (as opposed to naming errors).
    pub fn is_description_syntax(&self) -> bool {
        matches!(
            self,
            GrammarError::MissingDelimiter { .. }
                | GrammarError::IllegalSymbol { .. }
                | GrammarError::MissingStartSymbol { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Undeclared symbol {lexeme} in input.")]
    UndeclaredInput { lexeme: String, position: usize },

    #[error("Syntax error: Expected {expected}, found {found}")]
    Mismatch {
        expected: String,
        found: String,
        position: usize,
    },

    #[error("Syntax error: no productions applicable expected symbol {non_terminal}/found symbol {found}")]
    NoProduction {
        non_terminal: String,
        found: String,
        position: usize,
    },

    /// Usually a sign of a runaway expansion rather than a long sentence.
    #[error("Text is too complex to parse: stack grew past {limit} symbols")]
    StackDepthExceeded { limit: usize },

    #[error("The LL(1) table has not been built for this grammar")]
    TableNotBuilt,
}
