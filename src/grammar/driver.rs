//! Table-driven LL(1) parse of a sentence against a frozen grammar.
//!
//! The driver keeps an explicit stack of symbols seeded with the start
//! symbol. A terminal on top must match the lookahead and is popped; a
//! nonterminal on top is replaced by the right-hand side of the production
//! the table selects for the lookahead. Matching the end-of-input marker
//! accepts the sentence.

use log::trace;
use serde::Serialize;

use super::{
    config::ParseConfig,
    error::ParseError,
    grammar::{Production, SymbolId},
    symbol_table::SymbolTable,
    Grammar, END_MARK,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token {
    terminal: SymbolId,
    position: usize,
}

/// Splits a sentence into terminals. Digit runs become the integer or float
/// constant terminal; anything else up to the next whitespace must name a
/// declared terminal.
struct TokenStream<'g> {
    chars: Vec<char>,
    index: usize,
    symbol_table: &'g SymbolTable,
    lookahead: Token,
}

impl<'g> TokenStream<'g> {
    fn new(sentence: &str, symbol_table: &'g SymbolTable) -> Result<Self, ParseError> {
        let mut tokens = Self {
            chars: sentence.chars().collect(),
            index: 0,
            symbol_table,
            lookahead: Token {
                terminal: symbol_table.end_mark(),
                position: 0,
            },
        };
        tokens.advance()?;
        Ok(tokens)
    }

    fn peek(&self) -> Token {
        self.lookahead
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.lookahead = self.scan()?;
        Ok(())
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.index).cloned()
    }

    fn skip_digits(&mut self) {
        while self.current().map_or(false, |c| c.is_ascii_digit()) {
            self.index += 1;
        }
    }

    fn scan(&mut self) -> Result<Token, ParseError> {
        while self.current().map_or(false, |c| c.is_whitespace()) {
            self.index += 1;
        }
        let position = self.index;

        let c = match self.current() {
            None => {
                return Ok(Token {
                    terminal: self.symbol_table.end_mark(),
                    position,
                })
            }
            Some(c) => c,
        };

        if c.is_ascii_digit() {
            self.skip_digits();
            let terminal = if self.current() == Some('.') {
                self.index += 1;
                self.skip_digits();
                self.symbol_table.float_const()
            } else {
                self.symbol_table.integer_const()
            };
            return Ok(Token { terminal, position });
        }

        while self.current().map_or(false, |c| !c.is_whitespace()) {
            self.index += 1;
        }
        let lexeme: String = self.chars[position..self.index].iter().collect();
        // `$` is only ever produced by the end of the text.
        match self.symbol_table.find_terminal(&lexeme) {
            Some(terminal) if lexeme != END_MARK => Ok(Token { terminal, position }),
            _ => Err(ParseError::UndeclaredInput { lexeme, position }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseAction {
    Match { terminal: String },
    Expand { production: String },
}

/// One transition of the driver, as seen before it is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseStep {
    /// Bottom of the stack first.
    pub stack: Vec<String>,
    pub lookahead: String,
    pub action: ParseAction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseOutcome {
    /// Terminals matched, not counting the end-of-input marker.
    pub consumed: usize,
    /// Empty unless [`ParseConfig::trace`] is set.
    pub steps: Vec<ParseStep>,
}

impl ParseOutcome {
    pub fn to_plaintext(&self) -> String {
        let mut lines: Vec<String> = self
            .steps
            .iter()
            .map(|step| {
                let (top, rest) = match step.stack.split_last() {
                    Some((top, rest)) => (top.as_str(), rest),
                    None => ("", &[][..]),
                };
                let action = match &step.action {
                    ParseAction::Match { terminal } => format!("match {}", terminal),
                    ParseAction::Expand { production } => format!("expand {}", production),
                };
                format!(
                    "Stack: {}{}({}) / Input: {} => {}",
                    rest.join(" "),
                    if rest.is_empty() { "" } else { " " },
                    top,
                    step.lookahead,
                    action
                )
            })
            .collect();
        lines.push("Parse completed.".to_string());
        lines.join("\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Grammar {
    /// Parses one sentence with the frozen LL(1) table. The grammar is left
    /// untouched, so it can be reused for any number of sentences.
    pub fn parse_sentence(
        &self,
        sentence: &str,
        config: &ParseConfig,
    ) -> Result<ParseOutcome, ParseError> {
        let table = self.table.as_ref().ok_or(ParseError::TableNotBuilt)?;
        let start = self.start_symbol.ok_or(ParseError::TableNotBuilt)?;
        let end = self.symbol_table.end_mark();

        let mut tokens = TokenStream::new(sentence, &self.symbol_table)?;
        let mut stack: Vec<SymbolId> = vec![start];
        let mut outcome = ParseOutcome::default();

        while let Some(&top) = stack.last() {
            let lookahead = tokens.peek();

            if self.is_terminal(top) {
                if top != lookahead.terminal {
                    return Err(ParseError::Mismatch {
                        expected: self.get_symbol_name(top).to_string(),
                        found: self.get_symbol_name(lookahead.terminal).to_string(),
                        position: lookahead.position,
                    });
                }
                self.record(&mut outcome, config, &stack, lookahead, || ParseAction::Match {
                    terminal: self.get_symbol_name(top).to_string(),
                });
                stack.pop();
                if top == end {
                    return Ok(outcome);
                }
                tokens.advance()?;
                outcome.consumed += 1;
            } else {
                let production: &Production = table
                    .get(top, lookahead.terminal)
                    .and_then(|id| self.production(id))
                    .ok_or_else(|| ParseError::NoProduction {
                        non_terminal: self.get_symbol_name(top).to_string(),
                        found: self.get_symbol_name(lookahead.terminal).to_string(),
                        position: lookahead.position,
                    })?;
                self.record(&mut outcome, config, &stack, lookahead, || ParseAction::Expand {
                    production: self.production_to_string(production),
                });
                stack.pop();
                stack.extend(production.right.iter().rev());
                if stack.len() > config.max_stack_depth {
                    return Err(ParseError::StackDepthExceeded {
                        limit: config.max_stack_depth,
                    });
                }
            }
        }

        // Only reachable when the start productions carry no end marker.
        let lookahead = tokens.peek();
        if lookahead.terminal == end {
            Ok(outcome)
        } else {
            Err(ParseError::Mismatch {
                expected: END_MARK.to_string(),
                found: self.get_symbol_name(lookahead.terminal).to_string(),
                position: lookahead.position,
            })
        }
    }

    fn record<F>(
        &self,
        outcome: &mut ParseOutcome,
        config: &ParseConfig,
        stack: &[SymbolId],
        lookahead: Token,
        action: F,
    ) where
        F: FnOnce() -> ParseAction,
    {
        if !config.trace && !log::log_enabled!(log::Level::Trace) {
            return;
        }
        let step = ParseStep {
            stack: stack
                .iter()
                .map(|&idx| self.get_symbol_name(idx).to_string())
                .collect(),
            lookahead: self.get_symbol_name(lookahead.terminal).to_string(),
            action: action(),
        };
        trace!("{:?} / {} => {:?}", step.stack, step.lookahead, step.action);
        if config.trace {
            outcome.steps.push(step);
        }
    }
}
