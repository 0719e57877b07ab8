use log::debug;

use super::{
    error::{Found, GrammarError},
    grammar::SymbolId,
    is_meta_char, Grammar, PRODUCTION_ARROW, SET_BEGIN, SET_END, SET_SEPARATOR,
};

/// Character cursor over a grammar description. Positions are char offsets.
struct Reader {
    chars: Vec<char>,
    index: usize,
}

impl Reader {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            index: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).cloned()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().map_or(false, |c| c.is_whitespace()) {
            self.index += 1;
        }
    }

    fn missing(&self, expected: &str) -> GrammarError {
        GrammarError::MissingDelimiter {
            position: self.index,
            expected: expected.to_string(),
            found: Found(self.peek()),
        }
    }

    fn expect(&mut self, c: char) -> Result<(), GrammarError> {
        self.skip_whitespace();
        if self.peek() != Some(c) {
            return Err(self.missing(&c.to_string()));
        }
        self.index += 1;
        Ok(())
    }

    /// Reads one name: a run of characters that are neither whitespace nor
    /// metacharacters. The caller has already skipped leading whitespace.
    fn atom(&mut self, expected_after: &str) -> Result<String, GrammarError> {
        match self.peek() {
            None => return Err(self.missing(expected_after)),
            Some(c) if is_meta_char(c) => {
                return Err(GrammarError::IllegalSymbol {
                    position: self.index,
                    found: c,
                })
            }
            Some(_) => {}
        }
        let begin = self.index;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || is_meta_char(c) {
                break;
            }
            self.index += 1;
        }
        Ok(self.chars[begin..self.index].iter().collect())
    }

    /// Reads `{name, name, ...}`, handing every name to `register` as soon as
    /// it is scanned.
    fn name_set<F>(&mut self, mut register: F) -> Result<(), GrammarError>
    where
        F: FnMut(&str) -> Result<SymbolId, GrammarError>,
    {
        self.expect(SET_BEGIN)?;
        self.skip_whitespace();
        if self.peek() == Some(SET_END) {
            self.index += 1;
            return Ok(());
        }
        loop {
            self.skip_whitespace();
            let name = self.atom("}")?;
            register(&name)?;
            self.skip_whitespace();
            match self.peek() {
                Some(SET_SEPARATOR) => self.index += 1,
                Some(SET_END) => {
                    self.index += 1;
                    return Ok(());
                }
                _ => return Err(self.missing(", or }")),
            }
        }
    }
}

impl Grammar {
    /// Builds the raw symbol/production graph from a description such as
    /// `{a,b},{S,A},S,{S-a A,A-b,A-}`. No analysis happens here.
    pub fn parse(description: &str) -> Result<Self, GrammarError> {
        let mut g = Self::new();
        let mut r = Reader::new(description);

        r.name_set(|name| g.symbol_table.register_terminal(name))?;
        r.expect(SET_SEPARATOR)?;
        r.name_set(|name| g.symbol_table.register_non_terminal(name))?;

        r.expect(SET_SEPARATOR)?;
        r.skip_whitespace();
        let position = r.index;
        let start = match r.peek() {
            Some(c) if !is_meta_char(c) => r.atom("start symbol")?,
            found => {
                return Err(GrammarError::MissingStartSymbol {
                    position,
                    found: Found(found),
                })
            }
        };
        g.start_symbol = Some(g.resolve_non_terminal(&start)?);

        r.expect(SET_SEPARATOR)?;
        r.expect(SET_BEGIN)?;
        r.skip_whitespace();
        if r.peek() == Some(SET_END) {
            r.index += 1;
        } else {
            loop {
                r.skip_whitespace();
                let left = r.atom("}")?;
                let left = g.resolve_non_terminal(&left)?;
                r.expect(PRODUCTION_ARROW)?;

                let mut right: Vec<SymbolId> = Vec::new();
                let terminator = loop {
                    r.skip_whitespace();
                    match r.peek() {
                        Some(c @ SET_SEPARATOR) | Some(c @ SET_END) => {
                            r.index += 1;
                            break c;
                        }
                        None => return Err(r.missing(", or }")),
                        Some(_) => {
                            let name = r.atom(", or }")?;
                            let idx = g.get_symbol_index(&name).ok_or(
                                GrammarError::UndeclaredSymbol { name },
                            )?;
                            right.push(idx);
                        }
                    }
                };
                g.add_production(left, right);

                if terminator == SET_END {
                    break;
                }
            }
        }

        r.skip_whitespace();
        if let Some(c) = r.peek() {
            return Err(GrammarError::IllegalSymbol {
                position: r.index,
                found: c,
            });
        }

        debug!(
            "read {} symbols and {} productions",
            g.symbol_table.len(),
            g.num_productions()
        );
        for p in g.production_iter() {
            debug!("  p{}: {}", p.index, g.production_to_string(p));
        }
        Ok(g)
    }

    fn resolve_non_terminal(&self, name: &str) -> Result<SymbolId, GrammarError> {
        let idx = self
            .get_symbol_index(name)
            .ok_or_else(|| GrammarError::UnknownNonTerminal {
                name: name.to_string(),
            })?;
        if self.is_terminal(idx) {
            return Err(GrammarError::NotANonTerminal {
                name: name.to_string(),
            });
        }
        Ok(idx)
    }
}
