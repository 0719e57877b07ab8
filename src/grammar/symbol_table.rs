use std::collections::HashMap;

use super::{
    error::GrammarError,
    grammar::{NonTerminal, Symbol, SymbolId},
    END_MARK, FLOAT_CONST, INTEGER_CONST,
};

/// Owner of every symbol of a grammar.
///
/// A symbol's id is its position in `symbols`; ids are handed out densely and
/// never reused, so they double as row/column indices of the parsing table.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    names: HashMap<String, SymbolId>,
    next_fresh: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut t = Self {
            symbols: Vec::new(),
            names: HashMap::new(),
            next_fresh: 0,
        };
        for name in [END_MARK, INTEGER_CONST, FLOAT_CONST] {
            t.push(Symbol::Terminal(name.to_string()));
        }
        t
    }

    fn push(&mut self, symbol: Symbol) -> SymbolId {
        let idx = self.symbols.len();
        self.names.insert(symbol.name().to_string(), idx);
        self.symbols.push(symbol);
        idx
    }

    pub fn register_terminal(&mut self, name: &str) -> Result<SymbolId, GrammarError> {
        if self.names.contains_key(name) {
            return Err(GrammarError::Redeclaration {
                name: name.to_string(),
            });
        }
        Ok(self.push(Symbol::Terminal(name.to_string())))
    }

    pub fn register_non_terminal(&mut self, name: &str) -> Result<SymbolId, GrammarError> {
        if self.names.contains_key(name) {
            return Err(GrammarError::Redeclaration {
                name: name.to_string(),
            });
        }
        let idx = self.symbols.len();
        Ok(self.push(Symbol::NonTerminal(NonTerminal::new(idx, name.to_string()))))
    }

    /// Registers a nonterminal named `NT<n>` for the smallest unused `n` at or
    /// after the last one handed out.
    pub fn fresh_non_terminal(&mut self) -> SymbolId {
        let name = loop {
            let name = format!("NT{}", self.next_fresh);
            self.next_fresh += 1;
            if !self.names.contains_key(&name) {
                break name;
            }
        };
        let idx = self.symbols.len();
        self.push(Symbol::NonTerminal(NonTerminal::new(idx, name)))
    }

    /// Registers `base'` (or `base''`, ...) as a new nonterminal.
    pub fn prime_non_terminal(&mut self, base: &str) -> SymbolId {
        let mut name = base.to_string();
        while self.names.contains_key(&name) {
            name.push('\'');
        }
        let idx = self.symbols.len();
        self.push(Symbol::NonTerminal(NonTerminal::new(idx, name)))
    }

    pub fn find(&self, name: &str) -> Option<SymbolId> {
        self.names.get(name).cloned()
    }

    pub fn find_terminal(&self, name: &str) -> Option<SymbolId> {
        self.find(name).filter(|&idx| self.symbols[idx].is_terminal())
    }

    pub fn get(&self, idx: SymbolId) -> &Symbol {
        &self.symbols[idx]
    }

    pub fn get_mut(&mut self, idx: SymbolId) -> &mut Symbol {
        &mut self.symbols[idx]
    }

    pub fn name(&self, idx: SymbolId) -> &str {
        self.symbols[idx].name()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn end_mark(&self) -> SymbolId {
        self.names[END_MARK]
    }

    pub fn integer_const(&self) -> SymbolId {
        self.names[INTEGER_CONST]
    }

    pub fn float_const(&self) -> SymbolId {
        self.names[FLOAT_CONST]
    }
}
