use log::debug;

use super::{error::GrammarError, ll1_parsing_table::LL1Table, symbol_table::SymbolTable};

pub type SymbolId = usize;
pub type ProductionId = usize;

#[derive(Debug, Clone)]
pub struct NonTerminal {
    pub index: SymbolId,
    pub name: String,
    pub nullable: bool,
}

impl NonTerminal {
    pub fn new(index: SymbolId, name: String) -> Self {
        Self {
            index,
            name,
            nullable: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Symbol {
    NonTerminal(NonTerminal),
    Terminal(String),
}

impl Symbol {
    pub fn non_terminal(&self) -> Option<&NonTerminal> {
        match self {
            Symbol::NonTerminal(e) => Some(e),
            Symbol::Terminal(_) => None,
        }
    }

    pub fn mut_non_terminal(&mut self) -> Option<&mut NonTerminal> {
        match self {
            Symbol::NonTerminal(e) => Some(e),
            Symbol::Terminal(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Symbol::NonTerminal(e) => e.name.as_str(),
            Symbol::Terminal(e) => e.as_str(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    /// Terminals never derive the empty string.
    pub fn nullable(&self) -> bool {
        match self {
            Symbol::NonTerminal(e) => e.nullable,
            Symbol::Terminal(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub index: ProductionId,
    pub left: SymbolId,
    pub right: Vec<SymbolId>,
    pub nullable: bool,
    /// Right-hand symbols not yet known to be nullable; only meaningful while
    /// the nullability fixpoint runs.
    pub(crate) remaining: usize,
}

impl Production {
    pub fn begins_with(&self, prefix: &[SymbolId]) -> bool {
        self.right.starts_with(prefix)
    }

    pub fn symbols_after(&self, index: usize) -> &[SymbolId] {
        &self.right[index.min(self.right.len())..]
    }
}

/// A grammar under construction or, once [`Grammar::build_ll1_table`] has
/// run, frozen for parsing.
///
/// Productions live in an arena indexed by [`ProductionId`]; removing one
/// leaves a tombstone so ids of the remaining ones stay valid.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub symbol_table: SymbolTable,
    pub productions: Vec<Option<Production>>,
    pub start_symbol: Option<SymbolId>,
    pub table: Option<LL1Table>,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar {
    pub fn new() -> Self {
        Self {
            symbol_table: SymbolTable::new(),
            productions: Vec::new(),
            start_symbol: None,
            table: None,
        }
    }

    /// Reads `description` and runs the whole pipeline: left-factoring, end
    /// markers, nullability and the LL(1) table.
    pub fn compile(description: &str) -> Result<Self, GrammarError> {
        let mut g = Self::parse(description)?;
        g.prepare_and_build()?;
        Ok(g)
    }

    /// Same as [`Grammar::compile`] but removes left recursion first.
    pub fn compile_eliminating_left_recursion(description: &str) -> Result<Self, GrammarError> {
        let mut g = Self::parse(description)?;
        g.eliminate_left_recursion();
        g.prepare_and_build()?;
        Ok(g)
    }

    fn prepare_and_build(&mut self) -> Result<(), GrammarError> {
        self.factor_common_prefixes();
        self.add_end_marks();
        self.calculate_nullable();
        self.build_ll1_table()
    }

    pub fn symbols(&self) -> &[Symbol] {
        self.symbol_table.symbols()
    }

    pub fn get_symbol_name(&self, index: SymbolId) -> &str {
        self.symbol_table.name(index)
    }

    pub fn get_symbol_index(&self, name: &str) -> Option<SymbolId> {
        self.symbol_table.find(name)
    }

    pub fn is_terminal(&self, index: SymbolId) -> bool {
        self.symbol_table.get(index).is_terminal()
    }

    pub fn is_nullable(&self, index: SymbolId) -> bool {
        self.symbol_table.get(index).nullable()
    }

    pub fn terminal_iter(&self) -> impl Iterator<Item = (SymbolId, &str)> {
        self.symbols()
            .iter()
            .enumerate()
            .filter_map(|(i, s)| match s {
                Symbol::Terminal(name) => Some((i, name.as_str())),
                Symbol::NonTerminal(_) => None,
            })
    }

    pub fn non_terminal_iter(&self) -> impl Iterator<Item = &NonTerminal> {
        self.symbols().iter().filter_map(|s| s.non_terminal())
    }

    pub fn production(&self, id: ProductionId) -> Option<&Production> {
        self.productions.get(id).and_then(|p| p.as_ref())
    }

    pub fn production_iter(&self) -> impl Iterator<Item = &Production> {
        self.productions.iter().flatten()
    }

    pub fn productions_of(&self, left: SymbolId) -> impl Iterator<Item = &Production> {
        self.production_iter().filter(move |p| p.left == left)
    }

    pub fn num_productions(&self) -> usize {
        self.production_iter().count()
    }

    pub fn add_production(&mut self, left: SymbolId, right: Vec<SymbolId>) -> ProductionId {
        let index = self.productions.len();
        self.productions.push(Some(Production {
            index,
            left,
            remaining: right.len(),
            right,
            nullable: false,
        }));
        index
    }

    pub fn remove_production(&mut self, id: ProductionId) -> Option<Production> {
        self.productions.get_mut(id).and_then(|p| p.take())
    }

    pub(crate) fn production_mut(&mut self, id: ProductionId) -> Option<&mut Production> {
        self.productions.get_mut(id).and_then(|p| p.as_mut())
    }

    /// `S - a B c` style rendering, the same form the description uses.
    pub fn production_to_string(&self, production: &Production) -> String {
        let mut s = format!("{} -", self.get_symbol_name(production.left));
        for &idx in &production.right {
            s.push(' ');
            s.push_str(self.get_symbol_name(idx));
        }
        s
    }

    pub fn production_to_vec_str(&self, production: &[SymbolId]) -> Vec<&str> {
        production
            .iter()
            .map(|idx| self.get_symbol_name(*idx))
            .collect()
    }

    /// Appends the end-of-input marker to every start production that does
    /// not already end with it.
    pub fn add_end_marks(&mut self) {
        let start = match self.start_symbol {
            Some(start) => start,
            None => return,
        };
        let end = self.symbol_table.end_mark();
        for p in self.productions.iter_mut().flatten() {
            if p.left == start && p.right.last() != Some(&end) {
                p.right.push(end);
                p.remaining = p.right.len();
                debug!("appended {} to production {}", super::END_MARK, p.index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> (Grammar, SymbolId, SymbolId) {
        let mut g = Grammar::new();
        let a = g.symbol_table.register_terminal("a").unwrap();
        let s = g.symbol_table.register_non_terminal("S").unwrap();
        g.start_symbol = Some(s);
        (g, a, s)
    }

    #[test]
    fn removal_keeps_other_ids() {
        let (mut g, a, s) = tiny();
        let p0 = g.add_production(s, vec![a]);
        let p1 = g.add_production(s, vec![]);
        let p2 = g.add_production(s, vec![a, a]);
        assert!(g.remove_production(p1).is_some());
        assert!(g.remove_production(p1).is_none());
        assert_eq!(g.production(p0).unwrap().right, vec![a]);
        assert_eq!(g.production(p2).unwrap().right, vec![a, a]);
        assert_eq!(g.num_productions(), 2);
        assert_eq!(g.add_production(s, vec![]), 3);
    }

    #[test]
    fn end_marks_are_added_once() {
        let (mut g, a, s) = tiny();
        let p0 = g.add_production(s, vec![a]);
        let p1 = g.add_production(s, vec![]);
        g.add_end_marks();
        g.add_end_marks();
        let end = g.symbol_table.end_mark();
        assert_eq!(g.production(p0).unwrap().right, vec![a, end]);
        assert_eq!(g.production(p1).unwrap().right, vec![end]);
    }

    #[test]
    fn production_rendering() {
        let (mut g, a, s) = tiny();
        let p = g.add_production(s, vec![a, s]);
        let p = g.production(p).unwrap().clone();
        assert_eq!(g.production_to_string(&p), "S - a S");
        assert_eq!(g.production_to_vec_str(&p.right), vec!["a", "S"]);
    }

    #[test]
    fn terminals_are_never_nullable() {
        let (g, a, s) = tiny();
        assert!(!g.is_nullable(a));
        assert!(g.is_terminal(a));
        assert!(!g.is_terminal(s));
    }
}
