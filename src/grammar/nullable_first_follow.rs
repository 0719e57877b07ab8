use std::collections::BTreeSet;

use log::debug;

use super::{
    grammar::{Production, ProductionId, Symbol, SymbolId},
    Grammar,
};

pub type TerminalSet = BTreeSet<SymbolId>;

impl Grammar {
    /// Marks every nullable production and nonterminal.
    ///
    /// Each production counts its right-hand symbols not yet known to be
    /// nullable; it becomes nullable when the count reaches zero. Newly
    /// nullable nonterminals go on a worklist that is scanned by index, so
    /// entries appended during the scan are still visited.
    pub fn calculate_nullable(&mut self) {
        for p in self.productions.iter_mut().flatten() {
            p.remaining = p.right.len();
            p.nullable = false;
        }

        let ids: Vec<ProductionId> = self.production_iter().map(|p| p.index).collect();
        let mut worklist: Vec<SymbolId> = Vec::new();
        let mut queued = vec![false; self.symbol_table.len()];

        for &id in &ids {
            self.check_for_empty(id, &mut worklist, &mut queued);
        }

        let mut i = 0;
        while i < worklist.len() {
            let nt = worklist[i];
            for &id in &ids {
                let occurrences = match self.production_mut(id) {
                    Some(p) => {
                        let n = p.right.iter().filter(|&&s| s == nt).count();
                        p.remaining = p.remaining.saturating_sub(n);
                        n
                    }
                    None => 0,
                };
                if occurrences > 0 {
                    self.check_for_empty(id, &mut worklist, &mut queued);
                }
            }
            i += 1;
        }

        debug!(
            "nullable: {}",
            self.non_terminal_iter()
                .filter(|nt| nt.nullable)
                .map(|nt| nt.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    fn check_for_empty(
        &mut self,
        id: ProductionId,
        worklist: &mut Vec<SymbolId>,
        queued: &mut [bool],
    ) {
        let left = match self.production_mut(id) {
            Some(p) if p.remaining == 0 && !p.nullable => {
                p.nullable = true;
                p.left
            }
            _ => return,
        };
        if let Some(nt) = self.symbol_table.get_mut(left).mut_non_terminal() {
            nt.nullable = true;
        }
        if !queued[left] {
            queued[left] = true;
            worklist.push(left);
        }
    }

    pub fn all_nullable(&self, sequence: &[SymbolId]) -> bool {
        sequence.iter().all(|&s| self.is_nullable(s))
    }

    /// Terminals that can begin some derivation of `sequence`.
    pub fn first_of(&self, sequence: &[SymbolId]) -> TerminalSet {
        let mut visited = vec![false; self.symbol_table.len()];
        let mut first = TerminalSet::new();
        self.first_into(sequence, &mut visited, &mut first);
        first
    }

    // A nonterminal entered once during a top-level call has all its
    // productions folded into `first` by that entry, so later entries only
    // continue with the tail.
    fn first_into(&self, sequence: &[SymbolId], visited: &mut [bool], first: &mut TerminalSet) {
        let (&head, tail) = match sequence.split_first() {
            Some(split) => split,
            None => return,
        };
        match self.symbol_table.get(head) {
            Symbol::Terminal(_) => {
                first.insert(head);
            }
            Symbol::NonTerminal(nt) => {
                if !visited[head] {
                    visited[head] = true;
                    for p in self.productions_of(head) {
                        self.first_into(&p.right, visited, first);
                    }
                }
                if nt.nullable {
                    self.first_into(tail, visited, first);
                }
            }
        }
    }

    /// Terminals that can immediately follow `non_terminal`.
    pub fn follow_of(&self, non_terminal: SymbolId) -> TerminalSet {
        let mut visited = vec![false; self.symbol_table.len()];
        let mut follow = TerminalSet::new();
        self.follow_into(non_terminal, &mut visited, &mut follow);
        follow
    }

    fn follow_into(&self, non_terminal: SymbolId, visited: &mut [bool], follow: &mut TerminalSet) {
        if visited[non_terminal] {
            return;
        }
        visited[non_terminal] = true;

        for p in self.production_iter() {
            for (i, &s) in p.right.iter().enumerate() {
                if s != non_terminal {
                    continue;
                }
                let tail = p.symbols_after(i + 1);
                follow.extend(self.first_of(tail));
                if self.all_nullable(tail) {
                    self.follow_into(p.left, visited, follow);
                }
            }
        }
    }

    /// Lookahead terminals on which `production` is chosen.
    pub fn predict(&self, production: &Production) -> TerminalSet {
        let mut predicted = self.first_of(&production.right);
        if production.nullable {
            predicted.extend(self.follow_of(production.left));
        }
        predicted
    }
}

#[cfg(test)]
mod tests {
    use crate::Grammar;

    fn names(g: &Grammar, set: &super::TerminalSet) -> Vec<String> {
        let mut v: Vec<String> = set
            .iter()
            .map(|&idx| g.get_symbol_name(idx).to_string())
            .collect();
        v.sort();
        v
    }

    fn nullable(g: &Grammar, name: &str) -> bool {
        g.is_nullable(g.get_symbol_index(name).unwrap())
    }

    #[test]
    fn epsilon_productions_are_nullable() {
        let mut g = Grammar::parse("{a,b},{S,A,B},S,{S-A B, A-a, A-, B-b, B-}").unwrap();
        g.calculate_nullable();
        assert!(nullable(&g, "A"));
        assert!(nullable(&g, "B"));
        assert!(nullable(&g, "S"));
        assert!(g.production_iter().filter(|p| p.nullable).count() == 3);
    }

    #[test]
    fn nullability_propagates_through_chains() {
        let mut g = Grammar::parse("{x},{S,A,B,C,D},S,{S-A x,A-B C,B-C,C-D D,D-}").unwrap();
        g.calculate_nullable();
        for name in ["A", "B", "C", "D"] {
            assert!(nullable(&g, name), "{} should be nullable", name);
        }
        assert!(!nullable(&g, "S"));
    }

    #[test]
    fn repeated_symbol_counts_every_occurrence() {
        let mut g = Grammar::parse("{a},{S,A},S,{S-A A,A-a,A-}").unwrap();
        g.calculate_nullable();
        assert!(nullable(&g, "S"));
    }

    #[test]
    fn recursion_without_base_is_not_nullable() {
        let mut g = Grammar::parse("{a},{S,A},S,{S-A,A-A a,A-S}").unwrap();
        g.calculate_nullable();
        assert!(!nullable(&g, "S"));
        assert!(!nullable(&g, "A"));
    }

    #[test]
    fn first_and_follow_of_expression_grammar() {
        let mut g = Grammar::parse(
            "{+,*,(,)},{S,E,E',T,T',F},S,{S-E,E-T E',E'-+ T E',E'-,T-F T',T'-* F T',T'-,F-( E ),F-#i}",
        )
        .unwrap();
        g.add_end_marks();
        g.calculate_nullable();

        let idx = |n: &str| g.get_symbol_index(n).unwrap();
        assert_eq!(names(&g, &g.first_of(&[idx("E")])), vec!["#i", "("]);
        assert_eq!(names(&g, &g.first_of(&[idx("E'")])), vec!["+"]);
        assert_eq!(names(&g, &g.first_of(&[idx("T'"), idx("E'")])), vec!["*", "+"]);
        assert_eq!(names(&g, &g.follow_of(idx("E"))), vec!["$", ")"]);
        assert_eq!(names(&g, &g.follow_of(idx("T"))), vec!["$", ")", "+"]);
        assert_eq!(names(&g, &g.follow_of(idx("F"))), vec!["$", ")", "*", "+"]);
    }

    #[test]
    fn first_terminates_on_left_recursion() {
        let mut g = Grammar::parse("{+},{S,E},S,{S-E,E-E + #i,E-#i}").unwrap();
        g.calculate_nullable();
        let e = g.get_symbol_index("E").unwrap();
        assert_eq!(names(&g, &g.first_of(&[e])), vec!["#i"]);
        assert_eq!(names(&g, &g.follow_of(e)), vec!["+"]);
    }

    #[test]
    fn visited_nullable_head_still_reaches_tail() {
        let mut g = Grammar::parse("{a,b},{S,A,B},S,{S-A B,A-a,A-,B-A b}").unwrap();
        g.calculate_nullable();
        let s = g.get_symbol_index("S").unwrap();
        assert_eq!(names(&g, &g.first_of(&[s])), vec!["a", "b"]);
    }

    #[test]
    fn predict_adds_follow_for_nullable_productions() {
        let mut g = Grammar::parse("{a,b},{S,A},S,{S-A b,A-a,A-}").unwrap();
        g.calculate_nullable();
        let empty = g.production_iter().find(|p| p.right.is_empty()).unwrap();
        assert_eq!(names(&g, &g.predict(empty)), vec!["b"]);
    }
}
