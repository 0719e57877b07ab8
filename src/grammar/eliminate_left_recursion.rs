use log::debug;

use super::{
    grammar::{ProductionId, SymbolId},
    Grammar,
};

impl Grammar {
    /// Removes immediate and indirect left recursion.
    ///
    /// Nonterminals are ordered by id. For each `A_i`, productions starting
    /// with an earlier `A_j` are expanded with `A_j`'s productions, then
    /// `A_i -> A_i α | β` becomes `A_i -> β A_i'` and `A_i' -> α A_i' | ε`.
    /// Cycles such as `A -> A` are dropped.
    pub fn eliminate_left_recursion(&mut self) {
        let non_terminals: Vec<SymbolId> = self.non_terminal_iter().map(|nt| nt.index).collect();

        for (i, &nt) in non_terminals.iter().enumerate() {
            for &earlier in &non_terminals[..i] {
                let leading: Vec<ProductionId> = self
                    .productions_of(nt)
                    .filter(|p| p.right.first() == Some(&earlier))
                    .map(|p| p.index)
                    .collect();
                for id in leading {
                    let removed = match self.remove_production(id) {
                        Some(p) => p,
                        None => continue,
                    };
                    let prefixes: Vec<Vec<SymbolId>> =
                        self.productions_of(earlier).map(|p| p.right.clone()).collect();
                    for prefix in prefixes {
                        let right = prefix
                            .into_iter()
                            .chain(removed.symbols_after(1).iter().cloned())
                            .collect();
                        self.add_production(nt, right);
                    }
                }
            }

            let recursive: Vec<ProductionId> = self
                .productions_of(nt)
                .filter(|p| p.right.first() == Some(&nt))
                .map(|p| p.index)
                .collect();
            if recursive.is_empty() {
                continue;
            }

            let base = self.get_symbol_name(nt).to_string();
            let prime = self.symbol_table.prime_non_terminal(&base);

            let others: Vec<ProductionId> = self.productions_of(nt).map(|p| p.index).collect();
            for id in others {
                if recursive.contains(&id) {
                    continue;
                }
                if let Some(p) = self.production_mut(id) {
                    p.right.push(prime);
                    p.remaining = p.right.len();
                }
            }
            for id in recursive {
                if let Some(p) = self.remove_production(id) {
                    if p.right.len() == 1 {
                        continue;
                    }
                    let mut right = p.symbols_after(1).to_vec();
                    right.push(prime);
                    self.add_production(prime, right);
                }
            }
            self.add_production(prime, Vec::new());

            debug!(
                "removed left recursion of {} through {}",
                base,
                self.get_symbol_name(prime)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{grammar::ParseConfig, Grammar};

    fn rights_of(g: &Grammar, name: &str) -> Vec<String> {
        let idx = g.get_symbol_index(name).unwrap();
        let mut v: Vec<String> = g
            .productions_of(idx)
            .map(|p| g.production_to_vec_str(&p.right).join(" "))
            .collect();
        v.sort();
        v
    }

    #[test]
    fn immediate_recursion() {
        let mut g = Grammar::parse("{+,*},{S,E,T},S,{S - E,E - E + T,E - T,T - T * #i,T - #i}").unwrap();
        g.eliminate_left_recursion();
        assert_eq!(rights_of(&g, "E"), vec!["T E'"]);
        assert_eq!(rights_of(&g, "E'"), vec!["", "+ T E'"]);
        assert_eq!(rights_of(&g, "T"), vec!["#i T'"]);
        assert_eq!(rights_of(&g, "T'"), vec!["", "* #i T'"]);
    }

    #[test]
    fn indirect_recursion() {
        let mut g = Grammar::parse("{a,b},{S,A},S,{S-A a,S-b,A-S b,A-a}").unwrap();
        g.eliminate_left_recursion();
        assert_eq!(rights_of(&g, "S"), vec!["A a", "b"]);
        assert_eq!(rights_of(&g, "A"), vec!["a A'", "b b A'"]);
        assert_eq!(rights_of(&g, "A'"), vec!["", "a b A'"]);
    }

    #[test]
    fn rewritten_grammar_is_ll1() {
        let g = Grammar::compile_eliminating_left_recursion(
            "{+,*},{S,E,T},S,{S - E,E - E + T,E - T,T - T * #i,T - #i}",
        )
        .unwrap();
        let config = ParseConfig::default();
        assert!(g.parse_sentence("1 + 2 * 3", &config).is_ok());
        assert!(g.parse_sentence("1 +", &config).is_err());
    }
}
