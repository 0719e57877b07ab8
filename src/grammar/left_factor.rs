use log::debug;

use super::{
    grammar::{ProductionId, SymbolId},
    Grammar,
};

impl Grammar {
    /// The longest right-hand prefix shared by at least two productions of
    /// `left`. Right-hand sides are compared by symbol id, so sorting them
    /// puts every pair with the longest shared prefix next to each other.
    pub fn longest_common_prefix(&self, left: SymbolId) -> Vec<SymbolId> {
        let mut rights: Vec<&Vec<SymbolId>> = self.productions_of(left).map(|p| &p.right).collect();
        rights.sort();

        let mut longest: &[SymbolId] = &[];
        for pair in rights.windows(2) {
            let len = pair[0]
                .iter()
                .zip(pair[1].iter())
                .take_while(|(a, b)| a == b)
                .count();
            if len > longest.len() {
                longest = &pair[0][..len];
            }
        }
        longest.to_vec()
    }

    /// Left-factors every nonterminal, including the ones this creates.
    pub fn factor_common_prefixes(&mut self) {
        let mut i = 0;
        while i < self.symbol_table.len() {
            if !self.is_terminal(i) {
                let mut prefix = self.longest_common_prefix(i);
                while !prefix.is_empty() {
                    self.factor_prefix(i, &prefix);
                    prefix = self.longest_common_prefix(i);
                }
            }
            i += 1;
        }
    }

    /// Rewrites every `left -> prefix β` into `left -> prefix V` plus
    /// `V -> β`, returning the new nonterminal `V`.
    ///
    /// The productions to move are collected before `left -> prefix V` is
    /// added, so the factoring production itself is never moved under `V`.
    fn factor_prefix(&mut self, left: SymbolId, prefix: &[SymbolId]) -> SymbolId {
        let matching: Vec<ProductionId> = self
            .productions_of(left)
            .filter(|p| p.begins_with(prefix))
            .map(|p| p.index)
            .collect();

        let v = self.symbol_table.fresh_non_terminal();
        let mut right = prefix.to_vec();
        right.push(v);
        self.add_production(left, right);

        for id in matching {
            if let Some(p) = self.remove_production(id) {
                self.add_production(v, p.symbols_after(prefix.len()).to_vec());
            }
        }

        debug!(
            "factored {} out of {} into {}",
            self.production_to_vec_str(prefix).join(" "),
            self.get_symbol_name(left),
            self.get_symbol_name(v)
        );
        v
    }
}

#[cfg(test)]
mod tests {
    use crate::Grammar;

    fn rights_of(g: &Grammar, name: &str) -> Vec<Vec<String>> {
        let idx = g.get_symbol_index(name).unwrap();
        let mut rights: Vec<Vec<String>> = g
            .productions_of(idx)
            .map(|p| {
                g.production_to_vec_str(&p.right)
                    .into_iter()
                    .map(String::from)
                    .collect()
            })
            .collect();
        rights.sort();
        rights
    }

    #[test]
    fn longest_prefix_is_found() {
        let g = Grammar::parse("{a,b,c,d},{S},S,{S-a b c,S-a b d,S-a c,S-d}").unwrap();
        let s = g.get_symbol_index("S").unwrap();
        assert_eq!(g.production_to_vec_str(&g.longest_common_prefix(s)), vec!["a", "b"]);
    }

    #[test]
    fn no_prefix_with_single_production() {
        let g = Grammar::parse("{a},{S},S,{S-a a}").unwrap();
        let s = g.get_symbol_index("S").unwrap();
        assert!(g.longest_common_prefix(s).is_empty());
    }

    #[test]
    fn nested_prefixes_are_factored() {
        let mut g = Grammar::parse("{a,b,c,d},{S},S,{S-a b c,S-a b d,S-a c,S-d}").unwrap();
        g.factor_common_prefixes();

        assert_eq!(rights_of(&g, "S"), vec![vec!["a", "NT1"], vec!["d"]]);
        assert_eq!(rights_of(&g, "NT1"), vec![vec!["b", "NT0"], vec!["c"]]);
        assert_eq!(rights_of(&g, "NT0"), vec![vec!["c"], vec!["d"]]);
    }

    #[test]
    fn whole_production_as_prefix_leaves_epsilon() {
        let mut g = Grammar::parse("{a,b},{S},S,{S-a,S-a b}").unwrap();
        g.factor_common_prefixes();
        assert_eq!(rights_of(&g, "S"), vec![vec!["a", "NT0"]]);
        assert_eq!(rights_of(&g, "NT0"), vec![vec![], vec!["b"]]);
    }

    // The freshly added `A -> α V` must not itself be moved under `V`,
    // which would leave `V -> V` and drop `A` altogether.
    #[test]
    fn factoring_production_is_not_collapsed() {
        let mut g = Grammar::parse("{x,y,z},{A},A,{A-x y,A-x z}").unwrap();
        g.factor_common_prefixes();

        let a = g.get_symbol_index("A").unwrap();
        let v = g.get_symbol_index("NT0").unwrap();
        let x = g.get_symbol_index("x").unwrap();
        let from_a: Vec<_> = g.productions_of(a).collect();
        assert_eq!(from_a.len(), 1);
        assert_eq!(from_a[0].right, vec![x, v]);
        assert!(g.productions_of(v).all(|p| p.right.first() != Some(&v)));
        assert_eq!(g.productions_of(v).count(), 2);
    }
}
