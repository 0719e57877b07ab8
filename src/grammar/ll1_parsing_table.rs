use crowbook_text_processing::escape::tex as escape_tex;
use log::debug;
use serde::Serialize;

use crate::Grammar;

use super::{
    error::GrammarError,
    grammar::{Production, ProductionId, SymbolId},
    pretty_print::Alternatives,
};

/// The frozen LL(1) table: `(nonterminal, lookahead terminal) -> production`.
///
/// Rows are addressed by symbol id and span every symbol; terminal rows stay
/// empty. Columns are the terminals in registration order.
#[derive(Debug, Clone)]
pub struct LL1Table {
    terminals: Vec<SymbolId>,
    columns: Vec<Option<usize>>,
    cells: Vec<Vec<Option<ProductionId>>>,
}

impl LL1Table {
    fn new(g: &Grammar) -> Self {
        let terminals: Vec<SymbolId> = g.terminal_iter().map(|(idx, _)| idx).collect();
        let mut columns = vec![None; g.symbol_table.len()];
        for (col, &idx) in terminals.iter().enumerate() {
            columns[idx] = Some(col);
        }
        Self {
            cells: vec![vec![None; terminals.len()]; g.symbol_table.len()],
            terminals,
            columns,
        }
    }

    pub fn get(&self, non_terminal: SymbolId, terminal: SymbolId) -> Option<ProductionId> {
        let col = (*self.columns.get(terminal)?)?;
        self.cells.get(non_terminal)?[col]
    }

    fn cell_mut(
        &mut self,
        non_terminal: SymbolId,
        terminal: SymbolId,
    ) -> Option<&mut Option<ProductionId>> {
        let col = (*self.columns.get(terminal)?)?;
        self.cells.get_mut(non_terminal)?.get_mut(col)
    }

    pub fn terminals(&self) -> &[SymbolId] {
        &self.terminals
    }

    pub fn num_rows(&self) -> usize {
        self.cells.len()
    }

    /// Occupied cells of one row, in column order.
    pub fn row(&self, non_terminal: SymbolId) -> impl Iterator<Item = (SymbolId, ProductionId)> + '_ {
        self.terminals
            .iter()
            .zip(self.cells[non_terminal].iter())
            .filter_map(|(&t, cell)| cell.map(|p| (t, p)))
    }
}

impl Grammar {
    /// Fills the LL(1) table from the predict set of every production and
    /// freezes it into the grammar. Fails on the first cell claimed by two
    /// different productions.
    pub fn build_ll1_table(&mut self) -> Result<(), GrammarError> {
        let mut table = LL1Table::new(self);

        let non_terminals: Vec<SymbolId> = self.non_terminal_iter().map(|nt| nt.index).collect();
        for nt in non_terminals {
            for production in self.productions_of(nt) {
                let predicted = self.predict(production);
                debug!(
                    "predict({}) = {{{}}}",
                    self.production_to_string(production),
                    self.production_to_vec_str(&predicted.iter().cloned().collect::<Vec<_>>())
                        .join(", ")
                );
                for t in predicted {
                    if let Some(cell) = table.cell_mut(nt, t) {
                        match *cell {
                            Some(existing) if existing != production.index => {
                                return Err(self.ambiguity(existing, production, t));
                            }
                            _ => *cell = Some(production.index),
                        }
                    }
                }
            }
        }

        self.table = Some(table);
        if log::log_enabled!(log::Level::Debug) {
            if let Some(t) = self.generate_ll1_parsing_table() {
                debug!("LL(1) table:\n{}", t.to_plaintext());
            }
        }
        Ok(())
    }

    fn ambiguity(&self, existing: ProductionId, conflicting: &Production, terminal: SymbolId) -> GrammarError {
        GrammarError::Ambiguous {
            left: self.get_symbol_name(conflicting.left).to_string(),
            terminal: self.get_symbol_name(terminal).to_string(),
            existing: self
                .production(existing)
                .map(|p| self.production_to_string(p))
                .unwrap_or_default(),
            conflicting: self.production_to_string(conflicting),
        }
    }

    /// The production the frozen table chooses for `non_terminal` on
    /// `lookahead`.
    pub fn table_entry(&self, non_terminal: SymbolId, lookahead: SymbolId) -> Option<&Production> {
        let id = self.table.as_ref()?.get(non_terminal, lookahead)?;
        self.production(id)
    }

    pub fn generate_ll1_parsing_table(&self) -> Option<LL1ParsingTable> {
        let table = self.table.as_ref()?;
        let terminals: Vec<&str> = table
            .terminals()
            .iter()
            .map(|&idx| self.get_symbol_name(idx))
            .collect();

        let rows = self
            .non_terminal_iter()
            .map(|nt| {
                let row = table
                    .terminals()
                    .iter()
                    .map(|&t| {
                        table
                            .get(nt.index, t)
                            .and_then(|id| self.production(id))
                            .map(|p| self.alternatives(p.left, std::iter::once(p)))
                    })
                    .collect();
                (nt.name.as_str(), row)
            })
            .collect();

        Some(LL1ParsingTable { terminals, rows })
    }
}

#[derive(Serialize)]
pub struct LL1ParsingTable<'a> {
    terminals: Vec<&'a str>,
    rows: Vec<(&'a str, Vec<Option<Alternatives<'a>>>)>,
}

impl LL1ParsingTable<'_> {
    pub fn to_plaintext(&self) -> String {
        let mut header: Vec<String> = vec![String::new()];
        header.extend(self.terminals.iter().map(|&t| t.to_string()));
        let mut output: Vec<Vec<String>> = vec![header];
        for (left, row) in &self.rows {
            let mut line: Vec<String> = vec![left.to_string()];
            line.extend(row.iter().map(|cell| match cell {
                Some(production) => production.inline(),
                None => String::new(),
            }));
            output.push(line);
        }

        let width: Vec<usize> = (0..output[0].len())
            .map(|j| output.iter().map(|line| line[j].len()).max().unwrap_or(0))
            .collect();
        output
            .iter()
            .map(|line| {
                line.iter()
                    .enumerate()
                    .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.terminals.len()),
        )];
        header.extend(
            self.terminals
                .iter()
                .map(|&t| format!("\\text{{{}}}", escape_tex(t))),
        );
        let header = header.join(" & ");

        let output = self
            .rows
            .iter()
            .map(|(left, row)| {
                std::iter::once(escape_tex(*left).to_string())
                    .chain(row.iter().map(|cell| match cell {
                        Some(production) => production.inline_latex(),
                        None => String::new(),
                    }))
                    .collect::<Vec<_>>()
                    .join(" & ")
            })
            .collect::<Vec<_>>()
            .join("\\\\\n");

        header + "\\\\\\hline\n" + &output + "\n\\end{array}\\]"
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
