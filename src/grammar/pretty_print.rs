use crowbook_text_processing::escape::tex as escape_tex;
use serde::Serialize;

use super::{
    grammar::{Production, SymbolId},
    nullable_first_follow::TerminalSet,
    Grammar, EPSILON,
};

fn tex_sequence(right: &str) -> String {
    right
        .split(' ')
        .map(|s| match s {
            EPSILON => r"\epsilon".to_string(),
            s => escape_tex(s).to_string(),
        })
        .collect::<Vec<_>>()
        .join(r"\ ")
}

/// The alternatives of one nonterminal, each already spelled out (`ϵ` for
/// an empty right-hand side).
#[derive(Debug, Clone, Serialize)]
pub struct Alternatives<'a> {
    pub left: &'a str,
    pub rights: Vec<String>,
}

impl Alternatives<'_> {
    /// `A -> x | y` on a single line, as used inside table cells.
    pub fn inline(&self) -> String {
        format!("{} -> {}", self.left, self.rights.join(" | "))
    }

    /// One line per alternative, with the arrows aligned at `width`.
    fn lines(&self, width: usize) -> Vec<String> {
        let mut rights = self.rights.iter();
        let mut out = Vec::with_capacity(self.rights.len());
        if let Some(first) = rights.next() {
            out.push(format!("{:>w$} -> {}", self.left, first, w = width));
        }
        out.extend(rights.map(|r| format!("{:>w$}  | {}", "", r, w = width)));
        out
    }

    pub fn inline_latex(&self) -> String {
        let rights: Vec<String> = self.rights.iter().map(|r| tex_sequence(r)).collect();
        format!("{} \\rightarrow {}", escape_tex(self.left), rights.join(" \\mid "))
    }

    fn array_row(&self) -> String {
        let rights: Vec<String> = self.rights.iter().map(|r| tex_sequence(r)).collect();
        format!("{} & \\rightarrow & {}", escape_tex(self.left), rights.join(" \\mid "))
    }
}

/// Every production of the grammar, grouped by left-hand side.
#[derive(Serialize)]
pub struct ProductionListing<'a> {
    groups: Vec<Alternatives<'a>>,
}

impl ProductionListing<'_> {
    pub fn to_plaintext(&self) -> String {
        let width = self.groups.iter().map(|g| g.left.len()).max().unwrap_or(0);
        self.groups
            .iter()
            .flat_map(|g| g.lines(width))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        let mut rows = vec![r"\[\begin{array}{cll}".to_string()];
        rows.extend(self.groups.iter().map(Alternatives::array_row));
        rows.push(r"\end{array}\]".to_string());
        rows.join("\\\\\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Grammar {
    /// Spells out `productions` as alternatives of `left`.
    pub fn alternatives<'a>(
        &'a self,
        left: SymbolId,
        productions: impl Iterator<Item = &'a Production>,
    ) -> Alternatives<'a> {
        let rights = productions
            .map(|p| match p.right.as_slice() {
                [] => EPSILON.to_string(),
                right => self.production_to_vec_str(right).join(" "),
            })
            .collect();
        Alternatives {
            left: self.get_symbol_name(left),
            rights,
        }
    }

    /// Nonterminals without productions are left out.
    pub fn production_listing(&self) -> ProductionListing {
        let groups = self
            .non_terminal_iter()
            .filter(|nt| self.productions_of(nt.index).next().is_some())
            .map(|nt| self.alternatives(nt.index, self.productions_of(nt.index)))
            .collect();
        ProductionListing { groups }
    }
}

#[derive(Serialize)]
struct SetRow<'a> {
    name: &'a str,
    nullable: bool,
    first: Vec<&'a str>,
    follow: Vec<&'a str>,
}

/// Nullable flag, FIRST (with `ϵ` when nullable) and FOLLOW per nonterminal.
#[derive(Serialize)]
pub struct NullableFirstFollow<'a> {
    rows: Vec<SetRow<'a>>,
}

impl NullableFirstFollow<'_> {
    pub fn to_plaintext(&self) -> String {
        let lines: Vec<String> = self
            .rows
            .iter()
            .map(|r| {
                format!(
                    "{} | {} | {} | {}",
                    r.name,
                    r.nullable,
                    r.first.join(", "),
                    r.follow.join(", ")
                )
            })
            .collect();
        lines.join("\n")
    }

    pub fn to_latex(&self) -> String {
        let set = |names: &[&str]| tex_sequence(&names.join(" "));
        let mut out = String::from("\\begin{tabular}{c|c|c|c}\nSymbol & Nullable & First & Follow\\\\\\hline\n");
        for r in &self.rows {
            out += &format!(
                "{} & {} & {} & {}\\\\\n",
                escape_tex(r.name),
                r.nullable,
                set(&r.first),
                set(&r.follow)
            );
        }
        out + "\\end{tabular}"
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Grammar {
    pub fn nullable_first_follow(&self) -> NullableFirstFollow {
        let rows = self
            .non_terminal_iter()
            .map(|nt| {
                let mut first = self.sorted_names(self.first_of(&[nt.index]));
                if nt.nullable {
                    first.push(EPSILON);
                }
                SetRow {
                    name: nt.name.as_str(),
                    nullable: nt.nullable,
                    first,
                    follow: self.sorted_names(self.follow_of(nt.index)),
                }
            })
            .collect();
        NullableFirstFollow { rows }
    }

    fn sorted_names(&self, set: TerminalSet) -> Vec<&str> {
        let mut names: Vec<&str> = set.into_iter().map(|idx| self.get_symbol_name(idx)).collect();
        names.sort();
        names
    }
}
