pub mod config;
pub mod driver;
pub mod eliminate_left_recursion;
pub mod error;
pub mod grammar;
pub mod left_factor;
pub mod ll1_parsing_table;
pub mod nullable_first_follow;
pub mod parse;
pub mod pretty_print;
pub mod symbol_table;

pub use config::ParseConfig;
pub use driver::{ParseAction, ParseOutcome, ParseStep};
pub use error::{GrammarError, ParseError};
pub use grammar::{Grammar, NonTerminal, Production, ProductionId, Symbol, SymbolId};
pub use ll1_parsing_table::LL1Table;
pub use symbol_table::SymbolTable;

pub const EPSILON: &str = "ϵ";
pub const END_MARK: &str = "$";
pub const INTEGER_CONST: &str = "#i";
pub const FLOAT_CONST: &str = "#f";

pub const SET_BEGIN: char = '{';
pub const SET_SEPARATOR: char = ',';
pub const SET_END: char = '}';
pub const PRODUCTION_ARROW: char = '-';

pub fn is_meta_char(c: char) -> bool {
    matches!(c, SET_BEGIN | SET_SEPARATOR | SET_END | PRODUCTION_ARROW)
}
