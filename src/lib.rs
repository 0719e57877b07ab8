extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

pub mod grammar;
pub use grammar::{Grammar, GrammarError, ParseConfig, ParseError};

fn error_to_json(e: impl std::fmt::Display) -> String {
    serde_json::json!({ "error": e.to_string() }).to_string()
}

fn table_to_json(g: &Grammar) -> String {
    match g.generate_ll1_parsing_table() {
        Some(t) => t.to_json(),
        None => error_to_json("no LL(1) table was built"),
    }
}

#[wasm_bindgen]
pub fn ll1_table_to_json(grammar: &str) -> String {
    match crate::Grammar::compile(grammar) {
        Ok(g) => table_to_json(&g),
        Err(e) => error_to_json(e),
    }
}

#[wasm_bindgen]
pub fn parse_to_json(grammar: &str, sentence: &str) -> String {
    let g = match crate::Grammar::compile(grammar) {
        Ok(g) => g,
        Err(e) => return error_to_json(e),
    };
    match g.parse_sentence(sentence, &ParseConfig::default().with_trace(true)) {
        Ok(outcome) => outcome.to_json(),
        Err(e) => error_to_json(e),
    }
}

#[cfg(test)]
mod parse_tests {
    use crate::grammar::{error::Found, GrammarError, END_MARK, FLOAT_CONST, INTEGER_CONST};

    #[test]
    fn simple_parse() {
        let g = crate::Grammar::parse("{a},{S},S,{S-a}").unwrap();

        let s = g.get_symbol_index("S").unwrap();
        let a = g.get_symbol_index("a").unwrap();

        assert_eq!(g.get_symbol_name(s), "S");
        assert_eq!(g.get_symbol_name(a), "a");
        assert_eq!(g.start_symbol, Some(s));

        let productions: Vec<_> = g.productions_of(s).collect();
        assert_eq!(productions.len(), 1);
        assert_eq!(productions[0].right, vec![a]);
    }

    #[test]
    fn builtin_terminals_need_no_declaration() {
        let g = crate::Grammar::parse("{},{S},S,{S-#i #f $}").unwrap();
        let s = g.get_symbol_index("S").unwrap();
        let right = g.production_to_vec_str(&g.productions_of(s).next().unwrap().right);
        assert_eq!(right, vec![INTEGER_CONST, FLOAT_CONST, END_MARK]);
    }

    #[test]
    fn simple_parse_with_space() {
        let g = crate::Grammar::parse("  { a , b } , { S } ,  S , { S - a b ,S- } ").unwrap();

        let s = g.get_symbol_index("S").unwrap();
        let a = g.get_symbol_index("a").unwrap();
        let b = g.get_symbol_index("b").unwrap();

        let rights: Vec<_> = g.productions_of(s).map(|p| p.right.clone()).collect();
        assert_eq!(rights, vec![vec![a, b], vec![]]);
    }

    #[test]
    fn empty_sets_parse() {
        let g = crate::Grammar::parse("{},{S},S,{}").unwrap();
        assert_eq!(g.num_productions(), 0);
    }

    #[test]
    fn order_of_productions_is_kept() {
        let g = crate::Grammar::parse("{a,b},{S,A,B},S,{S-A B, A-a, A-, B-b, B-}").unwrap();
        let text: Vec<String> = g.production_iter().map(|p| g.production_to_string(p)).collect();
        assert_eq!(text, vec!["S - A B", "A - a", "A -", "B - b", "B -"]);
    }

    #[test]
    fn redeclared_symbol() {
        assert_eq!(
            crate::Grammar::parse("{a,b},{S,a},S,{S-a}").unwrap_err(),
            GrammarError::Redeclaration {
                name: "a".to_string()
            }
        );
        assert!(matches!(
            crate::Grammar::parse("{$},{S},S,{S-a}"),
            Err(GrammarError::Redeclaration { .. })
        ));
    }

    #[test]
    fn undeclared_right_side_symbol() {
        let e = crate::Grammar::parse("{a},{S},S,{S-a c}").unwrap_err();
        assert_eq!(e.to_string(), "Symbol c undeclared");
    }

    #[test]
    fn undeclared_start_symbol() {
        assert_eq!(
            crate::Grammar::parse("{a},{S},X,{S-a}").unwrap_err(),
            GrammarError::UnknownNonTerminal {
                name: "X".to_string()
            }
        );
        assert_eq!(
            crate::Grammar::parse("{a},{S},a,{S-a}").unwrap_err(),
            GrammarError::NotANonTerminal {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn undeclared_left_side() {
        let e = crate::Grammar::parse("{a},{S},S,{S-a,B-a}").unwrap_err();
        assert_eq!(e.to_string(), "B is an unknown non-terminal");
    }

    #[test]
    fn terminal_on_left_side() {
        assert_eq!(
            crate::Grammar::parse("{a},{S},S,{a-S}").unwrap_err(),
            GrammarError::NotANonTerminal {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn missing_arrow() {
        assert_eq!(
            crate::Grammar::parse("{a},{S},S,{S a}").unwrap_err(),
            GrammarError::MissingDelimiter {
                position: 13,
                expected: "-".to_string(),
                found: Found(Some('a')),
            }
        );
    }

    #[test]
    fn premature_end() {
        let e = crate::Grammar::parse("{a},{S},S,{S-a").unwrap_err();
        assert!(e.is_description_syntax());
        assert_eq!(e.to_string(), "Expected , or } at 14 instead of end");

        let e = crate::Grammar::parse("{a},{S}").unwrap_err();
        assert_eq!(e.to_string(), "Expected , at 7 instead of end");
    }

    #[test]
    fn illegal_atoms() {
        assert_eq!(
            crate::Grammar::parse("{a,,b},{S},S,{}").unwrap_err(),
            GrammarError::IllegalSymbol {
                position: 3,
                found: ','
            }
        );
        assert!(matches!(
            crate::Grammar::parse("{a},{S},S,{S-a - b}"),
            Err(GrammarError::IllegalSymbol { found: '-', .. })
        ));
        assert!(matches!(
            crate::Grammar::parse("{a},{S},{S-a}"),
            Err(GrammarError::MissingStartSymbol { .. })
        ));
    }

    #[test]
    fn missing_set_begin() {
        assert_eq!(
            crate::Grammar::parse("a},{S},S,{}").unwrap_err(),
            GrammarError::MissingDelimiter {
                position: 0,
                expected: "{".to_string(),
                found: Found(Some('a')),
            }
        );
    }

    #[test]
    fn trailing_text() {
        assert!(crate::Grammar::parse("{a},{S},S,{S-a} x").unwrap_err().is_description_syntax());
    }
}

#[cfg(test)]
mod wasm_surface_tests {
    #[test]
    fn table_json() {
        let json: serde_json::Value =
            serde_json::from_str(&crate::ll1_table_to_json("{a,b},{S,A},S,{S-a A,A-b,A-}")).unwrap();
        assert!(json.get("rows").is_some());
    }

    #[test]
    fn errors_become_json() {
        let json: serde_json::Value =
            serde_json::from_str(&crate::ll1_table_to_json("{a},{S,A,B},S,{S-A,S-B,A-a,B-a}")).unwrap();
        assert!(json["error"].as_str().unwrap().starts_with("Ambiguous action on S/a"));

        let json: serde_json::Value =
            serde_json::from_str(&crate::parse_to_json("{a},{S},S,{S-a}", "a a")).unwrap();
        assert_eq!(json["error"], "Syntax error: Expected $, found a");
    }

    #[test]
    fn unbuilt_table_is_a_plain_error() {
        let g = crate::Grammar::parse("{a},{S},S,{S-a}").unwrap();
        let json: serde_json::Value = serde_json::from_str(&crate::table_to_json(&g)).unwrap();
        assert_eq!(json["error"], "no LL(1) table was built");
    }

    #[test]
    fn parse_json_has_trace() {
        let json: serde_json::Value =
            serde_json::from_str(&crate::parse_to_json("{a},{S},S,{S-a}", "a")).unwrap();
        assert_eq!(json["consumed"], 1);
        assert_eq!(json["steps"][0]["action"]["kind"], "expand");
    }
}
