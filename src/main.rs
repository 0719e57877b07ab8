use std::{fs, io::BufRead, process::ExitCode};

use clap::{Arg, ArgAction, Command};
use log::{error, info};

use ll1_parser_maker::{Grammar, ParseConfig};

#[derive(Clone, Copy)]
enum OutputFormat {
    Plain,
    LaTeX,
    JSON,
}

fn command() -> Command {
    Command::new("ll1-parser-maker")
        .version(clap::crate_version!())
        .about("Builds an LL(1) table from a grammar description and parses sentences with it.")
        .after_help(
            "Grammar description, on one line:\n  {a,b},{S,A,B},S,{S-A B, A-a, A-, B-b, B-}\n\
             $ (end), #i (integer constant) and #f (float constant) need no declaration.\n\
             Every start production gets a trailing $, so a start symbol used on a\n\
             right-hand side only matches once; wrap it as in {..},{P,S,..},P,{P-S,..}.\n\
             Lines after the grammar, in the file or on stdin, are sentences to parse.",
        )
        .arg(
            Arg::new("elf")
                .long("elf")
                .help("Eliminate left recursion before factoring")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("What to print")
                .value_parser(["prod", "nff", "ll1", "parse"])
                .action(ArgAction::Append)
                .default_value("parse"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_parser(["plain", "latex", "json"])
                .default_value("plain"),
        )
        .arg(
            Arg::new("sentence")
                .short('s')
                .long("sentence")
                .help("Sentence to parse; remaining input lines are used when absent")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .help("Largest parse stack allowed")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("trace")
                .long("trace")
                .help("Print every step of each parse")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log each stage of the grammar pipeline")
                .action(ArgAction::SetTrue),
        )
        .arg(Arg::new("grammar").help("File holding the grammar (stdin when absent)"))
}

/// The first non-empty line is the grammar; the other non-empty lines are
/// sentences.
fn split_input(lines: Vec<String>) -> Option<(String, Vec<String>)> {
    let mut lines = lines.into_iter().filter(|l| !l.trim().is_empty());
    let description = lines.next()?;
    Some((description, lines.collect()))
}

fn main() -> ExitCode {
    let matches = command().get_matches();

    let level = if matches.get_flag("verbose") {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let output_format = match matches.get_one::<String>("format").map(String::as_str) {
        Some("latex") => OutputFormat::LaTeX,
        Some("json") => OutputFormat::JSON,
        _ => OutputFormat::Plain,
    };
    let outputs: Vec<&str> = matches
        .get_many::<String>("output")
        .map(|v| v.map(String::as_str).collect())
        .unwrap_or_default();

    let mut config = ParseConfig::default().with_trace(matches.get_flag("trace"));
    if let Some(&depth) = matches.get_one::<usize>("max-depth") {
        config = config.with_max_stack_depth(depth);
    }

    let lines: Vec<String> = match matches.get_one::<String>("grammar") {
        Some(path) => match fs::read_to_string(path) {
            Ok(text) => text.lines().map(String::from).collect(),
            Err(e) => {
                error!("cannot read {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => std::io::stdin().lock().lines().map_while(Result::ok).collect(),
    };

    let (description, input_sentences) = match split_input(lines) {
        Some(split) => split,
        None => {
            eprintln!("no grammar given");
            return ExitCode::FAILURE;
        }
    };

    let compiled = if matches.get_flag("elf") {
        Grammar::compile_eliminating_left_recursion(&description)
    } else {
        Grammar::compile(&description)
    };
    let g = match compiled {
        Ok(g) => g,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("grammar built with {} productions", g.num_productions());

    let mut status = ExitCode::SUCCESS;
    for output in outputs {
        match output {
            "prod" => {
                let t = g.production_listing();
                println!(
                    "{}",
                    match output_format {
                        OutputFormat::Plain => t.to_plaintext(),
                        OutputFormat::LaTeX => t.to_latex(),
                        OutputFormat::JSON => t.to_json(),
                    }
                );
            }
            "nff" => {
                let t = g.nullable_first_follow();
                println!(
                    "{}",
                    match output_format {
                        OutputFormat::Plain => t.to_plaintext(),
                        OutputFormat::LaTeX => t.to_latex(),
                        OutputFormat::JSON => t.to_json(),
                    }
                );
            }
            "ll1" => {
                if let Some(t) = g.generate_ll1_parsing_table() {
                    println!(
                        "{}",
                        match output_format {
                            OutputFormat::Plain => t.to_plaintext(),
                            OutputFormat::LaTeX => t.to_latex(),
                            OutputFormat::JSON => t.to_json(),
                        }
                    );
                }
            }
            "parse" => {
                let sentences: Vec<String> = match matches.get_many::<String>("sentence") {
                    Some(given) => given.cloned().collect(),
                    None => input_sentences.clone(),
                };
                for sentence in sentences {
                    match g.parse_sentence(&sentence, &config) {
                        Ok(outcome) => match output_format {
                            OutputFormat::JSON => println!("{}", outcome.to_json()),
                            _ if config.trace => println!("{}", outcome.to_plaintext()),
                            _ => println!("accepted: {}", sentence),
                        },
                        Err(e) => {
                            println!("rejected: {}", sentence);
                            eprintln!("{}", e);
                            status = ExitCode::FAILURE;
                        }
                    }
                }
            }
            _ => {}
        }
    }
    status
}
