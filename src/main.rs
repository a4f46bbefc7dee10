use clap::{Arg, ArgAction, Command};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use apitest::formatting::{self, Identity, Terminal};
use apitest::parsing;
use apitest::problem::{concise_loading_error, concise_parsing_error, full_parsing_error};

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("apitest")
        .version(VERSION)
        .propagate_version(true)
        .author("Andrew Cowie")
        .about("Declarative HTTP and datastore integration tests.")
        .disable_help_subcommand(true)
        .subcommand(
            Command::new("check")
                .about("Syntax check the given test documents")
                .arg(
                    Arg::new("concise")
                        .short('q')
                        .long("concise")
                        .action(ArgAction::SetTrue)
                        .help("Report each problem on a single line."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .num_args(1..)
                        .help("The files containing the test documents you want to check."),
                ),
        )
        .subcommand(
            Command::new("format")
                .about("Code format the given test document")
                .arg(
                    Arg::new("raw-control-chars")
                        .short('R')
                        .long("raw-control-chars")
                        .action(ArgAction::SetTrue)
                        .help("Emit ANSI escape codes for syntax highlighting even if output is redirected to a pipe or file."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The file containing the test document you want to format."),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("check", submatches)) => {
            let concise = submatches.get_flag("concise");
            let mut failures = 0;

            for filename in submatches
                .get_many::<String>("filename")
                .into_iter()
                .flatten()
            {
                let filename = Path::new(filename);
                debug!(?filename);

                let content = match parsing::load(filename) {
                    Ok(content) => content,
                    Err(error) => {
                        eprintln!("{}", concise_loading_error(&error));
                        failures += 1;
                        continue;
                    }
                };

                match parsing::parse(&content) {
                    Ok(test) => {
                        println!(
                            "{}: {} ({} case{})",
                            "ok".bright_green(),
                            filename.display(),
                            test.cases
                                .len(),
                            if test.cases.len() == 1 { "" } else { "s" }
                        );
                    }
                    Err(error) => {
                        if concise {
                            eprintln!("{}", concise_parsing_error(&error, filename, &Terminal));
                        } else {
                            eprintln!(
                                "{}\n",
                                full_parsing_error(&error, filename, &content, &Terminal)
                            );
                        }
                        failures += 1;
                    }
                }
            }

            if failures > 0 {
                std::process::exit(1);
            }
        }
        Some(("format", submatches)) => {
            let raw = submatches.get_flag("raw-control-chars");
            let filename = match submatches.get_one::<String>("filename") {
                Some(filename) => Path::new(filename),
                None => std::process::exit(2),
            };
            debug!(?filename);

            let content = match parsing::load(filename) {
                Ok(content) => content,
                Err(error) => {
                    eprintln!("{}", concise_loading_error(&error));
                    std::process::exit(1);
                }
            };

            let test = match parsing::parse(&content) {
                Ok(test) => test,
                Err(error) => {
                    eprintln!("{}", full_parsing_error(&error, filename, &content, &Terminal));
                    std::process::exit(1);
                }
            };

            let result = if raw || std::io::stdout().is_terminal() {
                formatting::render(&Terminal, &test)
            } else {
                formatting::render(&Identity, &test)
            };

            print!("{}", result);
        }
        Some(_) => {
            println!("No valid subcommand was used")
        }
        None => {
            println!("usage: apitest [COMMAND] ...");
            println!("Try '--help' for more information.");
        }
    }
}
