use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use lox_frontend as lox;

use lox::ast_printer::AstPrinter;
use lox::error::{Diagnostics, EXIT_DATA_ERR, EXIT_USAGE};
use lox::parser::Parser;
use lox::resolver::Resolver;
use lox::scanner::{read_source, scan_tokens, Scanner};
use lox::stmt::Stmt;

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language front end", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to frontend.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize { filename: Option<PathBuf> },

    /// Parses input from a file as a program and prints its AST
    Parse {
        filename: Option<PathBuf>,

        /// Print the AST as JSON instead of prefix form
        #[arg(long)]
        json: bool,
    },

    /// Parses and resolves a program, reporting semantic errors
    Resolve {
        filename: Option<PathBuf>,

        /// Print the resolved AST as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logger() -> Result<()> {
    let log_file = File::create("frontend.log").context("Failed to create frontend.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("lox_frontend::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .init();

    info!("Logger initialized, writing to frontend.log");
    Ok(())
}

fn print_ast(statements: &[Stmt<'_>], json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(statements).context("Failed to serialize AST")?;
        println!("{}", out);
    } else if !statements.is_empty() {
        println!("{}", AstPrinter::print_program(statements));
    }

    Ok(())
}

fn report(diagnostics: &Diagnostics) {
    for error in diagnostics.errors() {
        eprintln!("{}", error);
    }
}

/// Scan + parse, collecting every lexing and parsing error.
fn front_end<'a>(
    tokens: &'a [lox::token::Token<'a>],
    diagnostics: &mut Diagnostics,
) -> Vec<Stmt<'a>> {
    let output = Parser::new(tokens).parse();
    info!("Parsed {} statements", output.statements.len());

    diagnostics.extend(output.errors);
    output.statements
}

fn main() -> Result<()> {
    let args: Cli = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_USAGE } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let (filename, json) = match &args.commands {
        Commands::Tokenize { filename } => (filename.clone(), false),
        Commands::Parse { filename, json } | Commands::Resolve { filename, json } => {
            (filename.clone(), *json)
        }
    };

    let Some(filename) = filename else {
        info!("No filepath provided");
        println!("No input filepath was provided. Exiting...");
        std::process::exit(0);
    };

    let source: String = match read_source(&filename) {
        Ok(source) => source,
        Err(e) => {
            let mut diagnostics = Diagnostics::new();
            diagnostics.report(e);
            report(&diagnostics);
            std::process::exit(diagnostics.exit_code());
        }
    };

    match args.commands {
        Commands::Tokenize { .. } => {
            info!("Running Tokenize subcommand");
            let mut tokenized = true;

            for token in Scanner::new(&source) {
                match token {
                    Ok(token) => println!("{}", token),
                    Err(e) => {
                        tokenized = false;
                        debug!("Tokenization debug: {}", e);
                        eprintln!("{}", e);
                    }
                }
            }

            if !tokenized {
                debug!("Tokenization failed, exiting with code {}", EXIT_DATA_ERR);
                std::process::exit(EXIT_DATA_ERR);
            }
        }

        Commands::Parse { .. } => {
            info!("Running Parse subcommand");
            let mut diagnostics = Diagnostics::new();

            let (tokens, lex_errors) = scan_tokens(&source);
            diagnostics.extend(lex_errors);

            let statements = front_end(&tokens, &mut diagnostics);
            report(&diagnostics);
            print_ast(&statements, json)?;

            if !diagnostics.is_empty() {
                std::process::exit(diagnostics.exit_code());
            }
        }

        Commands::Resolve { .. } => {
            info!("Running Resolve subcommand");
            let mut diagnostics = Diagnostics::new();

            let (tokens, lex_errors) = scan_tokens(&source);
            diagnostics.extend(lex_errors);

            let statements = front_end(&tokens, &mut diagnostics);

            if diagnostics.had_error() {
                report(&diagnostics);
                std::process::exit(diagnostics.exit_code());
            }

            diagnostics.extend(Resolver::new().resolve(&statements));
            report(&diagnostics);
            print_ast(&statements, json)?;

            if !diagnostics.is_empty() {
                std::process::exit(diagnostics.exit_code());
            }
        }
    }

    info!("Command completed");
    Ok(())
}
