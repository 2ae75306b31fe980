use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use eelios::ast_printer::AstPrinter;
use eelios::console::StdConsole;
use eelios::error::EeliosError;
use eelios::scanner::Scanner;

#[derive(ClapParser, Debug)]
#[command(version, about = "Eelios language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to eelios.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes a source file, printing each token
    Tokenize { filename: PathBuf },

    /// Parses a source file and prints its AST
    Parse {
        filename: PathBuf,

        /// Print the AST as JSON instead of S-expressions
        #[arg(long)]
        json: bool,
    },

    /// Runs a source file as an Eelios program
    Run { filename: PathBuf },
}

/// Reads a whole source file as UTF‑8 text.
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);

    let source = fs::read_to_string(filename)
        .with_context(|| format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", source.len(), filename);

    Ok(source)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("eelios.log").context("Failed to create eelios.log")?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'eelios::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("eelios::")
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
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to eelios.log");
    Ok(())
}

/// Print `error` against `source` and exit with the matching status.
fn fail(error: EeliosError, source: &str) -> ! {
    let code = match error {
        EeliosError::Syntax(_) => 65,
        EeliosError::Runtime(_) => 70,
        _ => 70,
    };

    debug!("Exiting with code {} after: {}", code, error);

    eprintln!("{}", error.render(source));
    process::exit(code);
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Commands::Tokenize { filename } => {
            info!("Running Tokenize subcommand");

            let source = read_file(&filename)?;
            let mut tokenized = true;

            for token in Scanner::new(&source) {
                match token {
                    Ok(token) => println!("{}", token),

                    Err(e) => {
                        tokenized = false;

                        debug!("Tokenization debug: {}", e);

                        eprintln!("{}", EeliosError::from(e).render(&source));
                    }
                }
            }

            if !tokenized {
                debug!("Tokenization failed, exiting with code 65");

                process::exit(65);
            }

            info!("Tokenization completed successfully");
        }

        Commands::Parse { filename, json } => {
            info!("Running Parse subcommand");

            let source = read_file(&filename)?;

            match eelios::parse(&source) {
                Ok(program) => {
                    if json {
                        let text = serde_json::to_string_pretty(program.as_ref())
                            .context("Failed to serialize AST")?;
                        println!("{}", text);
                    } else {
                        println!("{}", AstPrinter::print(&program));
                    }
                }

                Err(e) => fail(e, &source),
            }

            info!("Parse subcommand completed");
        }

        Commands::Run { filename } => {
            info!("Running Run subcommand");

            let source = read_file(&filename)?;

            match eelios::run(&source, Rc::new(StdConsole)) {
                Ok(Some(value)) => {
                    debug!("Program produced: {}", value);
                    println!("{}", value);
                }

                Ok(None) => info!("Program finished without a value"),

                Err(e) => fail(e, &source),
            }
        }
    }

    Ok(())
}
