use std::fs;
use std::io;
use std::path::PathBuf;

use calc::repl::{DEFAULT_PROMPT, Repl};
use clap::Parser;
use clap::Subcommand;
use log::LevelFilter;
use miette::IntoDiagnostic;
use miette::WrapErr;

#[derive(Parser, Debug)]
struct Args {
    /// Log every evaluation at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Evaluate a single expression
    Eval { expression: String },
    /// Evaluate every non-blank line of a file
    File { filename: PathBuf },
    /// Read expressions from standard input until an empty line
    Repl {
        #[arg(long, default_value = DEFAULT_PROMPT)]
        prompt: String,
    },
    /// Run the built-in test cases
    Selftest,
}

fn main() -> miette::Result<()> {
    let args = Args::parse();

    let mut logger = pretty_env_logger::formatted_builder();
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    if let Ok(filters) = std::env::var("RUST_LOG") {
        logger.parse_filters(&filters);
    }
    logger.init();

    match args.command.unwrap_or(Commands::Repl {
        prompt: DEFAULT_PROMPT.to_string(),
    }) {
        Commands::Eval { expression } => match calc::evaluate(&expression) {
            Ok(value) => println!("{value}"),
            Err(e) => {
                let report = miette::Report::new(e.with_source_code("<input>", &expression));
                eprintln!("{report:?}");
                std::process::exit(65);
            }
        },
        Commands::File { filename } => {
            let file_contents = fs::read_to_string(&filename)
                .into_diagnostic()
                .wrap_err_with(|| format!("reading `{}` failed", filename.display()))?;

            let mut failed = false;
            for line in file_contents.lines().filter(|line| !line.trim().is_empty()) {
                match calc::evaluate(line) {
                    Ok(value) => println!("{line} ==> {value}"),
                    Err(e) => {
                        failed = true;
                        println!("{line}");
                        println!("{}", e.render());
                    }
                }
            }
            if failed {
                std::process::exit(65);
            }
        }
        Commands::Repl { prompt } => {
            Repl::new(&prompt).run(io::stdin().lock(), io::stdout().lock())?;
        }
        Commands::Selftest => {
            if !calc::harness::run(io::stdout().lock())? {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
