use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::process::ExitCode;
use sql_challenge_cli::commands;
use sql_challenge_core::config::EngineConfig;

#[derive(Parser, Debug)]
#[clap(author, version, about = "SQL challenge runner backed by embedded SQLite")]
struct Args {
    /// Config file path
    #[clap(short, long, env = "CHALLENGE_CONFIG")]
    config: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[clap(long, env = "CHALLENGE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Drop rows that do not match the declared columns
    #[clap(long, env = "CHALLENGE_STRICT")]
    strict: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the setup script of a challenge
    Setup {
        /// Challenge document (JSON)
        document: String,
    },

    /// Show the assembled challenge, its diagnostics and table previews
    Inspect {
        /// Challenge document (JSON)
        document: String,
    },

    /// Run a query against the challenge and score it
    Run {
        /// Challenge document (JSON)
        document: String,

        /// Query to run
        #[clap(short, long)]
        query: Option<String>,

        /// File containing the query to run
        #[clap(long, conflicts_with = "query")]
        query_file: Option<String>,

        /// Ignore row order when comparing
        #[clap(long)]
        unordered: bool,
    },

    /// Compare the expected result against a result file
    Compare {
        /// Challenge document (JSON)
        document: String,

        /// Result file with `columns` and `rows`
        #[clap(short, long)]
        actual: String,

        /// Ignore row order when comparing
        #[clap(long)]
        unordered: bool,
    },
}

fn exit_code(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}

fn main() -> Result<ExitCode> {
    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration
    let mut config = EngineConfig::new();

    if let Some(config_path) = &args.config {
        config = EngineConfig::from_file(config_path)?;
    }

    // Override config with command-line arguments
    if let Some(log_level) = args.log_level {
        config.log_level = log_level;
        config.validate()?;
    }
    if args.strict {
        let strict = EngineConfig::strict();
        config.normalizer = strict.normalizer;
    }

    // Initialize logging
    let level = if config.debug_mode { "debug" } else { config.log_level.as_str() };
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level),
    );
    debug!("configuration: {:?}", config);

    match args.command {
        Command::Setup { document } => {
            let assembled = commands::load_challenge(&document, &config)?;
            print!("{}", commands::setup(&assembled.challenge));
            Ok(ExitCode::SUCCESS)
        }
        Command::Inspect { document } => {
            let assembled = commands::load_challenge(&document, &config)?;
            print!("{}", commands::inspect(&assembled, &config.display)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Run {
            document,
            query,
            query_file,
            unordered,
        } => {
            let assembled = commands::load_challenge(&document, &config)?;
            let query = commands::read_query(query, query_file.as_deref())?;
            let evaluation = commands::run(&assembled.challenge, &query, unordered)?;

            println!("{}", serde_json::to_string_pretty(&evaluation)?);
            println!("{}", evaluation.feedback());
            info!("run finished: passed={}", evaluation.passed());
            Ok(exit_code(evaluation.passed()))
        }
        Command::Compare {
            document,
            actual,
            unordered,
        } => {
            let assembled = commands::load_challenge(&document, &config)?;
            let verdict = commands::compare_file(&assembled.challenge, &actual, &config, unordered)?;

            println!("{}", serde_json::to_string_pretty(&verdict)?);
            println!("{}", verdict.feedback());
            Ok(exit_code(verdict.passed))
        }
    }
}
