use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use coinwise_core::{calculate_spending_analysis, parse_salary, usable_salary};
use coinwise_finance::{ErrorResponse, ProcessedStatement, StatementPipeline};
use std::io::Read;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod import;
mod llm;
mod report;
mod state;

#[derive(Parser, Debug)]
#[command(name = "coinwise", version, about = "Bank statement categorization and spending analysis")]
struct Cli {
    /// Log pipeline progress to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract, categorize and analyze a pasted statement
    Process {
        /// Statement text file (reads stdin when omitted)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Monthly salary; enables the spending analysis
        #[arg(long)]
        salary: Option<String>,

        /// Print the JSON response envelope instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Spending analysis over already-categorized transactions (.json or .csv)
    Analyze {
        #[arg(long)]
        file: PathBuf,

        #[arg(long)]
        salary: String,

        #[arg(long)]
        json: bool,
    },

    /// Manage ~/.coinwise/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Store the completion API key in ~/.coinwise/auth.json
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Paste an API key (Groq or OpenAI)
    PasteApiKey,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Process { file, salary, json } => {
            process(file, salary, json).await?;
        }
        Command::Analyze { file, salary, json } => {
            analyze(file, &salary, json)?;
        }
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
        Command::Auth { command } => match command {
            AuthCommand::PasteApiKey => auth::paste_api_key()?,
        },
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,coinwise_finance=debug,coinwise=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_statement(file: Option<PathBuf>) -> Result<String> {
    match file {
        Some(p) => std::fs::read_to_string(&p).with_context(|| format!("read {}", p.display())),
        None => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context("read statement from stdin")?;
            Ok(s)
        }
    }
}

async fn process(file: Option<PathBuf>, salary: Option<String>, json: bool) -> Result<()> {
    let text = read_statement(file)?;
    let salary = salary.as_deref().and_then(parse_salary);

    let cfg = config::load_config()?;
    let api_key = auth::resolve_api_key(cfg.llm.provider)?;
    let client = llm::OpenAiCompatClient::new(&cfg.llm, api_key)?;
    info!(endpoint = client.endpoint(), model = %cfg.llm.model, "using completion endpoint");

    let pipeline = StatementPipeline::with_options(client, cfg.pipeline_options());
    match pipeline.process_transaction_data(&text, salary).await {
        Ok(processed) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&processed.to_response())?);
            } else {
                print_processed(&processed);
            }
            Ok(())
        }
        Err(e) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&ErrorResponse::new(e.to_string()))?);
            }
            Err(anyhow!(e))
        }
    }
}

fn print_processed(processed: &ProcessedStatement) {
    report::print_transactions(&processed.transactions);
    match &processed.spending_analysis {
        Some(analysis) => report::print_analysis(analysis),
        None => println!("\n(pass --salary <amount> for a spending analysis)"),
    }
}

fn analyze(file: PathBuf, salary: &str, json: bool) -> Result<()> {
    let salary = usable_salary(parse_salary(salary))
        .with_context(|| format!("salary must be a positive number, got {:?}", salary))?;
    let txns = import::load_transactions(&file)?;
    let analysis = calculate_spending_analysis(&txns, salary);

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        report::print_transactions(&txns);
        report::print_analysis(&analysis);
    }
    Ok(())
}
