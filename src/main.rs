use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use xrate::cli::order::OrderArgs;
use xrate::core::log::init_logging;
use xrate::core::{AmountMode, CurrencyCode};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for xrate::AppCommand {
    fn from(cmd: Commands) -> xrate::AppCommand {
        match cmd {
            Commands::Rate { from, to, json } => xrate::AppCommand::Rate { from, to, json },
            Commands::Quote {
                give,
                get,
                amount,
                mode,
                json,
            } => xrate::AppCommand::Quote {
                give,
                get,
                amount,
                mode,
                json,
            },
            Commands::Order(args) => xrate::AppCommand::Order(args),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show the rate between two currencies and the path used
    Rate {
        from: CurrencyCode,
        to: CurrencyCode,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Quote give/get amounts for an exchange
    Quote {
        give: CurrencyCode,
        get: CurrencyCode,
        /// Amount, e.g. "1 500,50"
        #[arg(short, long)]
        amount: String,
        /// Which side the amount refers to
        #[arg(short, long, default_value = "give")]
        mode: AmountMode,
        /// Print the quote as JSON
        #[arg(long)]
        json: bool,
    },
    /// Walk through a complete exchange order
    Order(OrderArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => xrate::cli::setup::setup(),
        Some(cmd) => xrate::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
