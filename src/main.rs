use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

use closing_desk::cli::{handle_transaction_command, TransactionCommands};
use closing_desk::config::{paths::DATA_FILE_ENV, StorePaths, BIND_ENV, DEFAULT_BIND};
use closing_desk::storage::TransactionStore;

#[derive(Parser)]
#[command(
    name = "closing",
    version,
    about = "Transaction coordination helper for real-estate closings"
)]
struct Cli {
    /// Path to the JSON data file
    #[arg(long, global = true, env = DATA_FILE_ENV)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Transaction(TransactionCommands),

    /// Run the web UI
    Serve {
        /// Address to listen on
        #[arg(long, env = BIND_ENV, default_value = DEFAULT_BIND)]
        bind: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The server reports requests; one-shot commands stay quiet unless asked
    let default_filter = match cli.command {
        Some(Commands::Serve { .. }) => "closing_desk=info",
        _ => "closing_desk=warn",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let paths = StorePaths::resolve(cli.data_file)?;
    log::debug!("Using data file {}", paths.data_file().display());
    let store = TransactionStore::new(paths);

    match command {
        Commands::Transaction(cmd) => handle_transaction_command(&store, cmd)?,
        Commands::Serve { bind } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(closing_desk::web::serve(store, &bind))?;
        }
    }

    Ok(())
}
