use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use deal_board::board::RollbackPolicy;
use deal_board::commands::{board, config_cmd, list, move_deal, stages};
use deal_board::completions::{generate_completions, Shell};
use deal_board::logging::{self, LogTarget};
use deal_board::models::ClientType;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "deal-board")]
#[command(about = "Drag deals between pipeline stages", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a config file (default: {config_dir}/deal-board/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive pipeline board
    Board {
        /// Pipeline to show first (buyer, seller)
        #[arg(short, long)]
        client_type: Option<ClientType>,

        /// How a failed move is undone (snapshot, per-deal)
        #[arg(long)]
        rollback: Option<RollbackPolicy>,
    },

    /// Print deals grouped by stage
    List {
        /// Pipeline to print (buyer, seller)
        #[arg(short, long)]
        client_type: Option<ClientType>,
    },

    /// Print pipeline stages in column order
    Stages,

    /// Move a deal to another stage
    Move {
        /// Deal ID
        deal_id: String,

        /// Target stage ID
        stage_id: String,
    },

    /// Show the effective configuration
    Config,

    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    if !matches!(cli.command, Commands::Board { .. }) {
        logging::init(LogTarget::Stderr)?;
    }

    match cli.command {
        Commands::Board {
            client_type,
            rollback,
        } => board::execute(config_path, client_type, rollback),
        Commands::List { client_type } => list::execute(config_path, client_type),
        Commands::Stages => stages::execute(config_path),
        Commands::Move { deal_id, stage_id } => {
            move_deal::execute(config_path, &deal_id, &stage_id)
        }
        Commands::Config => config_cmd::execute(config_path),
        Commands::Completions { shell } => {
            let shell = Shell::from_str(&shell)?;
            let mut cmd = Cli::command();
            generate_completions(&mut cmd, shell, &mut io::stdout());
            Ok(())
        }
    }
}
