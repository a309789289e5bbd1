use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "circadia", version, about = "Circadia CLI")]
struct Cli {
    /// Config file (default: ~/.config/circadia/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate today's protocol timeline
    Timeline(commands::timeline::TimelineArgs),
    /// Reverse-chain protocol times from one training session
    Stack(commands::stack::StackArgs),
    /// Check whether an action should wait
    Defer(commands::defer::DeferArgs),
    /// Ad-hoc suggestions from current physiological state
    React(commands::react::ReactArgs),
    /// Classify a chronotype from averaged sleep timing
    Chronotype(commands::chronotype::ChronotypeArgs),
    /// Browse the built-in protocol catalog
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Timeline(args) => commands::timeline::run(args, config_path),
        Commands::Stack(args) => commands::stack::run(args, config_path),
        Commands::Defer(args) => commands::defer::run(args, config_path),
        Commands::React(args) => commands::react::run(args),
        Commands::Chronotype(args) => commands::chronotype::run(args, config_path),
        Commands::Catalog { action } => commands::catalog::run(action),
        Commands::Config { action } => commands::config::run(action, config_path),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
