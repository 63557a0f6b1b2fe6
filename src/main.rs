use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use runout::commands::{event, run, set, show, status, stop, watch};
use runout::commands::set::SetArgs;
use runout::monitor::PrintEvent;
use runout::settings::{default_config_path, default_state_dir};

#[derive(Parser)]
#[command(name = "runout")]
#[command(about = "Filament runout watchdog for 3D printers", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory for the daemon socket, pid and log files
    #[arg(short, long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the watchdog daemon
    Run {
        /// Stay in the foreground instead of daemonizing
        #[arg(long)]
        foreground: bool,
    },

    /// Query the current sensor status (-1 unknown, 0 absent, 1 present)
    Status,

    /// Follow live status-change events
    Watch,

    /// Print the persisted settings
    Show,

    /// Update sensor settings (persisted, and applied live if the daemon runs)
    Set {
        #[command(flatten)]
        args: SetArgs,
    },

    /// Report a print lifecycle event to the daemon
    Event {
        /// One of: started, done, failed, cancelled
        #[arg(value_parser = PrintEvent::parse)]
        event: PrintEvent,
    },

    /// Stop the watchdog daemon
    Stop,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(default_config_path);
    let state_dir = cli.state_dir.unwrap_or_else(default_state_dir);

    match cli.command {
        Commands::Run { foreground } => run::execute(&config_path, &state_dir, foreground),
        Commands::Status => status::execute(&state_dir),
        Commands::Watch => watch::execute(&state_dir),
        Commands::Show => show::execute(&config_path),
        Commands::Set { args } => set::execute(&config_path, &state_dir, args),
        Commands::Event { event } => event::execute(&state_dir, event),
        Commands::Stop => stop::execute(&state_dir),
    }
}
