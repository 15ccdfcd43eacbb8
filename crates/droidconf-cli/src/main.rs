//! droidconf CLI tool.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "droidconf")]
#[command(about = "Android app build descriptor resolver", long_about = None)]
struct Cli {
    /// Flutter project root
    #[arg(long, env = "DROIDCONF_PROJECT_ROOT", default_value = ".")]
    project_root: PathBuf,

    /// Extra interpolation variable: NAME, flutter.NAME or env.NAME
    #[arg(short = 'D', long = "define", value_name = "NAME=VALUE", global = true)]
    define: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a descriptor and report every violation
    Validate {
        /// Path to the descriptor (defaults to android/app/build.kdl)
        path: Option<PathBuf>,
    },
    /// Show the resolved descriptor
    Show {
        /// Path to the descriptor (defaults to android/app/build.kdl)
        path: Option<PathBuf>,
        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Write the canonical, fully resolved descriptor
    Export {
        /// Path to the descriptor (defaults to android/app/build.kdl)
        path: Option<PathBuf>,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the externally supplied version values
    Versions {
        /// Path to the descriptor (defaults to android/app/build.kdl)
        path: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let project = commands::Project::open(&cli.project_root)?.with_defines(&cli.define)?;

    match cli.command {
        Commands::Validate { path } => {
            commands::validate(&project, path.as_deref())?;
        }
        Commands::Show { path, json } => {
            commands::show::show(&project, path.as_deref(), json)?;
        }
        Commands::Export { path, output } => {
            commands::export::export(&project, path.as_deref(), output.as_deref())?;
        }
        Commands::Versions { path } => {
            commands::versions(&project, path.as_deref())?;
        }
    }

    Ok(())
}
