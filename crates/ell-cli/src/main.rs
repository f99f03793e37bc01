//! Terminal player for Ellidra stories.

mod commands;
mod settings;
mod typewriter;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use settings::Settings;

#[derive(Parser)]
#[command(
    name = "ell",
    about = "Ellidra: play and inspect branching dialogue stories",
    version,
    propagate_version = true
)]
struct Cli {
    /// Settings file (default: ./ell.toml if it exists)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a story in the terminal
    Play {
        /// Story JSON file (default: the built-in prologue)
        #[arg(short, long)]
        story: Option<PathBuf>,

        /// Ignore any saved game and start over
        #[arg(long)]
        new: bool,

        /// Player name for a new game
        #[arg(short, long)]
        name: Option<String>,

        /// Directory for save files
        #[arg(long)]
        save_dir: Option<PathBuf>,

        /// Print text at once instead of letter by letter
        #[arg(long)]
        instant: bool,
    },

    /// Validate a story file and report problems
    Check {
        /// Story JSON file (default: the built-in prologue)
        story: Option<PathBuf>,
    },

    /// Show a scene with its choices, requirements and effects
    Show {
        /// Scene id
        scene: String,

        /// Story JSON file (default: the built-in prologue)
        #[arg(short, long)]
        story: Option<PathBuf>,
    },

    /// Export a story
    Export {
        /// Output format: json, markdown
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Story JSON file (default: the built-in prologue)
        #[arg(short, long)]
        story: Option<PathBuf>,
    },

    /// Show the saved game
    Status {
        /// Directory for save files
        #[arg(long)]
        save_dir: Option<PathBuf>,
    },

    /// Delete the saved game
    Reset {
        /// Directory for save files
        #[arg(long)]
        save_dir: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = Settings::load(cli.config.as_deref()).and_then(|settings| {
        init_tracing(&settings, cli.verbose);
        run(cli.command, settings)
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(command: Commands, mut settings: Settings) -> Result<(), String> {
    match command {
        Commands::Play {
            story,
            new,
            name,
            save_dir,
            instant,
        } => {
            settings.override_save_dir(save_dir);
            if instant {
                settings.play.typewriter_ms = 0;
            }
            commands::play::run(story.as_deref(), &settings, new, name.as_deref())
        }
        Commands::Check { story } => commands::check::run(story.as_deref()),
        Commands::Show { scene, story } => commands::show::run(story.as_deref(), &scene),
        Commands::Export {
            format,
            output,
            story,
        } => commands::export::run(story.as_deref(), &format, output.as_deref()),
        Commands::Status { save_dir } => {
            settings.override_save_dir(save_dir);
            commands::status::run(&settings)
        }
        Commands::Reset { save_dir } => {
            settings.override_save_dir(save_dir);
            commands::reset::run(&settings)
        }
    }
}

/// Logs go to stderr so they never mix with story text. `--verbose` wins
/// over `RUST_LOG`, which wins over the settings file.
fn init_tracing(settings: &Settings, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log.level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
