use clap::{Parser, Subcommand};
use std::path::PathBuf;

use evplane_cli::commands::{angles, build, inspect, matching};
use evplane_cli::config::AnalysisConfig;
use evplane_cli::telemetry;

#[derive(Parser)]
#[command(name = "evplane")]
#[command(about = "Event-plane Q-vectors from VELO tracks and Lambda candidate matching", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute event-plane Q-vectors for every matching event file in a directory
    Build {
        #[arg(long)]
        input_dir: PathBuf,

        /// Event-plane stream to write
        #[arg(long, short)]
        output: PathBuf,

        /// Regex over file names (defaults to the run 274156 PbPb production)
        #[arg(long)]
        pattern: Option<String>,

        /// JSON file overriding default cuts
        #[arg(long)]
        config: Option<PathBuf>,

        /// Worker threads
        #[arg(long, short)]
        jobs: Option<usize>,
    },
    /// Convert Q-vectors into event-plane angles
    Angles {
        #[arg(long, short)]
        input: PathBuf,

        #[arg(long, short)]
        output: PathBuf,

        /// First-order resolution, stored as given
        #[arg(long)]
        r1: Option<f64>,

        /// Second-order resolution, stored as given
        #[arg(long)]
        r2: Option<f64>,

        /// Use eta-weighted sums for the first harmonic
        #[arg(long)]
        eta_weighted: bool,

        /// JSON file whose `angles` section supplies the defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Select Lambda candidates and attach their event-plane angles
    Match {
        #[arg(long)]
        candidates: PathBuf,

        /// Number used in the output file name
        #[arg(long)]
        file_index: u32,

        #[arg(long, default_value = matching::DEFAULT_EVENT_PLANE)]
        event_plane: PathBuf,

        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        /// Fail on duplicate (run, event) keys instead of keeping the last one
        #[arg(long)]
        strict_keys: bool,
    },
    /// Show the header and integrity of a stream file
    Inspect { path: PathBuf },
}

fn main() -> anyhow::Result<()> {
    telemetry::init_telemetry();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input_dir,
            output,
            pattern,
            config,
            jobs,
        } => {
            build::run(&build::BuildArgs {
                input_dir,
                output,
                pattern,
                config,
                jobs,
            })?;
        }
        Commands::Angles {
            input,
            output,
            r1,
            r2,
            eta_weighted,
            config,
        } => {
            let mut settings = AnalysisConfig::load_or_default(config.as_deref())?.angles;
            settings.r1 = r1.unwrap_or(settings.r1);
            settings.r2 = r2.unwrap_or(settings.r2);
            settings.eta_weighted_first |= eta_weighted;
            angles::run(&input, &output, &settings)?;
        }
        Commands::Match {
            candidates,
            file_index,
            event_plane,
            output_dir,
            config,
            strict_keys,
        } => {
            matching::run(&matching::MatchArgs {
                candidates,
                file_index,
                event_plane,
                output_dir,
                config,
                strict_keys,
            })?;
        }
        Commands::Inspect { path } => {
            inspect::run(&path)?;
        }
    }
    Ok(())
}
