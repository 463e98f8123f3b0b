//! CLI for throttlewatch — watch CPU thermal throttling while work runs.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "throttlewatch")]
#[command(about = "throttlewatch — sample CPU thermal throttling and summarize it")]
#[command(version = throttlewatch_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a single CPU_Speed_Limit reading
    Read {
        /// Kill pmset and report no reading after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Sample throttling over a session and print a summary at the end
    Sample {
        /// Sample interval (e.g. "500ms", "3s")
        #[arg(long, default_value = "3s")]
        interval: String,

        /// Maximum session duration (e.g. "30s", "5m", "1h"); default: until Ctrl+C
        #[arg(long)]
        duration: Option<String>,

        /// Kill pmset and skip the tick after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Write the summary as JSON
        #[arg(long)]
        output: Option<String>,

        /// Print the summary as key=value report lines
        #[arg(long)]
        report: bool,

        /// Sample even if this platform does not look supported
        #[arg(long)]
        force: bool,
    },

    /// Extract CPU_Speed_Limit from captured `pmset -g therm` output
    Parse {
        /// File to read (default: stdin)
        path: Option<String>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Read { timeout_ms } => commands::read::run(timeout_ms),
        Commands::Sample {
            interval,
            duration,
            timeout_ms,
            output,
            report,
            force,
        } => commands::sample::run(commands::sample::SampleCommandConfig {
            interval: &interval,
            duration: duration.as_deref(),
            timeout_ms,
            output_path: output.as_deref(),
            report,
            force,
        }),
        Commands::Parse { path } => commands::parse::run(path.as_deref()),
    }
}
