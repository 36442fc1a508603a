//! Alsvid Command-Line Interface
//!
//! Compiles quantum error-correcting codes into fault-tolerant
//! syndrome-extraction programs in the QES format.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{r#gen, hgp, schedule, version};

/// Alsvid - quantum error-correction circuit compiler
#[derive(Parser)]
#[command(name = "alsvid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Built-in code families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum CodeFamily {
    /// Hexagonal color code (requires --distance)
    Hex,
    /// Distance-4 hyperbolic color code
    Hycc,
    /// Rotated surface code (requires --distance)
    Surface,
    /// Tanner-graph file (requires --input)
    File,
}

/// Memory basis choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Memory {
    /// Preserve logical X
    X,
    /// Preserve logical Z
    Z,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a memory-experiment program for a code
    Gen {
        /// Output file for the QES program
        #[arg(short, long)]
        out: String,

        /// Code family to compile
        #[arg(short, long, value_enum, default_value = "hex")]
        code: CodeFamily,

        /// Tanner-graph input file (for --code file)
        #[arg(short, long)]
        input: Option<String>,

        /// Code distance (for hex and surface codes)
        #[arg(short, long, default_value = "3")]
        distance: u32,

        /// Number of syndrome-extraction rounds
        #[arg(short, long)]
        rounds: u32,

        /// Memory basis
        #[arg(short, long, value_enum, default_value = "z")]
        memory: Memory,

        /// Add flag ancillas guarding plaquette support pairs
        #[arg(long)]
        flags: bool,

        /// Extract a plaquette's X and Z checks in one combined pass
        /// instead of one pass per basis (hex only)
        #[arg(long)]
        combined: bool,
    },

    /// Build a hypergraph-product code and write its Tanner graph
    Hgp {
        /// Output file for the Tanner graph
        #[arg(short, long)]
        out: String,

        /// Check degree of the classical seed (r)
        #[arg(short, long)]
        rows: usize,

        /// Bit degree of the classical seed (c)
        #[arg(short, long)]
        cols: usize,

        /// Scale factor of the classical seed (s)
        #[arg(short, long)]
        scale: usize,
    },

    /// Solve and report syndrome-extraction schedules for a code file
    Schedule {
        /// Tanner-graph input file
        #[arg(short, long)]
        input: String,

        /// Print per-check statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Gen {
            out,
            code,
            input,
            distance,
            rounds,
            memory,
            flags,
            combined,
        } => r#gen::execute(r#gen::GenArgs {
            out,
            code,
            input,
            distance,
            rounds,
            memory,
            flags,
            combined,
        }),

        Commands::Hgp {
            out,
            rows,
            cols,
            scale,
        } => hgp::execute(&out, rows, cols, scale),

        Commands::Schedule { input, json } => schedule::execute(&input, json),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("{} {err:#}", style("error:").red().bold());
        std::process::exit(1);
    }
    Ok(())
}
