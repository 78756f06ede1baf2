//! chromsweep: per-interval overlap counts between sorted BED files.
//!
//! Usage: chromsweep <COMMAND> [OPTIONS]

use clap::{ArgAction, Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process;

use chromsweep::bed::BedError;
use chromsweep::commands::{CountCommand, IndexCommand};
use chromsweep::config::{self, ChromOrder};

#[derive(Parser)]
#[command(name = "chromsweep")]
#[command(author = "Manish Kumar Bobbili")]
#[command(version)]
#[command(about = "Count, for every query interval, the overlapping intervals in a sorted database file", long_about = None)]
struct Cli {
    /// Chromosome order both inputs are sorted in
    #[arg(long, global = true, value_enum, default_value_t = ChromOrder::Lexicographic)]
    chrom_order: ChromOrder,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the number of database intervals overlapping each query interval
    Count {
        /// Query BED file (sorted)
        #[arg(short = 'a', long)]
        query: PathBuf,

        /// Database BED file (sorted)
        #[arg(short = 'b', long)]
        database: PathBuf,

        /// Sweep one chromosome at a time using .idx side files (built if missing)
        #[arg(long)]
        indexed: bool,

        /// Rebuild .idx side files even if they exist (implies --indexed)
        #[arg(long)]
        reindex: bool,

        /// Print sweep statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Build the per-chromosome .idx side file for a sorted BED file
    Index {
        /// Input BED file (sorted)
        #[arg(short, long)]
        input: PathBuf,

        /// Rebuild even if the index already exists
        #[arg(short, long)]
        force: bool,

        /// Print the index table to stdout
        #[arg(short, long)]
        print: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    // Set before any command reads the default order
    config::set_chrom_order(cli.chrom_order);

    let result = match cli.command {
        Commands::Count {
            query,
            database,
            indexed,
            reindex,
            stats,
        } => run_count(query, database, indexed, reindex, stats),

        Commands::Index {
            input,
            force,
            print,
        } => run_index(input, force, print),
    };

    match result {
        Ok(()) => {}
        // Downstream reader closed early (e.g. `| head`)
        Err(BedError::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_count(
    query: PathBuf,
    database: PathBuf,
    indexed: bool,
    reindex: bool,
    stats: bool,
) -> Result<(), BedError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let mut cmd = CountCommand::new();
    cmd.indexed = indexed || reindex;
    cmd.reindex = reindex;

    let result = cmd.run(&query, &database, &mut handle)?;

    if stats {
        eprintln!("Sweep stats: {}", result);
    }

    Ok(())
}

fn run_index(input: PathBuf, force: bool, print: bool) -> Result<(), BedError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let cmd = IndexCommand { force, print };
    cmd.run(&input, &mut handle)?;

    Ok(())
}
