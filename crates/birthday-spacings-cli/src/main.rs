//! CLI for birthday-spacings — run the Marsaglia-Tsang spacings test.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "birthday-spacings")]
#[command(about = "birthday-spacings — Marsaglia-Tsang birthday spacings randomness test")]
#[command(version = birthday_spacings::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the test against a reference generator and report the p-value
    Run {
        /// Generator: lcg (MSVC constants, known bad), seeded (StdRng from --seed), os (StdRng from OS entropy)
        #[arg(long, default_value = "seeded", value_parser = ["lcg", "seeded", "os"])]
        generator: String,

        /// Seed for lcg/seeded generators (defaults: lcg=1, seeded=1234)
        #[arg(long)]
        seed: Option<u64>,

        /// Days in the year as a power of two: birthdays fall in [0, 2^bits)
        #[arg(long, default_value = "32", value_parser = clap::value_parser!(u32).range(1..=4096))]
        bits: u32,

        /// Birthdays drawn per trial
        #[arg(long, default_value = "4096")]
        birthdays: usize,

        /// Number of trials
        #[arg(long, default_value = "5000")]
        observations: usize,

        /// Histogram binning: merge-tail (default), inclusive, exclude-max
        #[arg(long, default_value = "merge-tail", value_parser = ["merge-tail", "inclusive", "exclude-max"])]
        bins: String,

        /// Minimum expected frequency per bin for merge-tail
        #[arg(long, default_value = "5.0")]
        min_expected: f64,

        /// p-value below which the generator is reported as failing
        #[arg(long, default_value = "0.01")]
        threshold: f64,

        /// Write the full report as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Show lambda and the expected duplicate-count frequencies
    Lambda {
        /// Days in the year as a power of two: birthdays fall in [0, 2^bits)
        #[arg(long, default_value = "32", value_parser = clap::value_parser!(u32).range(1..=4096))]
        bits: u32,

        /// Birthdays drawn per trial
        #[arg(long, default_value = "4096")]
        birthdays: usize,

        /// Number of trials the expected frequencies are scaled to
        #[arg(long, default_value = "5000")]
        observations: usize,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            generator,
            seed,
            bits,
            birthdays,
            observations,
            bins,
            min_expected,
            threshold,
            output,
        } => commands::run::run(commands::run::RunArgs {
            generator: &generator,
            seed,
            bits,
            birthdays,
            observations,
            bin_policy: commands::parse_bin_policy(&bins, min_expected),
            threshold,
            output_path: output.as_deref(),
        }),
        Commands::Lambda {
            bits,
            birthdays,
            observations,
        } => commands::lambda::run(bits, birthdays, observations),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
