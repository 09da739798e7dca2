use anyhow::Result;
use clap::{Parser, Subcommand};
use xtask::*;

#[derive(Parser)]
#[command(author, version, about = "Development tasks for chirpz")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Build,
    Test,
    Clippy,
    Fmt {
        /// Only report formatting differences
        #[arg(long)]
        check: bool,
    },
    /// Format check followed by clippy
    Analyze,
    Bench {
        /// Criterion filter, e.g. `iczt`
        filter: Option<String>,
    },
    Demo {
        /// Name of a demo under `demos/`
        #[arg(default_value = "basic_usage")]
        name: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = detect_config();

    match cli.command {
        Commands::Build => run(build_command(&cfg)),
        Commands::Test => run(test_command(&cfg)),
        Commands::Clippy => run(clippy_command()),
        Commands::Fmt { check } => run(fmt_command(check)),
        Commands::Analyze => {
            run(fmt_command(true))?;
            run(clippy_command())
        }
        Commands::Bench { filter } => run(bench_command(&cfg, filter.as_deref())),
        Commands::Demo { name } => run(demo_command(&cfg, &name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bench_filter() {
        let cli = Cli::parse_from(["xtask", "bench", "iczt"]);
        match cli.command {
            Commands::Bench { filter } => assert_eq!(filter.as_deref(), Some("iczt")),
            _ => panic!("parsed wrong command"),
        }
    }

    #[test]
    fn parse_demo_default() {
        let cli = Cli::parse_from(["xtask", "demo"]);
        match cli.command {
            Commands::Demo { name } => assert_eq!(name, "basic_usage"),
            _ => panic!("parsed wrong command"),
        }
    }
}
