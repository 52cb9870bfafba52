use clap::{Parser, Subcommand};

use crate::{generate::GenerateArgs, solve::SolveArgs};

mod file_utils;
mod generate;
mod parsers;
mod solve;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a JSON problem and print or write the best solution
    Solve {
        #[command(flatten)]
        args: SolveArgs,
    },
    /// Write a random JSON problem
    #[command(visible_alias = "g")]
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Solve { args } => solve::run(args)?,
        Commands::Generate { args } => generate::run(args)?,
    }

    Ok(())
}
