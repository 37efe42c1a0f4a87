mod cli;
mod commands;
mod error;
mod haplogroup;

use clap::Parser;

fn main() {
    let args = cli::Args::parse();

    let result = match args.command {
        cli::Commands::Predict {
            input,
            tables,
            output_file,
        } => commands::predict::run(input, tables, output_file),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
